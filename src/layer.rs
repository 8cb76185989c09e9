//! Logical vector layers as the host hands them to a renderer.

use std::fmt;

use crate::render::ShapeKind;
use crate::render::defaults;
use crate::types::LatLng;

/// Stable per-layer identity, stamped by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic geometry of a layer, following the GeoJSON geometry types
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A circle marker; `radius` is in pixels at the reference zoom
    Point { center: LatLng, radius: f64 },
    LineString(Vec<LatLng>),
    MultiLineString(Vec<Vec<LatLng>>),
    Polygon(Vec<Vec<LatLng>>),
    MultiPolygon(Vec<Vec<Vec<LatLng>>>),
}

impl Geometry {
    /// Point geometries become circles, everything else a path
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Point { .. } => ShapeKind::Circle,
            _ => ShapeKind::Path,
        }
    }

    /// Polygon rings are closed when serialized
    pub fn is_closed(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
    }

    /// Flatten into rings of coordinates; empty for points
    pub fn rings(&self) -> Vec<&[LatLng]> {
        match self {
            Geometry::Point { .. } => Vec::new(),
            Geometry::LineString(line) => vec![line.as_slice()],
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().map(Vec::as_slice).collect()
            }
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|rings| rings.iter().map(Vec::as_slice))
                .collect(),
        }
    }
}

/// Declarative style of a vector layer
#[derive(Clone, Debug, PartialEq)]
pub struct PathOptions {
    pub stroke: bool,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub line_cap: Option<String>,
    pub line_join: Option<String>,
    pub dash_array: Option<String>,
    pub dash_offset: Option<String>,
    pub fill: bool,
    /// Falls back to `color` when unset
    pub fill_color: Option<String>,
    pub fill_opacity: f64,
    /// Falls back to `evenodd` when unset
    pub fill_rule: Option<String>,
    /// Extra classes added to the element on creation
    pub class_name: Option<String>,
    pub interactive: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            stroke: true,
            color: defaults::COLOR.to_string(),
            weight: defaults::WEIGHT,
            opacity: defaults::OPACITY,
            line_cap: Some(defaults::LINE_CAP.to_string()),
            line_join: Some(defaults::LINE_JOIN.to_string()),
            dash_array: None,
            dash_offset: None,
            fill: false,
            fill_color: None,
            fill_opacity: defaults::FILL_OPACITY,
            fill_rule: None,
            class_name: None,
            interactive: true,
        }
    }
}

impl PathOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a geometry: polygons and circles are filled
    pub fn for_geometry(geometry: &Geometry) -> Self {
        Self {
            fill: geometry.is_closed() || geometry.kind() == ShapeKind::Circle,
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, stroke: bool) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_dash_array(mut self, dash_array: impl Into<String>) -> Self {
        self.dash_array = Some(dash_array.into());
        self
    }

    pub fn with_dash_offset(mut self, dash_offset: impl Into<String>) -> Self {
        self.dash_offset = Some(dash_offset.into());
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }

    pub fn with_fill_rule(mut self, rule: impl Into<String>) -> Self {
        self.fill_rule = Some(rule.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// A vector layer: identity, geometry and style
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub geometry: Geometry,
    pub options: PathOptions,
}

impl Layer {
    pub fn new(id: LayerId, geometry: Geometry) -> Self {
        let options = PathOptions::for_geometry(&geometry);
        Self {
            id,
            geometry,
            options,
        }
    }

    pub fn with_options(mut self, options: PathOptions) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }
}
