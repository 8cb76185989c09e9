//! Shape entities and the registry that owns them
//!
//! Each shape is one rendered layer. Its outline is projected into the
//! reference frame once and then knows how to:
//! - Report its kind (decided at creation, never re-derived)
//! - Write its geometry attributes onto its element

use std::collections::HashMap;
use std::fmt;

use enum_dispatch::enum_dispatch;

use super::defaults::ORIG_RADIUS_ATTR;
use super::path::points_to_path;
use super::transform::ReferenceFrame;
use crate::dom::{Document, ElementId};
use crate::errors::DomError;
use crate::host::MapView;
use crate::layer::{Geometry, LayerId, PathOptions};
use crate::types::{Point, ZoomScale, fmt_num};

/// Which element a shape is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Path,
    Circle,
}

impl ShapeKind {
    /// Element tag used for this kind
    pub fn tag(self) -> &'static str {
        match self {
            ShapeKind::Path => "path",
            ShapeKind::Circle => "circle",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Common behavior for all outlines
#[enum_dispatch]
pub trait Draw {
    fn kind(&self) -> ShapeKind;

    /// Write the geometry attributes onto `element`.
    ///
    /// `scale` is the group scale currently applied to the root group.
    fn write(&self, doc: &mut Document, element: ElementId, scale: ZoomScale)
    -> Result<(), DomError>;
}

/// Polyline or polygon rings in reference-frame pixels
#[derive(Debug, Clone, PartialEq)]
pub struct PathOutline {
    pub rings: Vec<Vec<Point>>,
    pub closed: bool,
}

impl Draw for PathOutline {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Path
    }

    fn write(
        &self,
        doc: &mut Document,
        element: ElementId,
        _scale: ZoomScale,
    ) -> Result<(), DomError> {
        doc.set_attribute(element, "d", points_to_path(&self.rings, self.closed))
    }
}

/// Circle marker: reference-frame center and unscaled radius
#[derive(Debug, Clone, PartialEq)]
pub struct CircleOutline {
    pub center: Point,
    pub radius: f64,
}

impl Draw for CircleOutline {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn write(
        &self,
        doc: &mut Document,
        element: ElementId,
        scale: ZoomScale,
    ) -> Result<(), DomError> {
        doc.set_attribute(element, "cx", fmt_num(self.center.x))?;
        doc.set_attribute(element, "cy", fmt_num(self.center.y))?;
        doc.set_attribute(element, "r", fmt_num(scale.compensate(self.radius)))?;
        doc.set_attribute(element, ORIG_RADIUS_ATTR, fmt_num(self.radius))
    }
}

#[enum_dispatch(Draw)]
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Path(PathOutline),
    Circle(CircleOutline),
}

impl Outline {
    /// Project a layer's geometry into the reference frame
    pub fn project<V: MapView + ?Sized>(
        frame: &ReferenceFrame,
        view: &V,
        geometry: &Geometry,
    ) -> Self {
        match geometry {
            Geometry::Point { center, radius } => Outline::Circle(CircleOutline {
                center: frame.project(view, *center),
                radius: *radius,
            }),
            other => Outline::Path(PathOutline {
                rings: other
                    .rings()
                    .into_iter()
                    .map(|ring| ring.iter().map(|&ll| frame.project(view, ll)).collect())
                    .collect(),
                closed: other.is_closed(),
            }),
        }
    }

    /// Base radius of a circle outline
    pub fn radius(&self) -> Option<f64> {
        match self {
            Outline::Circle(c) => Some(c.radius),
            Outline::Path(_) => None,
        }
    }
}

/// One rendered layer
#[derive(Debug, Clone)]
pub struct Shape {
    pub outline: Outline,
    pub style: PathOptions,
    /// Owned element handle; destroyed together with the shape
    pub element: ElementId,
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        self.outline.kind()
    }
}

/// Shapes of one renderer keyed by layer identity
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    shapes: HashMap<LayerId, Shape>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn get(&self, id: LayerId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn insert(&mut self, id: LayerId, shape: Shape) {
        self.shapes.insert(id, shape);
    }

    pub fn remove(&mut self, id: LayerId) -> Option<Shape> {
        self.shapes.remove(&id)
    }

    /// Remove every shape, handing them back for cleanup
    pub fn drain(&mut self) -> impl Iterator<Item = (LayerId, Shape)> + '_ {
        self.shapes.drain()
    }

    /// Registered circle shapes
    pub fn circles(&self) -> impl Iterator<Item = (LayerId, &Shape)> + '_ {
        self.shapes
            .iter()
            .filter(|(_, s)| s.kind() == ShapeKind::Circle)
            .map(|(&id, s)| (id, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn circle_writes_compensated_radius() {
        let mut doc = Document::new();
        let el = doc.create_element("circle").unwrap();
        let outline = Outline::Circle(CircleOutline {
            center: dvec2(10.0, 20.0),
            radius: 100.0,
        });
        outline
            .write(&mut doc, el, ZoomScale::try_new(2.0).unwrap())
            .unwrap();
        assert_eq!(doc.attribute(el, "cx"), Some("10"));
        assert_eq!(doc.attribute(el, "cy"), Some("20"));
        assert_eq!(doc.attribute(el, "r"), Some("50"));
        assert_eq!(doc.attribute(el, ORIG_RADIUS_ATTR), Some("100"));
    }

    #[test]
    fn path_writes_descriptor() {
        let mut doc = Document::new();
        let el = doc.create_element("path").unwrap();
        let outline = Outline::Path(PathOutline {
            rings: vec![vec![dvec2(0.0, 0.0), dvec2(1.0, 1.0)]],
            closed: true,
        });
        assert_eq!(outline.kind(), ShapeKind::Path);
        outline.write(&mut doc, el, ZoomScale::ONE).unwrap();
        assert_eq!(doc.attribute(el, "d"), Some("M0 0L1 1z"));
    }

    #[test]
    fn registry_lists_only_circles() {
        let mut doc = Document::new();
        let mut registry = ShapeRegistry::new();
        for (i, outline) in [
            Outline::Circle(CircleOutline {
                center: Point::ZERO,
                radius: 1.0,
            }),
            Outline::Path(PathOutline {
                rings: vec![],
                closed: false,
            }),
        ]
        .into_iter()
        .enumerate()
        {
            let element = doc.create_element(outline.kind().tag()).unwrap();
            registry.insert(
                LayerId(i as u64),
                Shape {
                    outline,
                    style: PathOptions::default(),
                    element,
                },
            );
        }
        let circles: Vec<LayerId> = registry.circles().map(|(id, _)| id).collect();
        assert_eq!(circles, vec![LayerId(0)]);
        assert_eq!(registry.len(), 2);
    }
}
