//! A minimal host map.
//!
//! Owns the element tree, the view (center, zoom, size), a Spherical Mercator
//! projection and the layer table, and drives one [`VectorRenderer`]. Zoom
//! notifications are delivered synchronously to the renderer while it holds
//! a subscription.

use std::collections::{BTreeSet, HashMap};
use std::f64::consts::PI;

use glam::dvec2;

use crate::dom::{Document, ElementId};
use crate::errors::{DomError, RenderError};
use crate::host::{Host, MapView, Subscription};
use crate::layer::{Geometry, Layer, LayerId, PathOptions};
use crate::log::debug;
use crate::render::VectorRenderer;
use crate::types::{LatLng, Point};

/// Side of a square map tile in pixels
pub const TILE_SIZE: f64 = 256.0;
const EARTH_RADIUS: f64 = 6_378_137.0;
const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Spherical Mercator (EPSG:3857) projection to absolute pixels at `zoom`
pub fn project(latlng: LatLng, zoom: f64) -> Point {
    let d = PI / 180.0;
    let lat = latlng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin = (lat * d).sin();
    let x = EARTH_RADIUS * latlng.lng * d;
    let y = EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;

    let k = 0.5 / (PI * EARTH_RADIUS);
    let scale = TILE_SIZE * zoom.exp2();
    dvec2(scale * (k * x + 0.5), scale * (-k * y + 0.5))
}

/// Initial view of a map
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: f64,
    /// Viewport size in pixels
    pub size: Point,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: LatLng::ORIGIN,
            zoom: 0.0,
            size: dvec2(800.0, 600.0),
        }
    }
}

impl MapOptions {
    pub fn with_center(mut self, center: LatLng) -> Self {
        self.center = center;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = dvec2(width, height);
        self
    }
}

/// View state and collaborator bookkeeping handed to the renderer as its
/// [`Host`]
#[derive(Debug)]
pub struct MapState {
    center: LatLng,
    zoom: f64,
    size: Point,
    pixel_origin: Point,
    /// Keep the pixel origin unrounded for renderers that preserve geometry
    exact_pixel_origin: bool,
    document: Document,
    container: ElementId,
    panes: HashMap<String, ElementId>,
    zoom_listeners: BTreeSet<Subscription>,
    next_subscription: u64,
    interactive_targets: HashMap<ElementId, LayerId>,
}

impl MapState {
    fn new(
        options: &MapOptions,
        mut document: Document,
        exact_pixel_origin: bool,
    ) -> Result<Self, DomError> {
        let container = document.create_element("div")?;
        document.add_class(container, "leaflet-container")?;
        let mut state = Self {
            center: options.center,
            zoom: options.zoom,
            size: options.size,
            pixel_origin: Point::ZERO,
            exact_pixel_origin,
            document,
            container,
            panes: HashMap::new(),
            zoom_listeners: BTreeSet::new(),
            next_subscription: 0,
            interactive_targets: HashMap::new(),
        };
        state.reset_pixel_origin();
        Ok(state)
    }

    fn reset_pixel_origin(&mut self) {
        let origin = project(self.center, self.zoom) - self.size / 2.0;
        self.pixel_origin = if self.exact_pixel_origin {
            origin
        } else {
            origin.round()
        };
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn size(&self) -> Point {
        self.size
    }

    /// The map's outermost element
    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn has_zoom_listeners(&self) -> bool {
        !self.zoom_listeners.is_empty()
    }

    /// Layer a hit on `element` resolves to
    pub fn interactive_target(&self, element: ElementId) -> Option<LayerId> {
        self.interactive_targets.get(&element).copied()
    }

    pub fn interactive_target_count(&self) -> usize {
        self.interactive_targets.len()
    }
}

impl MapView for MapState {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn project(&self, latlng: LatLng, zoom: f64) -> Point {
        project(latlng, zoom)
    }

    fn pixel_origin(&self) -> Point {
        self.pixel_origin
    }
}

impl Host for MapState {
    fn document(&self) -> &Document {
        &self.document
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn pane(&mut self, name: &str) -> Result<ElementId, DomError> {
        if let Some(&pane) = self.panes.get(name) {
            return Ok(pane);
        }
        let pane = self.document.create_element("div")?;
        self.document.add_class(pane, "leaflet-pane")?;
        self.document.set_attribute(pane, "data-pane", name)?;
        self.document.append_child(self.container, pane)?;
        self.panes.insert(name.to_string(), pane);
        Ok(pane)
    }

    fn subscribe_zoom(&mut self) -> Subscription {
        let sub = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.zoom_listeners.insert(sub);
        sub
    }

    fn unsubscribe_zoom(&mut self, subscription: Subscription) {
        self.zoom_listeners.remove(&subscription);
    }

    fn add_interactive_target(&mut self, layer: LayerId, element: ElementId) {
        self.interactive_targets.insert(element, layer);
    }

    fn remove_interactive_target(&mut self, layer: LayerId, element: ElementId) {
        if self.interactive_targets.get(&element) == Some(&layer) {
            self.interactive_targets.remove(&element);
        }
    }
}

/// A map with one vector renderer and its layers
#[derive(Debug)]
pub struct Map<R> {
    state: MapState,
    renderer: R,
    renderer_attached: bool,
    layers: HashMap<LayerId, Layer>,
    next_layer: u64,
}

impl<R: VectorRenderer> Map<R> {
    /// Create a map and attach `renderer` to it
    pub fn new(options: MapOptions, renderer: R) -> Result<Self, RenderError> {
        Self::with_document(options, Document::new(), renderer)
    }

    /// Like [`Map::new`], rendering into an existing document
    pub fn with_document(
        options: MapOptions,
        document: Document,
        renderer: R,
    ) -> Result<Self, RenderError> {
        if !options.zoom.is_finite() {
            return Err(RenderError::InvalidZoomValue {
                value: options.zoom,
            });
        }
        let state = MapState::new(&options, document, renderer.preserves_geometry())?;
        let mut map = Self {
            state,
            renderer,
            renderer_attached: false,
            layers: HashMap::new(),
            next_layer: 0,
        };
        map.add_renderer()?;
        Ok(map)
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn pixel_origin(&self) -> Point {
        self.state.pixel_origin
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The pane element called `name`, created on first use
    pub fn pane(&mut self, name: &str) -> Result<ElementId, DomError> {
        self.state.pane(name)
    }

    /// Attach the renderer and draw every known layer
    pub fn add_renderer(&mut self) -> Result<(), RenderError> {
        if self.renderer_attached {
            return Ok(());
        }
        self.renderer.on_add(&mut self.state)?;
        self.renderer_attached = true;
        let mut ids: Vec<LayerId> = self.layers.keys().copied().collect();
        ids.sort();
        for id in ids {
            if let Some(layer) = self.layers.get(&id) {
                render_layer(&mut self.renderer, &mut self.state, layer)?;
            }
        }
        Ok(())
    }

    /// Detach the renderer; layers stay in the table
    pub fn remove_renderer(&mut self) {
        if self.renderer_attached {
            self.renderer.on_remove(&mut self.state);
            self.renderer_attached = false;
        }
    }

    /// Add a layer with explicit options
    pub fn add_layer_with(
        &mut self,
        geometry: Geometry,
        options: PathOptions,
    ) -> Result<LayerId, RenderError> {
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        let layer = Layer::new(id, geometry).with_options(options);
        if self.renderer_attached {
            render_layer(&mut self.renderer, &mut self.state, &layer)?;
        }
        debug!(layer = %id, "added layer");
        self.layers.insert(id, layer);
        Ok(id)
    }

    /// Add a layer with the default options for its geometry
    pub fn add_layer(&mut self, geometry: Geometry) -> Result<LayerId, RenderError> {
        let options = PathOptions::for_geometry(&geometry);
        self.add_layer_with(geometry, options)
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        self.renderer.detach_shape(&mut self.state, id);
        self.layers.remove(&id)
    }

    pub fn set_layer_style(
        &mut self,
        id: LayerId,
        options: PathOptions,
    ) -> Result<(), RenderError> {
        let layer = self
            .layers
            .get_mut(&id)
            .ok_or(RenderError::MissingElement { id })?;
        layer.options = options;
        if self.renderer_attached {
            self.renderer
                .apply_style(&mut self.state, id, &layer.options)?;
        }
        Ok(())
    }

    /// Replace a layer's geometry, re-creating its shape if the kind changes
    pub fn set_layer_geometry(
        &mut self,
        id: LayerId,
        geometry: Geometry,
    ) -> Result<(), RenderError> {
        let layer = self
            .layers
            .get_mut(&id)
            .ok_or(RenderError::MissingElement { id })?;
        let kind_changed = layer.kind() != geometry.kind();
        layer.geometry = geometry;
        if !self.renderer_attached {
            return Ok(());
        }
        if kind_changed {
            self.renderer.detach_shape(&mut self.state, id);
            render_layer(&mut self.renderer, &mut self.state, layer)
        } else {
            self.renderer.update_geometry(&mut self.state, layer)
        }
    }

    pub fn bring_to_front(&mut self, id: LayerId) -> Result<(), RenderError> {
        self.renderer.bring_to_front(&mut self.state, id)
    }

    pub fn bring_to_back(&mut self, id: LayerId) -> Result<(), RenderError> {
        self.renderer.bring_to_back(&mut self.state, id)
    }

    /// Zoom around the current center
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), RenderError> {
        let center = self.state.center;
        self.set_view(center, zoom)
    }

    /// Move the view and notify the renderer.
    ///
    /// The view is only committed if the renderer accepts the new zoom.
    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<(), RenderError> {
        if !zoom.is_finite() {
            return Err(RenderError::InvalidZoomValue { value: zoom });
        }
        let previous = (self.state.center, self.state.zoom, self.state.pixel_origin);
        self.state.center = center;
        self.state.zoom = zoom;
        self.state.reset_pixel_origin();

        let accepted = if self.state.pixel_origin.is_finite() {
            self.fire_zoom(Some(zoom))
        } else {
            Err(RenderError::InvalidZoomValue { value: zoom })
        };
        if accepted.is_err() {
            (self.state.center, self.state.zoom, self.state.pixel_origin) = previous;
        }
        accepted
    }

    /// Deliver a zoom notification as-is; `None` means "use the current zoom"
    pub fn fire_zoom(&mut self, zoom: Option<f64>) -> Result<(), RenderError> {
        if self.state.has_zoom_listeners() {
            self.renderer.on_zoom_change(&mut self.state, zoom)?;
        }
        Ok(())
    }
}

/// Create, attach and draw the shape for one layer, cleaning up on failure
fn render_layer<R: VectorRenderer>(
    renderer: &mut R,
    state: &mut MapState,
    layer: &Layer,
) -> Result<(), RenderError> {
    renderer.create_shape(state, layer)?;
    let drawn = renderer
        .attach_shape(state, layer.id)
        .and_then(|()| renderer.update_geometry(state, layer));
    if drawn.is_err() {
        renderer.detach_shape(state, layer.id);
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_of_origin_is_world_center() {
        assert_eq!(project(LatLng::ORIGIN, 0.0), dvec2(128.0, 128.0));
        assert_eq!(project(LatLng::ORIGIN, 2.0), dvec2(512.0, 512.0));
    }

    #[test]
    fn projection_doubles_per_zoom_level() {
        let ll = LatLng::new(51.5, -0.12);
        let a = project(ll, 3.0);
        let b = project(ll, 4.0);
        assert!((b - a * 2.0).length() < 1e-9);
    }

    #[test]
    fn latitude_is_clamped() {
        let top = project(LatLng::new(90.0, 0.0), 0.0);
        assert!(top.y.is_finite());
        assert!(top.y.abs() < 1e-6);
    }

    #[test]
    fn panes_are_created_once() {
        let options = MapOptions::default();
        let mut state = MapState::new(&options, Document::new(), true).unwrap();
        let a = state.pane("overlayPane").unwrap();
        let b = state.pane("overlayPane").unwrap();
        assert_eq!(a, b);
        assert_eq!(state.document().parent(a), Some(state.container()));
    }

    #[test]
    fn pixel_origin_rounding_follows_renderer_contract() {
        let options = MapOptions::default()
            .with_center(LatLng::new(10.123, 20.456))
            .with_zoom(3.3);
        let exact = MapState::new(&options, Document::new(), true).unwrap();
        let rounded = MapState::new(&options, Document::new(), false).unwrap();
        assert_eq!(rounded.pixel_origin(), exact.pixel_origin().round());
        assert_ne!(exact.pixel_origin(), exact.pixel_origin().round());
    }

    #[test]
    fn subscriptions() {
        let mut state = MapState::new(&MapOptions::default(), Document::new(), true).unwrap();
        let a = state.subscribe_zoom();
        let b = state.subscribe_zoom();
        assert_ne!(a, b);
        state.unsubscribe_zoom(a);
        assert!(state.has_zoom_listeners());
        state.unsubscribe_zoom(b);
        state.unsubscribe_zoom(b);
        assert!(!state.has_zoom_listeners());
    }
}
