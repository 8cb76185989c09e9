//! Interfaces a renderer consumes from the map that hosts it.
//!
//! The renderer never reaches into host internals; everything it needs
//! (projection, zoom, the element tree, hit-test registration, zoom
//! notifications) comes through these traits.

use crate::dom::{Document, ElementId};
use crate::errors::DomError;
use crate::layer::LayerId;
use crate::types::{LatLng, Point};

/// Read-only view state
pub trait MapView {
    /// Current zoom level
    fn zoom(&self) -> f64;

    /// Absolute pixel coordinate of `latlng` at `zoom`
    fn project(&self, latlng: LatLng, zoom: f64) -> Point;

    /// Absolute pixel coordinate of the layer space origin at the current zoom
    fn pixel_origin(&self) -> Point;

    /// Position of `latlng` in layer space at the current zoom, unrounded
    fn lat_lng_to_layer_point(&self, latlng: LatLng) -> Point {
        self.project(latlng, self.zoom()) - self.pixel_origin()
    }
}

/// Token returned by [`Host::subscribe_zoom`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(pub u64);

/// Everything a renderer may mutate on its host
pub trait Host: MapView {
    fn document(&self) -> &Document;

    fn document_mut(&mut self) -> &mut Document;

    /// The pane element called `name`, created on first use
    fn pane(&mut self, name: &str) -> Result<ElementId, DomError>;

    /// Register for zoom-change notifications
    fn subscribe_zoom(&mut self) -> Subscription;

    /// Drop a registration; unknown tokens are ignored
    fn unsubscribe_zoom(&mut self, subscription: Subscription);

    /// Make `element` a hit-test target that resolves to `layer`
    fn add_interactive_target(&mut self, layer: LayerId, element: ElementId);

    fn remove_interactive_target(&mut self, layer: LayerId, element: ElementId);
}
