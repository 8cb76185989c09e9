//! zoomsvg - an SVG vector renderer for slippy maps that follows zoom with a
//! single group transform.
//!
//! Shapes are projected once, into a reference frame captured when the
//! renderer is attached. A zoom change rewrites one `transform` attribute on
//! the root group (`translate(tx,ty) scale(s,s)`) and the radius of each
//! circle marker, instead of re-projecting every vertex.
//!
//! ```
//! use zoomsvg::{Geometry, LatLng, Map, MapOptions, RendererOptions, zoom_svg};
//!
//! let options = MapOptions::default().with_zoom(3.0);
//! let mut map = Map::new(options, zoom_svg(RendererOptions::default()))?;
//! map.add_layer(Geometry::Point { center: LatLng::new(10.0, 10.0), radius: 8.0 })?;
//! map.set_zoom(4.0)?;
//! # Ok::<(), zoomsvg::RenderError>(())
//! ```

pub mod dom;
pub mod errors;
pub mod host;
pub mod layer;
pub mod log;
pub mod map;
pub mod render;
pub mod types;

pub use dom::{Document, ElementId};
pub use errors::{DomError, RenderError};
pub use host::{Host, MapView, Subscription};
pub use layer::{Geometry, Layer, LayerId, PathOptions};
pub use map::{Map, MapOptions, MapState};
pub use render::{
    Container, RendererOptions, ShapeKind, TransformState, VectorRenderer, ZoomSvg, zoom_svg,
};
pub use types::{LatLng, Point, Zoom, ZoomScale};
