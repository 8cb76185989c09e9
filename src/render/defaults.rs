//! Default options and fixed attribute values (mirroring Leaflet's path defaults)

pub const COLOR: &str = "#3388ff";
pub const WEIGHT: f64 = 3.0;
pub const OPACITY: f64 = 1.0;
pub const LINE_CAP: &str = "round";
pub const LINE_JOIN: &str = "round";
pub const FILL_OPACITY: f64 = 0.2;
pub const FILL_RULE: &str = "evenodd";

pub const PANE: &str = "overlayPane";

/// Path descriptor used when there is no geometry to draw
pub const EMPTY_PATH: &str = "M0 0";
/// Transform of a freshly created root group
pub const IDENTITY_TRANSFORM: &str = "translate(0,0) scale(1,1)";
/// Attribute carrying a circle's unscaled radius
pub const ORIG_RADIUS_ATTR: &str = "data-orig-radius";

pub const ZOOM_ANIMATED_CLASS: &str = "leaflet-zoom-animated";
pub const INTERACTIVE_CLASS: &str = "leaflet-interactive";
