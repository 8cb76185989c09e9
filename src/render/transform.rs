//! Group-level zoom transform.
//!
//! Shapes are projected once into the [`ReferenceFrame`] captured on attach.
//! After that, following the map only takes one `translate(..) scale(..)` on
//! the root group, computed here.
//!
//! With `s = 2^(zoom - origin_zoom)`, `P0` the pixel origin at attach time and
//! `P` the current one, a reference point `q = project(ll, origin_zoom) - P0`
//! must land on `project(ll, zoom) - P = s * q + (s * P0 - P)`. The translate
//! is therefore `s * P0 - P`, computed as
//! `layerPoint(origin, zoom) - origin_shift * s`.

use crate::host::MapView;
use crate::types::{LatLng, NumericError, Point, Zoom, ZoomScale, fmt_num};

/// Snapshot of the view taken when the renderer attaches. Never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    origin_zoom: Zoom,
    origin_pixel_origin: Point,
    origin_shift: Point,
}

impl ReferenceFrame {
    /// Capture the frame from the host's current view.
    ///
    /// Returns `None` when the host reports a non-finite zoom.
    pub fn capture<V: MapView + ?Sized>(view: &V) -> Option<Self> {
        let origin_zoom = Zoom::try_new(view.zoom()).ok()?;
        let origin_pixel_origin = view.pixel_origin();
        let origin_shift =
            view.project(LatLng::ORIGIN, origin_zoom.raw()) - origin_pixel_origin;
        Some(Self {
            origin_zoom,
            origin_pixel_origin,
            origin_shift,
        })
    }

    pub fn origin_zoom(&self) -> Zoom {
        self.origin_zoom
    }

    /// Layer point of the geographic origin at the reference zoom
    pub fn origin_shift(&self) -> Point {
        self.origin_shift
    }

    /// Position of `latlng` in the reference frame's layer space
    pub fn project<V: MapView + ?Sized>(&self, view: &V, latlng: LatLng) -> Point {
        view.project(latlng, self.origin_zoom.raw()) - self.origin_pixel_origin
    }
}

/// Scale and translate of the root group for one zoom level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub zoom_delta: f64,
    pub scale: ZoomScale,
    pub translate: Point,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformState {
    pub const IDENTITY: TransformState = TransformState {
        zoom_delta: 0.0,
        scale: ZoomScale::ONE,
        translate: Point::ZERO,
    };

    /// Recompute the full state for `zoom`.
    ///
    /// Fails if the zoom delta is too large for the scale to stay finite and
    /// non-zero.
    pub fn compute<V: MapView + ?Sized>(
        frame: &ReferenceFrame,
        view: &V,
        zoom: Zoom,
    ) -> Result<Self, NumericError> {
        let scale = zoom.scale_from(frame.origin_zoom)?;
        let origin_now = view.project(LatLng::ORIGIN, zoom.raw()) - view.pixel_origin();
        let translate = origin_now - frame.origin_shift * scale.raw();
        Ok(Self {
            zoom_delta: zoom.raw() - frame.origin_zoom.raw(),
            scale,
            translate,
        })
    }

    /// The composed transform attribute: translate first, then scale
    pub fn to_attribute(&self) -> String {
        let s = fmt_num(self.scale.raw());
        format!(
            "translate({},{}) scale({},{})",
            fmt_num(self.translate.x),
            fmt_num(self.translate.y),
            s,
            s
        )
    }

    /// Where a reference-frame point ends up on screen under this transform
    pub fn apply(&self, p: Point) -> Point {
        p * self.scale.raw() + self.translate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    /// Linear projection: one pixel per degree at zoom 0, doubling per level
    struct FlatView {
        zoom: f64,
        pixel_origin: Point,
    }

    impl MapView for FlatView {
        fn zoom(&self) -> f64 {
            self.zoom
        }
        fn project(&self, ll: LatLng, zoom: f64) -> Point {
            dvec2(ll.lng + 180.0, 90.0 - ll.lat) * zoom.exp2()
        }
        fn pixel_origin(&self) -> Point {
            self.pixel_origin
        }
    }

    fn zoom(z: f64) -> Zoom {
        Zoom::try_new(z).unwrap()
    }

    #[test]
    fn identity_at_origin_zoom() {
        let view = FlatView {
            zoom: 2.0,
            pixel_origin: dvec2(100.0, 50.0),
        };
        let frame = ReferenceFrame::capture(&view).unwrap();
        let state = TransformState::compute(&frame, &view, zoom(2.0)).unwrap();
        assert_eq!(state, TransformState::IDENTITY);
        assert_eq!(state.to_attribute(), "translate(0,0) scale(1,1)");
    }

    #[test]
    fn transform_matches_direct_projection() {
        let mut view = FlatView {
            zoom: 2.0,
            pixel_origin: dvec2(100.0, 50.0),
        };
        let frame = ReferenceFrame::capture(&view).unwrap();
        let ll = LatLng::new(10.0, 20.0);
        let q = frame.project(&view, ll);

        view.zoom = 3.0;
        view.pixel_origin = dvec2(420.0, 260.0);
        let state = TransformState::compute(&frame, &view, zoom(3.0)).unwrap();
        assert_eq!(state.scale.raw(), 2.0);
        assert_eq!(state.apply(q), view.lat_lng_to_layer_point(ll));
        assert_eq!(state.to_attribute(), "translate(-220,-160) scale(2,2)");
    }

    #[test]
    fn attribute_is_idempotent() {
        let view = FlatView {
            zoom: 0.0,
            pixel_origin: dvec2(3.0, 7.0),
        };
        let frame = ReferenceFrame::capture(&view).unwrap();
        let a = TransformState::compute(&frame, &view, zoom(1.5)).unwrap();
        let b = TransformState::compute(&frame, &view, zoom(1.5)).unwrap();
        assert_eq!(a.to_attribute(), b.to_attribute());
    }

    #[test]
    fn capture_rejects_non_finite_zoom() {
        let view = FlatView {
            zoom: f64::NAN,
            pixel_origin: Point::ZERO,
        };
        assert!(ReferenceFrame::capture(&view).is_none());
    }
}
