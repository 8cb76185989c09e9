//! Radius compensation for circle markers.
//!
//! The root group scales every length by `s`, radii included. Writing
//! `r = orig / s` cancels that, so a marker's on-screen radius stays `orig`
//! at every zoom.

use super::defaults::ORIG_RADIUS_ATTR;
use super::shapes::ShapeRegistry;
use crate::dom::Document;
use crate::errors::DomError;
use crate::log::{trace, warn};
use crate::types::{ZoomScale, fmt_num};

/// Rewrite the displayed radius of every registered circle for `scale`.
///
/// The unscaled radius is read back from the element's metadata attribute;
/// if that is missing or unreadable the shape's own base radius is used.
/// Calling this twice with the same scale writes the same values.
pub fn recompute_all_radii(
    doc: &mut Document,
    shapes: &ShapeRegistry,
    scale: ZoomScale,
) -> Result<usize, DomError> {
    let mut count = 0;
    for (_, shape) in shapes.circles() {
        let stored = doc
            .attribute(shape.element, ORIG_RADIUS_ATTR)
            .and_then(|r| r.parse::<f64>().ok());
        let orig = match (stored, shape.outline.radius()) {
            (Some(r), _) => r,
            (None, Some(r)) => {
                warn!(
                    element = %shape.element,
                    "unreadable {}, using base radius",
                    ORIG_RADIUS_ATTR
                );
                doc.set_attribute(shape.element, ORIG_RADIUS_ATTR, fmt_num(r))?;
                r
            }
            (None, None) => continue,
        };
        doc.set_attribute(shape.element, "r", fmt_num(scale.compensate(orig)))?;
        count += 1;
    }
    trace!(count, scale = %scale, "recomputed circle radii");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{LayerId, PathOptions};
    use crate::render::shapes::{CircleOutline, Outline, Shape};
    use crate::types::Point;

    fn setup(radius: f64) -> (Document, ShapeRegistry, crate::dom::ElementId) {
        let mut doc = Document::new();
        let element = doc.create_element("circle").unwrap();
        doc.set_attribute(element, ORIG_RADIUS_ATTR, fmt_num(radius))
            .unwrap();
        let mut shapes = ShapeRegistry::new();
        shapes.insert(
            LayerId(1),
            Shape {
                outline: Outline::Circle(CircleOutline {
                    center: Point::ZERO,
                    radius,
                }),
                style: PathOptions::default(),
                element,
            },
        );
        (doc, shapes, element)
    }

    #[test]
    fn halves_radius_at_zoom_delta_one() {
        let (mut doc, shapes, el) = setup(100.0);
        let scale = ZoomScale::try_new(2.0).unwrap();
        assert_eq!(recompute_all_radii(&mut doc, &shapes, scale).unwrap(), 1);
        assert_eq!(doc.attribute(el, "r"), Some("50"));
        recompute_all_radii(&mut doc, &shapes, ZoomScale::ONE).unwrap();
        assert_eq!(doc.attribute(el, "r"), Some("100"));
    }

    #[test]
    fn idempotent() {
        let (mut doc, shapes, el) = setup(7.5);
        let scale = ZoomScale::try_new(0.25).unwrap();
        recompute_all_radii(&mut doc, &shapes, scale).unwrap();
        let once = doc.to_svg_string(el).unwrap();
        recompute_all_radii(&mut doc, &shapes, scale).unwrap();
        assert_eq!(doc.to_svg_string(el).unwrap(), once);
        assert_eq!(doc.attribute(el, "r"), Some("30"));
    }

    #[test]
    fn falls_back_to_base_radius() {
        let (mut doc, shapes, el) = setup(40.0);
        doc.set_attribute(el, ORIG_RADIUS_ATTR, "bogus").unwrap();
        recompute_all_radii(&mut doc, &shapes, ZoomScale::try_new(4.0).unwrap()).unwrap();
        assert_eq!(doc.attribute(el, "r"), Some("10"));
        assert_eq!(doc.attribute(el, ORIG_RADIUS_ATTR), Some("40"));
    }
}
