//! Path descriptor serialization.
//!
//! Rings become straight-line subpaths: `M` for the first point, `L` for every
//! following one, and `z` after the ring when the shape is closed. There are
//! no curve commands, so polylines and polygons are drawn exactly as given.

use std::fmt::Write;

use super::defaults::EMPTY_PATH;
use crate::types::{Point, fmt_num};

/// Serialize rings into a path descriptor.
///
/// Never returns an empty string: without any points the result is a single
/// move to the origin.
pub fn points_to_path<R>(rings: &[R], closed: bool) -> String
where
    R: AsRef<[Point]>,
{
    let mut d = String::new();
    for ring in rings {
        let points = ring.as_ref();
        for (i, p) in points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            // Writing to a String cannot fail
            let _ = write!(d, "{}{} {}", cmd, fmt_num(p.x), fmt_num(p.y));
        }
        if closed && !points.is_empty() {
            d.push('z');
        }
    }
    if d.is_empty() {
        EMPTY_PATH.to_string()
    } else {
        d
    }
}
