//! Strongly-typed numeric primitives shared by the renderer and its host.
//!
//! Zoom levels and scale factors are newtypes so a raw `f64` coming from the
//! host has to pass validation before it can reach a transform.

use std::fmt;

use glam::DVec2;

/// A projected point in pixel space
pub type Point = DVec2;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Geographic coordinate in degrees
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// The geographic origin every reference frame is anchored to
    pub const ORIGIN: LatLng = LatLng { lat: 0.0, lng: 0.0 };

    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

/// A validated (finite) zoom level
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Zoom(f64);

impl Zoom {
    /// Create a zoom level with validation (rejects NaN/infinite)
    #[inline]
    pub fn try_new(val: f64) -> Result<Zoom, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else {
            Ok(Zoom(val))
        }
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Scale factor of this zoom relative to `origin`: `2^(self - origin)`.
    ///
    /// Fails when the difference is so large that the power of two leaves the
    /// finite, non-zero range of `f64`.
    pub fn scale_from(self, origin: Zoom) -> Result<ZoomScale, NumericError> {
        ZoomScale::try_new((self.0 - origin.0).exp2())
    }
}

impl fmt::Display for Zoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Uniform scale factor of the group transform (always finite and positive)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct ZoomScale(f64);

impl ZoomScale {
    pub const ONE: ZoomScale = ZoomScale(1.0);

    /// Create a scale with validation (rejects NaN, infinite, zero, negative)
    pub fn try_new(val: f64) -> Result<ZoomScale, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else if val == 0.0 {
            Err(NumericError::Zero)
        } else if val < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(ZoomScale(val))
        }
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Divide a group-space length so that the group scale cancels out
    #[inline]
    pub fn compensate(self, len: f64) -> f64 {
        len / self.0
    }
}

impl Default for ZoomScale {
    fn default() -> Self {
        ZoomScale::ONE
    }
}

impl fmt::Display for ZoomScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", fmt_num(self.0))
    }
}

/// Format a number for an SVG attribute.
///
/// Uses the shortest representation that round-trips, and folds `-0` into
/// `0` so equal transforms always produce equal strings.
pub fn fmt_num(val: f64) -> String {
    if val == 0.0 {
        "0".to_string()
    } else {
        format!("{}", val)
    }
}
