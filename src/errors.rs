//! Error types with diagnostics using miette
//!
//! The renderer works on geometry and style data that its host has already
//! validated, so the taxonomy stays small: bad zoom input, operations on
//! shapes that no longer exist, and element allocation failures.

use miette::Diagnostic;
use thiserror::Error;

use crate::dom::ElementId;
use crate::layer::LayerId;
use crate::render::ShapeKind;

// ============================================================================
// Document Errors
// ============================================================================

/// Errors raised by the element arena
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("element allocation failed: document is limited to {limit} live elements")]
    #[diagnostic(
        code(zoomsvg::dom::allocation_failed),
        help("remove layers or raise the document's element limit")
    )]
    AllocationFailed { limit: usize },

    #[error("unknown element {id}")]
    #[diagnostic(code(zoomsvg::dom::unknown_element))]
    UnknownElement { id: ElementId },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that occur while rendering or updating shapes
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid zoom value: {value}")]
    #[diagnostic(
        code(zoomsvg::render::invalid_zoom),
        help("zoom levels must be finite; the previous transform was kept")
    )]
    InvalidZoomValue { value: f64 },

    #[error("no element for layer {id}")]
    #[diagnostic(
        code(zoomsvg::render::missing_element),
        help("the shape was never created or has already been detached")
    )]
    MissingElement { id: LayerId },

    #[error("layer {id} already has a shape")]
    #[diagnostic(code(zoomsvg::render::duplicate_shape))]
    DuplicateShape { id: LayerId },

    #[error("layer {id} was created as a {expected} and cannot be redrawn as a {got}")]
    #[diagnostic(
        code(zoomsvg::render::kind_mismatch),
        help("detach the shape and create it again to change its kind")
    )]
    KindMismatch {
        id: LayerId,
        expected: ShapeKind,
        got: ShapeKind,
    },

    #[error("renderer is not attached to a map")]
    #[diagnostic(code(zoomsvg::render::not_attached))]
    NotAttached,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dom(#[from] DomError),
}
