//! Zoom-following SVG renderer
//!
//! This module is organized into submodules:
//! - `defaults`: Default options and fixed attribute values
//! - `path`: Ring to path descriptor serialization
//! - `transform`: Reference frame and group transform
//! - `shapes`: Shape entities, outlines and the shape registry
//! - `radius`: Circle radius compensation
//! - `style`: Presentation attributes from path options

pub mod defaults;
pub mod path;
pub mod radius;
pub mod shapes;
pub mod style;
pub mod transform;

// Re-export commonly used items
pub use path::points_to_path;
pub use radius::recompute_all_radii;
pub use shapes::{CircleOutline, Draw, Outline, PathOutline, Shape, ShapeKind, ShapeRegistry};
pub use style::apply_style;
pub use transform::{ReferenceFrame, TransformState};

use crate::dom::{Document, ElementId};
use crate::errors::{DomError, RenderError};
use crate::host::{Host, Subscription};
use crate::layer::{Layer, LayerId, PathOptions};
use crate::log::{debug, trace};
use crate::types::Zoom;

/// What a host needs from a vector renderer.
///
/// Every call gets the host explicitly; renderers keep no reference to it.
pub trait VectorRenderer {
    /// Create the container, snapshot the view and start following zoom
    fn on_add(&mut self, host: &mut dyn Host) -> Result<(), RenderError>;

    /// Stop following zoom and destroy every element this renderer owns
    fn on_remove(&mut self, host: &mut dyn Host);

    /// Recompute the group transform; `None` means the host's current zoom
    fn on_zoom_change(&mut self, host: &mut dyn Host, zoom: Option<f64>)
    -> Result<(), RenderError>;

    fn create_shape(&mut self, host: &mut dyn Host, layer: &Layer) -> Result<(), RenderError>;

    fn attach_shape(&mut self, host: &mut dyn Host, id: LayerId) -> Result<(), RenderError>;

    /// Idempotent: unknown shapes are ignored
    fn detach_shape(&mut self, host: &mut dyn Host, id: LayerId);

    fn update_geometry(&mut self, host: &mut dyn Host, layer: &Layer) -> Result<(), RenderError>;

    fn apply_style(
        &mut self,
        host: &mut dyn Host,
        id: LayerId,
        options: &PathOptions,
    ) -> Result<(), RenderError>;

    fn bring_to_front(&mut self, host: &mut dyn Host, id: LayerId) -> Result<(), RenderError>;

    fn bring_to_back(&mut self, host: &mut dyn Host, id: LayerId) -> Result<(), RenderError>;

    /// Whether the host must hand over unrounded, unsimplified and unclipped
    /// geometry
    fn preserves_geometry(&self) -> bool {
        false
    }
}

/// Renderer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RendererOptions {
    /// Pane the container is appended to
    pub pane: String,
    /// Mark the container for animated zoom
    pub zoom_animation: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            pane: defaults::PANE.to_string(),
            zoom_animation: true,
        }
    }
}

impl RendererOptions {
    pub fn with_pane(mut self, pane: impl Into<String>) -> Self {
        self.pane = pane.into();
        self
    }

    pub fn with_zoom_animation(mut self, zoom_animation: bool) -> Self {
        self.zoom_animation = zoom_animation;
        self
    }
}

/// The `svg` element and the root group carrying the zoom transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    pub svg: ElementId,
    pub root_group: ElementId,
}

/// SVG renderer that follows zoom with a single group transform.
///
/// Shapes are drawn once in the reference frame captured by
/// [`VectorRenderer::on_add`]; zoom changes only rewrite the root group's
/// transform and the radii of circle markers.
#[derive(Debug, Default)]
pub struct ZoomSvg {
    options: RendererOptions,
    container: Option<Container>,
    frame: Option<ReferenceFrame>,
    transform: TransformState,
    shapes: ShapeRegistry,
    subscription: Option<Subscription>,
}

/// Construct a [`ZoomSvg`] renderer
pub fn zoom_svg(options: RendererOptions) -> ZoomSvg {
    ZoomSvg::new(options)
}

impl ZoomSvg {
    pub fn new(options: RendererOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn container(&self) -> Option<Container> {
        self.container
    }

    pub fn frame(&self) -> Option<&ReferenceFrame> {
        self.frame.as_ref()
    }

    /// Transform applied by the last successful zoom update
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    pub fn is_attached(&self) -> bool {
        self.frame.is_some()
    }

    /// Element of a registered shape
    pub fn element(&self, id: LayerId) -> Option<ElementId> {
        self.shapes.get(id).map(|s| s.element)
    }

    fn init_container(&mut self, host: &mut dyn Host) -> Result<Container, RenderError> {
        let svg = host.document_mut().create_element("svg")?;
        let container = match self.build_container(host, svg) {
            Ok(c) => c,
            Err(e) => {
                host.document_mut().destroy(svg);
                return Err(e);
            }
        };
        self.container = Some(container);
        debug!(svg = %svg, pane = %self.options.pane, "created container");
        Ok(container)
    }

    /// Fill in a fresh `svg` element and hang it into the pane
    fn build_container(
        &self,
        host: &mut dyn Host,
        svg: ElementId,
    ) -> Result<Container, RenderError> {
        let doc = host.document_mut();
        let root_group = doc.create_element("g")?;
        doc.append_child(svg, root_group)?;
        doc.set_attribute(svg, "pointer-events", "none")?;
        doc.set_attribute(svg, "overflow", "visible")?;
        if self.options.zoom_animation {
            doc.add_class(svg, defaults::ZOOM_ANIMATED_CLASS)?;
        }
        doc.set_attribute(root_group, "transform", defaults::IDENTITY_TRANSFORM)?;

        let pane = host.pane(&self.options.pane)?;
        host.document_mut().append_child(pane, svg)?;
        Ok(Container { svg, root_group })
    }

    /// The container, re-created if a previous detach destroyed it.
    ///
    /// A re-created root group gets the transform for the host's current
    /// zoom, or the last good one if that zoom is unusable.
    fn ensure_container(&mut self, host: &mut dyn Host) -> Result<Container, RenderError> {
        if let Some(c) = self.container {
            if host.document().contains(c.root_group) {
                return Ok(c);
            }
        }
        let container = self.init_container(host)?;
        if let Some(frame) = self.frame {
            let state = Zoom::try_new(host.zoom())
                .ok()
                .and_then(|zoom| TransformState::compute(&frame, &*host, zoom).ok())
                .unwrap_or(self.transform);
            self.write_transform(host.document_mut(), container, state)?;
        }
        Ok(container)
    }

    /// Set the root group transform and bring circle radii in line with it
    fn write_transform(
        &mut self,
        doc: &mut Document,
        container: Container,
        state: TransformState,
    ) -> Result<(), RenderError> {
        doc.set_attribute(container.root_group, "transform", state.to_attribute())?;
        self.transform = state;
        recompute_all_radii(doc, &self.shapes, state.scale)?;
        Ok(())
    }

    fn destroy_container(&mut self, host: &mut dyn Host) {
        if let Some(c) = self.container.take() {
            host.document_mut().destroy(c.svg);
            debug!(svg = %c.svg, "destroyed container");
        }
    }

    fn shape(&self, id: LayerId) -> Result<&Shape, RenderError> {
        self.shapes.get(id).ok_or(RenderError::MissingElement { id })
    }
}

/// Classes and initial style of a freshly allocated shape element
fn init_element(
    doc: &mut Document,
    element: ElementId,
    options: &PathOptions,
) -> Result<(), DomError> {
    if let Some(class_name) = &options.class_name {
        doc.add_class(element, class_name)?;
    }
    if options.interactive {
        doc.add_class(element, defaults::INTERACTIVE_CLASS)?;
    }
    apply_style(doc, element, options)
}

impl VectorRenderer for ZoomSvg {
    fn on_add(&mut self, host: &mut dyn Host) -> Result<(), RenderError> {
        // The frame is fixed for as long as the renderer stays attached
        if self.frame.is_some() {
            return Ok(());
        }
        let zoom = host.zoom();
        let frame = ReferenceFrame::capture(&*host)
            .ok_or(RenderError::InvalidZoomValue { value: zoom })?;
        self.frame = Some(frame);
        self.transform = TransformState::IDENTITY;
        if let Err(e) = self.ensure_container(host) {
            self.destroy_container(host);
            self.frame = None;
            return Err(e);
        }
        if self.subscription.is_none() {
            self.subscription = Some(host.subscribe_zoom());
        }
        debug!(origin_zoom = %frame.origin_zoom(), "attached");
        self.on_zoom_change(host, None)
    }

    fn on_remove(&mut self, host: &mut dyn Host) {
        if let Some(sub) = self.subscription.take() {
            host.unsubscribe_zoom(sub);
        }
        let shapes: Vec<(LayerId, Shape)> = self.shapes.drain().collect();
        for (id, shape) in shapes {
            host.remove_interactive_target(id, shape.element);
            host.document_mut().destroy(shape.element);
        }
        self.destroy_container(host);
        self.frame = None;
        self.transform = TransformState::IDENTITY;
        debug!("detached");
    }

    fn on_zoom_change(
        &mut self,
        host: &mut dyn Host,
        zoom: Option<f64>,
    ) -> Result<(), RenderError> {
        let frame = self.frame.ok_or(RenderError::NotAttached)?;
        let value = zoom.unwrap_or_else(|| host.zoom());
        let zoom = Zoom::try_new(value).map_err(|_| RenderError::InvalidZoomValue { value })?;
        let state = TransformState::compute(&frame, &*host, zoom)
            .map_err(|_| RenderError::InvalidZoomValue { value })?;

        let container = self.ensure_container(host)?;
        self.write_transform(host.document_mut(), container, state)?;
        trace!(zoom = %zoom, scale = %state.scale, "group transform updated");
        Ok(())
    }

    fn create_shape(&mut self, host: &mut dyn Host, layer: &Layer) -> Result<(), RenderError> {
        let frame = self.frame.ok_or(RenderError::NotAttached)?;
        if self.shapes.contains(layer.id) {
            return Err(RenderError::DuplicateShape { id: layer.id });
        }
        let outline = Outline::project(&frame, &*host, &layer.geometry);

        let doc = host.document_mut();
        let element = doc.create_element(outline.kind().tag())?;
        if let Err(e) = init_element(doc, element, &layer.options) {
            doc.destroy(element);
            return Err(e.into());
        }

        debug!(layer = %layer.id, kind = %outline.kind(), element = %element, "created shape");
        self.shapes.insert(
            layer.id,
            Shape {
                outline,
                style: layer.options.clone(),
                element,
            },
        );
        Ok(())
    }

    fn attach_shape(&mut self, host: &mut dyn Host, id: LayerId) -> Result<(), RenderError> {
        let element = self.shape(id)?.element;
        let container = self.ensure_container(host)?;
        host.document_mut().append_child(container.root_group, element)?;
        host.add_interactive_target(id, element);
        Ok(())
    }

    fn detach_shape(&mut self, host: &mut dyn Host, id: LayerId) {
        let Some(shape) = self.shapes.remove(id) else {
            return;
        };
        host.document_mut().destroy(shape.element);
        host.remove_interactive_target(id, shape.element);
        debug!(layer = %id, "detached shape");
    }

    fn update_geometry(&mut self, host: &mut dyn Host, layer: &Layer) -> Result<(), RenderError> {
        let frame = self.frame.ok_or(RenderError::NotAttached)?;
        let expected = self.shape(layer.id)?.kind();
        if layer.kind() != expected {
            return Err(RenderError::KindMismatch {
                id: layer.id,
                expected,
                got: layer.kind(),
            });
        }
        let outline = Outline::project(&frame, &*host, &layer.geometry);
        let scale = self.transform.scale;
        let shape = self
            .shapes
            .get_mut(layer.id)
            .ok_or(RenderError::MissingElement { id: layer.id })?;
        outline.write(host.document_mut(), shape.element, scale)?;
        shape.outline = outline;
        Ok(())
    }

    fn apply_style(
        &mut self,
        host: &mut dyn Host,
        id: LayerId,
        options: &PathOptions,
    ) -> Result<(), RenderError> {
        let shape = self
            .shapes
            .get_mut(id)
            .ok_or(RenderError::MissingElement { id })?;
        apply_style(host.document_mut(), shape.element, options)?;
        shape.style = options.clone();
        Ok(())
    }

    fn bring_to_front(&mut self, host: &mut dyn Host, id: LayerId) -> Result<(), RenderError> {
        let element = self.shape(id)?.element;
        host.document_mut().to_front(element)?;
        Ok(())
    }

    fn bring_to_back(&mut self, host: &mut dyn Host, id: LayerId) -> Result<(), RenderError> {
        let element = self.shape(id)?.element;
        host.document_mut().to_back(element)?;
        Ok(())
    }

    fn preserves_geometry(&self) -> bool {
        true
    }
}
