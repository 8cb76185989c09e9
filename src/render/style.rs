//! Presentation attributes from [`PathOptions`].

use super::defaults::FILL_RULE;
use crate::dom::{Document, ElementId};
use crate::errors::DomError;
use crate::layer::PathOptions;
use crate::types::fmt_num;

/// Project `options` onto the element's presentation attributes.
///
/// Disabled stroke or fill is written as `none` so nothing from a previous
/// style survives.
pub fn apply_style(
    doc: &mut Document,
    element: ElementId,
    options: &PathOptions,
) -> Result<(), DomError> {
    if options.stroke {
        // The root group is scaled on zoom; stroke widths must not follow it.
        doc.set_attribute(element, "vector-effect", "non-scaling-stroke")?;
        doc.set_attribute(element, "stroke", options.color.as_str())?;
        doc.set_attribute(element, "stroke-opacity", fmt_num(options.opacity))?;
        doc.set_attribute(element, "stroke-width", fmt_num(options.weight))?;
        set_or_remove(doc, element, "stroke-linecap", options.line_cap.as_deref())?;
        set_or_remove(doc, element, "stroke-linejoin", options.line_join.as_deref())?;
        set_or_remove(doc, element, "stroke-dasharray", options.dash_array.as_deref())?;
        set_or_remove(doc, element, "stroke-dashoffset", options.dash_offset.as_deref())?;
    } else {
        doc.set_attribute(element, "stroke", "none")?;
    }

    if options.fill {
        let color = options.fill_color.as_deref().unwrap_or(&options.color);
        doc.set_attribute(element, "fill", color)?;
        doc.set_attribute(element, "fill-opacity", fmt_num(options.fill_opacity))?;
        doc.set_attribute(
            element,
            "fill-rule",
            options.fill_rule.as_deref().unwrap_or(FILL_RULE),
        )?;
    } else {
        doc.set_attribute(element, "fill", "none")?;
    }
    Ok(())
}

fn set_or_remove(
    doc: &mut Document,
    element: ElementId,
    name: &str,
    value: Option<&str>,
) -> Result<(), DomError> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => doc.set_attribute(element, name, v),
        None => doc.remove_attribute(element, name),
    }
}
