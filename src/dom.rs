//! In-memory element arena standing in for the host's DOM.
//!
//! Elements are addressed by [`ElementId`] handles that are never reused, so
//! a handle to a destroyed element stays invalid forever instead of silently
//! aliasing a newer element.

use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::errors::DomError;

/// Handle to an element owned by a [`Document`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    /// Attributes in insertion order
    attrs: Vec<(String, String)>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A tree of elements with attributes, roughly the subset of the DOM a
/// vector renderer touches.
#[derive(Debug, Default)]
pub struct Document {
    elements: HashMap<ElementId, Element>,
    next_id: u64,
    limit: Option<usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document that refuses to hold more than `limit` live elements
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Number of live (not yet destroyed) elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Allocate a detached element
    pub fn create_element(&mut self, tag: &str) -> Result<ElementId, DomError> {
        if let Some(limit) = self.limit {
            if self.elements.len() >= limit {
                return Err(DomError::AllocationFailed { limit });
            }
        }
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, Element::new(tag));
        Ok(id)
    }

    fn get(&self, id: ElementId) -> Result<&Element, DomError> {
        self.elements.get(&id).ok_or(DomError::UnknownElement { id })
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element, DomError> {
        self.elements
            .get_mut(&id)
            .ok_or(DomError::UnknownElement { id })
    }

    pub fn tag(&self, id: ElementId) -> Result<&str, DomError> {
        Ok(self.get(id)?.tag.as_str())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements.get(&id).and_then(|el| el.parent)
    }

    /// Children in document order (empty for unknown elements)
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map(|el| el.children.as_slice())
            .unwrap_or(&[])
    }

    /// Append `child` as the last child of `parent`, moving it if it already
    /// has a parent.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), DomError> {
        self.get(parent)?;
        self.get(child)?;
        self.remove(child);
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Take an element out of the tree without destroying it.
    ///
    /// Unknown or already detached elements are ignored.
    pub fn remove(&mut self, id: ElementId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(el) = self.elements.get_mut(&id) {
            el.parent = None;
        }
    }

    /// Remove an element from the tree and free it together with its
    /// subtree. Destroying an unknown element is a no-op.
    pub fn destroy(&mut self, id: ElementId) {
        self.remove(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(el) = self.elements.remove(&next) {
                stack.extend(el.children);
            }
        }
    }

    pub fn set_attribute(
        &mut self,
        id: ElementId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let value = value.into();
        let el = self.get_mut(id)?;
        match el.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => el.attrs.push((name.to_string(), value)),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> Result<(), DomError> {
        self.get_mut(id)?.attrs.retain(|(n, _)| n != name);
        Ok(())
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements.get(&id).and_then(|el| el.attr(name))
    }

    /// Add one or more whitespace-separated classes
    pub fn add_class(&mut self, id: ElementId, names: &str) -> Result<(), DomError> {
        let mut classes: Vec<String> = self
            .attribute(id, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        for name in names.split_whitespace() {
            if !classes.iter().any(|c| c == name) {
                classes.push(name.to_string());
            }
        }
        self.set_attribute(id, "class", classes.join(" "))
    }

    pub fn has_class(&self, id: ElementId, name: &str) -> bool {
        self.attribute(id, "class")
            .is_some_and(|c| c.split_whitespace().any(|n| n == name))
    }

    /// Move an element after all of its siblings
    pub fn to_front(&mut self, id: ElementId) -> Result<(), DomError> {
        self.get(id)?;
        if let Some(parent) = self.parent(id) {
            let siblings = &mut self.get_mut(parent)?.children;
            siblings.retain(|&c| c != id);
            siblings.push(id);
        }
        Ok(())
    }

    /// Move an element before all of its siblings
    pub fn to_back(&mut self, id: ElementId) -> Result<(), DomError> {
        self.get(id)?;
        if let Some(parent) = self.parent(id) {
            let siblings = &mut self.get_mut(parent)?.children;
            siblings.retain(|&c| c != id);
            siblings.insert(0, id);
        }
        Ok(())
    }

    /// Serialize an element and its subtree as markup
    pub fn to_svg_string(&self, id: ElementId) -> Result<String, DomError> {
        let mut out = String::new();
        self.write_element(&mut out, id)?;
        Ok(out)
    }

    fn write_element(&self, out: &mut String, id: ElementId) -> Result<(), DomError> {
        let el = self.get(id)?;
        out.push('<');
        out.push_str(&el.tag);
        for (name, value) in &el.attrs {
            // Writing to a String cannot fail
            let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
        }
        if el.children.is_empty() {
            out.push_str("/>");
            return Ok(());
        }
        out.push('>');
        for &child in &el.children {
            self.write_element(out, child)?;
        }
        let _ = write!(out, "</{}>", el.tag);
        Ok(())
    }
}

fn escape_attr(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_moves_between_parents() {
        let mut doc = Document::new();
        let a = doc.create_element("g").unwrap();
        let b = doc.create_element("g").unwrap();
        let c = doc.create_element("path").unwrap();
        doc.append_child(a, c).unwrap();
        doc.append_child(b, c).unwrap();
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[c]);
        assert_eq!(doc.parent(c), Some(b));
    }

    #[test]
    fn destroy_frees_subtree() {
        let mut doc = Document::new();
        let svg = doc.create_element("svg").unwrap();
        let g = doc.create_element("g").unwrap();
        let p = doc.create_element("path").unwrap();
        doc.append_child(svg, g).unwrap();
        doc.append_child(g, p).unwrap();
        doc.destroy(g);
        assert_eq!(doc.len(), 1);
        assert!(doc.children(svg).is_empty());
        assert!(!doc.contains(p));
        // second destroy is a no-op
        doc.destroy(g);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut doc = Document::new();
        let a = doc.create_element("path").unwrap();
        doc.destroy(a);
        let b = doc.create_element("path").unwrap();
        assert_ne!(a, b);
        assert_eq!(
            doc.set_attribute(a, "d", "M0 0"),
            Err(DomError::UnknownElement { id: a })
        );
    }

    #[test]
    fn limit_rejects_allocation() {
        let mut doc = Document::with_limit(1);
        let a = doc.create_element("svg").unwrap();
        assert_eq!(
            doc.create_element("g"),
            Err(DomError::AllocationFailed { limit: 1 })
        );
        doc.destroy(a);
        assert!(doc.create_element("g").is_ok());
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let mut doc = Document::new();
        let c = doc.create_element("circle").unwrap();
        doc.set_attribute(c, "cx", "1").unwrap();
        doc.set_attribute(c, "cy", "2").unwrap();
        doc.set_attribute(c, "cx", "3").unwrap();
        assert_eq!(doc.to_svg_string(c).unwrap(), r#"<circle cx="3" cy="2"/>"#);
        doc.remove_attribute(c, "cx").unwrap();
        assert_eq!(doc.attribute(c, "cx"), None);
    }

    #[test]
    fn classes() {
        let mut doc = Document::new();
        let p = doc.create_element("path").unwrap();
        doc.add_class(p, "a b").unwrap();
        doc.add_class(p, "b c").unwrap();
        assert_eq!(doc.attribute(p, "class"), Some("a b c"));
        assert!(doc.has_class(p, "b"));
        assert!(!doc.has_class(p, "d"));
    }

    #[test]
    fn reorder_siblings() {
        let mut doc = Document::new();
        let g = doc.create_element("g").unwrap();
        let ids: Vec<_> = (0..3).map(|_| doc.create_element("path").unwrap()).collect();
        for &id in &ids {
            doc.append_child(g, id).unwrap();
        }
        doc.to_front(ids[0]).unwrap();
        assert_eq!(doc.children(g), &[ids[1], ids[2], ids[0]]);
        doc.to_back(ids[2]).unwrap();
        assert_eq!(doc.children(g), &[ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn serialization_escapes_attributes() {
        let mut doc = Document::new();
        let g = doc.create_element("g").unwrap();
        let p = doc.create_element("path").unwrap();
        doc.append_child(g, p).unwrap();
        doc.set_attribute(p, "stroke", "a\"<&>").unwrap();
        insta::assert_snapshot!(
            doc.to_svg_string(g).unwrap(),
            @r#"<g><path stroke="a&quot;&lt;&amp;&gt;"/></g>"#
        );
    }
}
