//! DOM Node
//!
//! Nodes reference each other through `NodeId` indices into the arena
//! owned by `DomTree`; a node never owns its children directly.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (None for the document or a detached node)
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data if this is an element
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// `<!DOCTYPE name>`
    Doctype(String),
    /// Element with tag name and attributes
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// A single `name="value"` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element-specific data
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag_name: String,
    /// Attributes in source order
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Get attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set attribute value, replacing an existing one in place
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            Some(attr) => attr.value = value.to_string(),
            None => self.attrs.push(Attribute {
                name: name.to_ascii_lowercase(),
                value: value.to_string(),
            }),
        }
    }

    /// Remove attribute, returning whether it existed
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|a| !a.name.eq_ignore_ascii_case(name));
        before != self.attrs.len()
    }

    /// Get the id attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// Iterate over class tokens
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attr("class").unwrap_or("").split_whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_case_insensitive() {
        let mut el = ElementData::new("DIV");
        assert_eq!(el.tag_name, "div");

        el.set_attr("Data-X", "1");
        assert_eq!(el.get_attr("data-x"), Some("1"));

        el.set_attr("data-x", "2");
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(el.get_attr("DATA-X"), Some("2"));

        assert!(el.remove_attr("data-x"));
        assert!(!el.remove_attr("data-x"));
    }

    #[test]
    fn test_classes() {
        let mut el = ElementData::new("p");
        el.set_attr("class", "  a   b c ");
        let classes: Vec<_> = el.classes().collect();
        assert_eq!(classes, vec!["a", "b", "c"]);
    }
}
