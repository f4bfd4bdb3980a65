//! Document - High-level document API

use crate::{
    ClassList, CssStyleDeclaration, DomTree, HtmlParser, HtmlSerializer, NodeId, SelectorError,
    SelectorList,
};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    html_element: Option<NodeId>,
    head_element: Option<NodeId>,
    body_element: Option<NodeId>,
}

impl Document {
    /// Create a new document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);
        Self {
            tree,
            url: url.to_string(),
            html_element: Some(html),
            head_element: Some(head),
            body_element: Some(body),
        }
    }

    /// Parse an HTML string
    pub fn parse(html: &str) -> Self {
        HtmlParser::new().parse(html)
    }

    /// Wrap an already-built tree, locating html/head/body
    pub fn from_tree(tree: DomTree, url: &str) -> Self {
        let html = tree
            .element_children(tree.root())
            .into_iter()
            .find(|&id| tree.element(id).is_some_and(|e| e.tag_name == "html"));
        let find_child = |tag: &str| {
            html.and_then(|h| {
                tree.element_children(h)
                    .into_iter()
                    .find(|&id| tree.element(id).is_some_and(|e| e.tag_name == tag))
            })
        };
        let head = find_child("head");
        let body = find_child("body");
        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Check if the node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.tree.is_element(id)
    }

    /// Check if the node is attached to the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.element(id).map(|e| e.tag_name.as_str())
    }

    /// Get element by ID among connected elements
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    /// All element descendants of `scope` matching `selector`, in document order
    pub fn query_selector_all(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .tree
            .descendants(scope)
            .into_iter()
            .filter(|&n| list.matches(&self.tree, n))
            .collect())
    }

    /// First element descendant of `scope` matching `selector`
    pub fn query_selector(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector_all(scope, selector)?.into_iter().next())
    }

    /// Check whether an element matches `selector`
    pub fn matches(&self, element: NodeId, selector: &str) -> Result<bool, SelectorError> {
        Ok(SelectorList::parse(selector)?.matches(&self.tree, element))
    }

    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.tree.element(element).and_then(|e| e.get_attr(name))
    }

    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.get_attribute(element, name).is_some()
    }

    /// Set an attribute; ignored for non-element nodes
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        if name.is_empty() {
            return;
        }
        if let Some(e) = self.tree.element_mut(element) {
            e.set_attr(name, value);
        }
    }

    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> bool {
        self.tree
            .element_mut(element)
            .is_some_and(|e| e.remove_attr(name))
    }

    /// `className` (empty string when there is no class attribute)
    pub fn class_name(&self, element: NodeId) -> String {
        self.get_attribute(element, "class")
            .unwrap_or_default()
            .to_string()
    }

    pub fn set_class_name(&mut self, element: NodeId, value: &str) {
        self.set_attribute(element, "class", value);
    }

    /// Snapshot of the element's class tokens
    pub fn class_list(&self, element: NodeId) -> ClassList {
        ClassList::parse(self.get_attribute(element, "class").unwrap_or_default())
    }

    /// Apply `update` to the element's class list and write it back
    pub fn update_class_list<R>(
        &mut self,
        element: NodeId,
        update: impl FnOnce(&mut ClassList) -> R,
    ) -> Option<R> {
        if !self.is_element(element) {
            return None;
        }
        let mut list = self.class_list(element);
        let result = update(&mut list);
        self.set_class_name(element, &list.to_string());
        Some(result)
    }

    /// Parsed inline style of an element
    pub fn style(&self, element: NodeId) -> CssStyleDeclaration {
        CssStyleDeclaration::parse(self.get_attribute(element, "style").unwrap_or_default())
    }

    /// Set one inline style property (camelCase or kebab-case)
    pub fn set_style_property(&mut self, element: NodeId, property: &str, value: &str) {
        if !self.is_element(element) {
            return;
        }
        let mut style = self.style(element);
        style.set_property(property, value);
        let text = style.css_text();
        if text.is_empty() {
            self.remove_attribute(element, "style");
        } else {
            self.set_attribute(element, "style", &text);
        }
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.tree.create_element(tag_name)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.append_child(parent, child);
    }

    /// Unlink a node from its parent; returns false if it had none
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        match self.tree.parent(node) {
            Some(parent) => self.tree.remove_child(parent, node),
            None => false,
        }
    }

    /// Remove every child of `parent` (last to first), returning them
    pub fn remove_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        while let Some(&last) = self.tree.children(parent).last() {
            self.tree.remove_child(parent, last);
            removed.push(last);
        }
        removed
    }

    /// Parse `html` and append the body content to `parent`
    pub fn append_html(&mut self, parent: NodeId, html: &str) -> Vec<NodeId> {
        let fragment = HtmlParser::new().parse(html);
        let source_root = fragment.body().unwrap_or(fragment.tree.root());
        let mut added = Vec::new();
        for &child in fragment.tree.children(source_root) {
            if let Some(id) = self.tree.import_node(&fragment.tree, child, parent) {
                added.push(id);
            }
        }
        added
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        HtmlSerializer::new().serialize_outer(&self.tree, node)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        HtmlSerializer::new().serialize_inner(&self.tree, node)
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        self.outer_html(self.tree.root())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
