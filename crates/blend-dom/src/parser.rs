//! HTML5 Parser
//!
//! Uses html5ever's RcDom and converts it to the arena DOM.

use crate::{Document, DomTree, ElementData, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut tree = DomTree::new();
        self.convert_node(&dom.document, &mut tree, NodeId::ROOT);

        tracing::debug!("Parsed {} nodes", tree.len());
        Document::from_tree(tree, url)
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Doctype { name, .. } => {
                let id = tree.create_doctype(name);
                tree.append_child(parent, id);
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id);
                }
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id);
            }
            RcNodeData::Element { name, attrs, .. } => {
                let mut elem = ElementData::new(&name.local);
                for attr in attrs.borrow().iter() {
                    elem.set_attr(&attr.name.local, &attr.value);
                }
                let id = tree.create_element_with(elem);
                tree.append_child(parent, id);

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structure() {
        let doc = HtmlParser::new().parse("<p id=a class='x y'>Hello</p><!-- c -->");
        let body = doc.body().unwrap();
        let p = doc.get_element_by_id("a").unwrap();
        assert_eq!(doc.tree().parent(p), Some(body));
        assert_eq!(doc.get_attribute(p, "class"), Some("x y"));
        assert_eq!(doc.text_content(p), "Hello");
    }

    #[test]
    fn test_whitespace_text_dropped() {
        let doc = HtmlParser::new().parse("<ul>\n  <li>a</li>\n</ul>");
        let ul = doc.query_selector_all(NodeId::ROOT, "ul").unwrap()[0];
        assert_eq!(doc.tree().children(ul).len(), 1);
    }
}
