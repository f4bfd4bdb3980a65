//! Blend DOM - Document Object Model
//!
//! Arena-allocated DOM tree used as the host document for the Blend
//! runtime: attributes, class token lists, inline styles, a CSS selector
//! engine, DOM events, HTML parsing and serialization.

mod classlist;
mod document;
mod events;
mod node;
mod parser;
mod selectors;
mod serializer;
mod style;
mod tree;

pub use classlist::ClassList;
pub use document::Document;
pub use events::Event;
pub use node::{Attribute, ElementData, Node, NodeData};
pub use parser::HtmlParser;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    SelectorComponent, SelectorError, SelectorList,
};
pub use serializer::HtmlSerializer;
pub use style::CssStyleDeclaration;
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
