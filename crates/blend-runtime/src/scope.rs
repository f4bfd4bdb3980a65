//! Per-element scope state
//!
//! Side table from element identity to the behaviors attached to it and
//! the arguments of the last invocation scoped to it. Entries appear on
//! first write and are removed when they no longer hold anything, or when
//! the element is removed from the document.

use crate::behaviors::Behavior;
use crate::value::CallArg;
use blend_dom::NodeId;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default, Clone)]
pub struct ElementScope {
    pub behaviors: Vec<Rc<dyn Behavior>>,
    pub arguments: Option<Vec<CallArg>>,
}

impl ElementScope {
    fn is_empty(&self) -> bool {
        self.behaviors.is_empty() && self.arguments.is_none()
    }
}

/// Scope state of every element that has any
#[derive(Debug, Default)]
pub struct ScopeTable {
    scopes: HashMap<NodeId, ElementScope>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a behavior against an element; false if already present
    pub fn add_behavior(&mut self, element: NodeId, behavior: Rc<dyn Behavior>) -> bool {
        let scope = self.scopes.entry(element).or_default();
        if scope.behaviors.iter().any(|b| Rc::ptr_eq(b, &behavior)) {
            return false;
        }
        scope.behaviors.push(behavior);
        true
    }

    pub fn remove_behavior(&mut self, element: NodeId, behavior: &Rc<dyn Behavior>) -> bool {
        let Some(scope) = self.scopes.get_mut(&element) else {
            return false;
        };
        let before = scope.behaviors.len();
        scope.behaviors.retain(|b| !Rc::ptr_eq(b, behavior));
        let removed = scope.behaviors.len() != before;
        if scope.is_empty() {
            self.scopes.remove(&element);
        }
        removed
    }

    /// Snapshot of the behaviors attached to an element
    pub fn behaviors(&self, element: NodeId) -> Vec<Rc<dyn Behavior>> {
        self.scopes
            .get(&element)
            .map(|s| s.behaviors.clone())
            .unwrap_or_default()
    }

    pub fn set_arguments(&mut self, element: NodeId, args: Vec<CallArg>) {
        self.scopes.entry(element).or_default().arguments = Some(args);
    }

    pub fn arguments(&self, element: NodeId) -> Option<&[CallArg]> {
        self.scopes.get(&element).and_then(|s| s.arguments.as_deref())
    }

    pub fn get(&self, element: NodeId) -> Option<&ElementScope> {
        self.scopes.get(&element)
    }

    /// Destroy an element's scope state
    pub fn remove(&mut self, element: NodeId) -> Option<ElementScope> {
        self.scopes.remove(&element)
    }

    pub fn contains(&self, element: NodeId) -> bool {
        self.scopes.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use blend_dom::Document;

    #[test]
    fn test_arguments_created_lazily() {
        let doc = Document::parse("<p id=x></p>");
        let p = doc.get_element_by_id("x").unwrap();
        let mut table = ScopeTable::new();
        assert!(table.arguments(p).is_none());
        assert!(table.is_empty());

        table.set_arguments(p, vec![CallArg::Value(Value::from(1.0))]);
        assert_eq!(table.arguments(p).map(<[CallArg]>::len), Some(1));
        assert!(table.contains(p));

        assert!(table.remove(p).is_some());
        assert!(!table.contains(p));
    }
}
