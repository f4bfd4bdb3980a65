//! Event listener storage
//!
//! Listeners are kept per element and per event type, in registration
//! order. Dispatch lives on `Runtime`; this is only the registry.

use crate::runtime::Runtime;
use blend_dom::{Event, NodeId};
use std::collections::HashMap;
use std::rc::Rc;

/// Listener callback
pub type EventCallback = Rc<dyn Fn(&mut Runtime, &Event)>;

/// Handle returned by `add_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Event listener storage
#[derive(Default)]
pub struct EventListenerRegistry {
    /// Map of node ID -> event type -> listeners
    listeners: HashMap<NodeId, HashMap<String, Vec<(ListenerId, EventCallback)>>>,
    /// Next listener ID
    next_id: u64,
}

impl std::fmt::Debug for EventListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListenerRegistry")
            .field("nodes", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl EventListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event listener
    pub fn add_listener(&mut self, node: NodeId, event_type: &str, callback: EventCallback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.listeners
            .entry(node)
            .or_default()
            .entry(event_type.to_string())
            .or_default()
            .push((id, callback));

        id
    }

    /// Remove an event listener
    pub fn remove_listener(&mut self, node: NodeId, event_type: &str, listener: ListenerId) -> bool {
        let Some(node_listeners) = self.listeners.get_mut(&node) else {
            return false;
        };
        let Some(type_listeners) = node_listeners.get_mut(event_type) else {
            return false;
        };
        let Some(pos) = type_listeners.iter().position(|(id, _)| *id == listener) else {
            return false;
        };
        type_listeners.remove(pos);
        if type_listeners.is_empty() {
            node_listeners.remove(event_type);
        }
        if node_listeners.is_empty() {
            self.listeners.remove(&node);
        }
        true
    }

    /// Snapshot of the listeners for a node and event type
    pub fn get_listeners(&self, node: NodeId, event_type: &str) -> Vec<(ListenerId, EventCallback)> {
        self.listeners
            .get(&node)
            .and_then(|node| node.get(event_type))
            .cloned()
            .unwrap_or_default()
    }

    /// Check whether a listener is still registered
    pub fn contains(&self, node: NodeId, event_type: &str, listener: ListenerId) -> bool {
        self.listeners
            .get(&node)
            .and_then(|node| node.get(event_type))
            .is_some_and(|list| list.iter().any(|(id, _)| *id == listener))
    }

    /// Number of listeners on a node across all event types
    pub fn count(&self, node: NodeId) -> usize {
        self.listeners
            .get(&node)
            .map(|types| types.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Clear all listeners for a node
    pub fn clear_node(&mut self, node: NodeId) {
        self.listeners.remove(&node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blend_dom::Document;

    #[test]
    fn test_add_remove() {
        let doc = Document::parse("<div id=a></div>");
        let node = doc.get_element_by_id("a").unwrap();
        let mut registry = EventListenerRegistry::new();
        let first = registry.add_listener(node, "click", Rc::new(|_: &mut Runtime, _: &Event| {}));
        let second = registry.add_listener(node, "click", Rc::new(|_: &mut Runtime, _: &Event| {}));
        registry.add_listener(node, "focus", Rc::new(|_: &mut Runtime, _: &Event| {}));

        assert_eq!(registry.count(node), 3);
        let ids: Vec<_> = registry.get_listeners(node, "click").iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![first, second]);

        assert!(registry.remove_listener(node, "click", first));
        assert!(!registry.remove_listener(node, "click", first));
        assert!(!registry.contains(node, "click", first));
        assert!(registry.contains(node, "click", second));

        registry.clear_node(node);
        assert_eq!(registry.count(node), 0);
    }
}
