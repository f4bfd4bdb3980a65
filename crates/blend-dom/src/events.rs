//! DOM Events
//!
//! Event objects handed to listeners during dispatch. The dispatcher owns
//! propagation; an `Event` only records where it is.

use crate::NodeId;
use std::cell::Cell;

/// DOM event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    /// Virtual time (ms) at dispatch
    pub timestamp: f64,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Create a bubbling, cancelable event
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: None,
            bubbles: true,
            cancelable: true,
            timestamp: 0.0,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Create an event that is delivered to the target only
    pub fn non_bubbling(event_type: &str, target: NodeId) -> Self {
        Self {
            bubbles: false,
            ..Self::new(event_type, target)
        }
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop delivery to further ancestors
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let event = Event::new("click", NodeId(3));
        assert!(event.bubbles);
        assert!(!event.default_prevented());
        event.prevent_default();
        event.stop_propagation();
        assert!(event.default_prevented());
        assert!(event.propagation_stopped());
    }

    #[test]
    fn test_non_bubbling() {
        let event = Event::non_bubbling("load", NodeId(1));
        assert!(!event.bubbles);
        assert_eq!(event.event_type, "load");
        assert_eq!(event.current_target, None);
    }
}
