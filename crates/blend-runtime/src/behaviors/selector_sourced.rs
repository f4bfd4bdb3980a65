//! Selector-sourced behaviors
//!
//! The trigger sources of such a behavior are the document matches of its
//! `sourceSelector`, or the attachment itself when the selector is empty.
//! A source is bound once per behavior instance, however many of the
//! instance's attachments resolve to it; it is unbound when the last of
//! those attachments goes away.

use super::Behavior;
use crate::runtime::Runtime;
use blend_dom::NodeId;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone)]
struct Binding {
    source: NodeId,
    /// Attachments that resolved to this source
    holders: Vec<NodeId>,
}

/// Source selector and the sources bound so far
#[derive(Debug, Default)]
pub struct SelectorSources {
    selector: RefCell<String>,
    bindings: RefCell<Vec<Binding>>,
}

impl SelectorSources {
    pub fn selector(&self) -> String {
        self.selector.borrow().clone()
    }

    pub(crate) fn set_selector(&self, selector: &str) {
        *self.selector.borrow_mut() = selector.to_string();
    }

    /// Every bound source, in binding order
    pub fn sources(&self) -> Vec<NodeId> {
        self.bindings.borrow().iter().map(|b| b.source).collect()
    }

    /// Sources `attachment` holds
    pub fn sources_of(&self, attachment: NodeId) -> Vec<NodeId> {
        self.bindings
            .borrow()
            .iter()
            .filter(|b| b.holders.contains(&attachment))
            .map(|b| b.source)
            .collect()
    }

    fn resolve(&self, rt: &mut Runtime, attachment: NodeId) -> Vec<NodeId> {
        let selector = self.selector();
        if selector.trim().is_empty() {
            vec![attachment]
        } else {
            rt.query_selector_all(&selector)
        }
    }

    /// Record `attachment` as a holder of `source`; true if newly bound
    fn hold(&self, attachment: NodeId, source: NodeId) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.iter_mut().find(|b| b.source == source) {
            Some(binding) => {
                if !binding.holders.contains(&attachment) {
                    binding.holders.push(attachment);
                }
                false
            }
            None => {
                bindings.push(Binding {
                    source,
                    holders: vec![attachment],
                });
                true
            }
        }
    }

    /// Drop `attachment` as a holder of `source`; true if now unbound
    fn release(&self, attachment: NodeId, source: NodeId) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        let Some(pos) = bindings.iter().position(|b| b.source == source) else {
            return false;
        };
        bindings[pos].holders.retain(|&h| h != attachment);
        if bindings[pos].holders.is_empty() {
            bindings.remove(pos);
            true
        } else {
            false
        }
    }

    fn clear(&self) -> Vec<NodeId> {
        self.bindings.borrow_mut().drain(..).map(|b| b.source).collect()
    }
}

/// Resolve the sources of a new attachment, binding any not yet bound
pub(crate) fn add_sources_for<B: Behavior + ?Sized>(behavior: &Rc<B>, rt: &mut Runtime, attachment: NodeId) {
    let Some(sources) = behavior.sources() else {
        return;
    };
    for source in sources.resolve(rt, attachment) {
        if sources.hold(attachment, source) {
            Rc::clone(behavior).add_source_impl(rt, source);
        }
    }
}

/// Release the sources held by `attachment`, unbinding orphaned ones
pub(crate) fn remove_sources_for<B: Behavior + ?Sized>(behavior: &B, rt: &mut Runtime, attachment: NodeId) {
    let Some(sources) = behavior.sources() else {
        return;
    };
    for source in sources.sources_of(attachment) {
        if sources.release(attachment, source) {
            behavior.remove_source_impl(rt, source);
        }
    }
}

/// Replace the source selector, rebinding every current attachment
pub(crate) fn set_source_selector<B: Behavior + ?Sized>(behavior: &Rc<B>, rt: &mut Runtime, selector: &str) {
    let Some(sources) = behavior.sources() else {
        return;
    };
    for source in sources.clear() {
        behavior.remove_source_impl(rt, source);
    }
    sources.set_selector(selector);
    for attachment in behavior.core().attachments() {
        add_sources_for(behavior, rt, attachment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blend_dom::Document;

    #[test]
    fn test_shared_source_released_with_last_holder() {
        let doc = Document::parse("<a id=a></a><b id=b></b><i id=s></i>");
        let a = doc.get_element_by_id("a").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        let s = doc.get_element_by_id("s").unwrap();
        let sources = SelectorSources::default();

        assert!(sources.hold(a, s));
        assert!(!sources.hold(b, s));
        assert!(!sources.hold(b, s));
        assert_eq!(sources.sources(), vec![s]);
        assert_eq!(sources.sources_of(b), vec![s]);

        assert!(!sources.release(a, s));
        assert_eq!(sources.sources(), vec![s]);
        assert!(sources.release(b, s));
        assert!(sources.sources().is_empty());
        assert!(!sources.release(b, s));
    }
}
