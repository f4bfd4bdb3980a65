//! Event trigger behavior

use super::selector_sourced::{self, SelectorSources};
use super::{Behavior, BehaviorCore, action_list, attach_actions, run_triggered};
use crate::actions::string_value;
use crate::listeners::ListenerId;
use crate::registry::JsonObject;
use crate::runtime::Runtime;
use crate::value::{CallArg, Map, Value};
use blend_dom::{Event, NodeId};
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) const EVENT_TRIGGER: &str = "Blend.Behaviors.EventTriggerBehavior";

/// Event `load` has already fired by the time behaviors attach
const LOAD_EVENT: &str = "load";

#[derive(Debug, Clone)]
struct SourceListener {
    source: NodeId,
    event: String,
    id: ListenerId,
}

/// Runs its triggered actions when `event` fires on a source
///
/// The source becomes the scope element and the event is stored as the
/// source's current arguments.
#[derive(Debug, Default)]
pub struct EventTriggerBehavior {
    core: BehaviorCore,
    sources: SelectorSources,
    event: RefCell<String>,
    triggered_actions: Vec<Value>,
    listeners: RefCell<Vec<SourceListener>>,
    extras: Map,
}

impl EventTriggerBehavior {
    pub fn event(&self) -> String {
        self.event.borrow().clone()
    }

    pub fn triggered_actions(&self) -> &[Value] {
        &self.triggered_actions
    }

    /// Run the triggered actions for `source`
    pub fn execute(&self, rt: &mut Runtime, source: NodeId, args: Vec<CallArg>) {
        rt.scopes.set_arguments(source, args.clone());
        run_triggered(rt, &self.triggered_actions, source, &args);
    }

    /// Change the event, moving the listeners of every bound source
    pub fn set_event(self: &Rc<Self>, rt: &mut Runtime, event: &str) {
        if *self.event.borrow() == event {
            return;
        }
        let sources = self.sources.sources();
        for &source in &sources {
            self.remove_source_impl(rt, source);
        }
        *self.event.borrow_mut() = event.to_string();
        for source in sources {
            Rc::clone(self).add_source_impl(rt, source);
        }
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl JsonObject for EventTriggerBehavior {
    fn type_name(&self) -> &'static str {
        EVENT_TRIGGER
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match name {
            "event" => *self.event.get_mut() = string_value(&value),
            "sourceSelector" => self.sources.set_selector(&string_value(&value)),
            "triggeredActions" => self.triggered_actions = action_list(value),
            _ => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "event" => Value::String(self.event()),
            "sourceSelector" => Value::String(self.sources.selector()),
            "triggeredActions" => Value::Array(self.triggered_actions.clone()),
            _ => self.extras.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl Behavior for EventTriggerBehavior {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn sources(&self) -> Option<&SelectorSources> {
        Some(&self.sources)
    }

    fn attach_impl(self: Rc<Self>, rt: &mut Runtime, element: NodeId) {
        attach_actions(rt, &self.triggered_actions, element);
        selector_sourced::add_sources_for(&self, rt, element);
    }

    fn detach_impl(&self, rt: &mut Runtime, element: NodeId) {
        selector_sourced::remove_sources_for(self, rt, element);
    }

    fn add_source_impl(self: Rc<Self>, rt: &mut Runtime, source: NodeId) {
        let event = self.event();
        if event.is_empty() {
            return;
        }
        if event == LOAD_EVENT {
            let args = rt
                .scopes
                .arguments(source)
                .map(<[CallArg]>::to_vec)
                .unwrap_or_default();
            self.execute(rt, source, args);
        }

        let behavior = Rc::clone(&self);
        let id = rt.add_event_listener(
            source,
            &event,
            Rc::new(move |rt: &mut Runtime, e: &Event| {
                behavior.execute(rt, source, vec![CallArg::Event(e.clone())])
            }),
        );
        self.listeners.borrow_mut().push(SourceListener {
            source,
            event,
            id,
        });
    }

    fn remove_source_impl(&self, rt: &mut Runtime, source: NodeId) {
        let removed: Vec<SourceListener> = {
            let mut listeners = self.listeners.borrow_mut();
            let (removed, kept): (Vec<_>, Vec<_>) = listeners
                .drain(..)
                .partition(|l| l.source == source);
            *listeners = kept;
            removed
        };
        for listener in removed {
            rt.remove_event_listener(listener.source, &listener.event, listener.id);
        }
    }

    fn update_property(self: Rc<Self>, rt: &mut Runtime, name: &str, value: Value) -> bool {
        match name {
            "event" => {
                self.set_event(rt, &string_value(&value));
                true
            }
            "sourceSelector" => {
                selector_sourced::set_source_selector(&self, rt, &string_value(&value));
                true
            }
            _ => false,
        }
    }
}
