//! Behaviors
//!
//! A behavior binds a trigger (DOM event, timer, animation frame) to a
//! list of triggered actions. One instance may be attached to several
//! elements; each attachment is tracked and released independently.
//!
//! Instances are shared (`Rc<dyn Behavior>`), so anything that changes
//! after construction lives behind `RefCell`s. Hooks never hold a borrow
//! while triggered actions run, since those actions may detach the very
//! behavior that fired them.

mod animation_frame;
mod event_trigger;
mod selector_sourced;
mod timer;

pub use animation_frame::RequestAnimationFrameBehavior;
pub use event_trigger::EventTriggerBehavior;
pub use selector_sourced::SelectorSources;
pub use timer::TimerBehavior;

use crate::action_tree::{ExecutionContext, execute_action};
use crate::actions::ACTION_BASE;
use crate::metadata::{PropertyMetadata, PropertyType, TypeMetadata};
use crate::registry::{Instance, JsonObject, TypeDescriptor, TypeRegistry};
use crate::runtime::Runtime;
use crate::value::{CallArg, Value};
use blend_dom::NodeId;
use std::cell::RefCell;
use std::rc::Rc;

pub const BEHAVIOR_BASE: &str = "Blend.Behaviors.BehaviorBase";
pub const SELECTOR_SOURCED: &str = "Blend.Behaviors.SelectorSourcedBehavior";

/// Attachment bookkeeping shared by every behavior
#[derive(Debug, Default)]
pub struct BehaviorCore {
    attachments: RefCell<Vec<NodeId>>,
}

impl BehaviorCore {
    pub fn attachments(&self) -> Vec<NodeId> {
        self.attachments.borrow().clone()
    }

    pub fn is_attached_to(&self, element: NodeId) -> bool {
        self.attachments.borrow().contains(&element)
    }

    fn add(&self, element: NodeId) -> bool {
        let mut attachments = self.attachments.borrow_mut();
        if attachments.contains(&element) {
            return false;
        }
        attachments.push(element);
        true
    }

    fn remove(&self, element: NodeId) -> bool {
        let mut attachments = self.attachments.borrow_mut();
        match attachments.iter().position(|&e| e == element) {
            Some(pos) => {
                attachments.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Trigger source wired to triggered actions
///
/// The `*_impl` hooks default to no-ops; concrete behaviors override the
/// ones they need. Use [`BehaviorExt`] to attach and detach.
pub trait Behavior: JsonObject {
    fn core(&self) -> &BehaviorCore;

    /// Wire up listeners or timers for a new attachment
    fn attach_impl(self: Rc<Self>, _rt: &mut Runtime, _element: NodeId) {}

    /// Release whatever `attach_impl` set up for `element`
    fn detach_impl(&self, _rt: &mut Runtime, _element: NodeId) {}

    /// A trigger source was bound
    fn add_source_impl(self: Rc<Self>, _rt: &mut Runtime, _source: NodeId) {}

    /// A trigger source was unbound
    fn remove_source_impl(&self, _rt: &mut Runtime, _source: NodeId) {}

    /// Source set, for selector-sourced behaviors
    fn sources(&self) -> Option<&SelectorSources> {
        None
    }

    /// Change a property on a live instance, rewiring as needed
    ///
    /// Returns false when the property cannot be changed after
    /// construction.
    fn update_property(self: Rc<Self>, _rt: &mut Runtime, _name: &str, _value: Value) -> bool {
        false
    }
}

/// Attach/detach lifecycle for shared behavior instances
pub trait BehaviorExt {
    /// Attach to `element`; attaching twice to the same element is a no-op
    fn attach(&self, rt: &mut Runtime, element: NodeId);

    /// Release the attachment to `element` only
    fn detach_from(&self, rt: &mut Runtime, element: NodeId);

    /// Release every attachment; safe to call when never attached
    fn detach(&self, rt: &mut Runtime);

    fn attachments(&self) -> Vec<NodeId>;

    fn is_attached(&self) -> bool;
}

impl BehaviorExt for Rc<dyn Behavior> {
    fn attach(&self, rt: &mut Runtime, element: NodeId) {
        if !self.core().add(element) {
            return;
        }
        rt.scopes.add_behavior(element, Rc::clone(self));
        tracing::debug!("Attaching {} to element {}", self.type_name(), element);
        Rc::clone(self).attach_impl(rt, element);
    }

    fn detach_from(&self, rt: &mut Runtime, element: NodeId) {
        if !self.core().remove(element) {
            return;
        }
        rt.scopes.remove_behavior(element, self);
        tracing::debug!("Detaching {} from element {}", self.type_name(), element);
        self.detach_impl(rt, element);
    }

    fn detach(&self, rt: &mut Runtime) {
        for element in self.core().attachments() {
            self.detach_from(rt, element);
        }
    }

    fn attachments(&self) -> Vec<NodeId> {
        self.core().attachments()
    }

    fn is_attached(&self) -> bool {
        !self.core().attachments.borrow().is_empty()
    }
}

/// Call `attach` on every triggered action
pub(crate) fn attach_actions(rt: &mut Runtime, actions: &[Value], element: NodeId) {
    for action in actions {
        if let Value::Action(action) = action {
            action.attach(rt, element);
        }
    }
}

/// Run triggered actions with `element` as scope element
pub(crate) fn run_triggered(rt: &mut Runtime, actions: &[Value], element: NodeId, args: &[CallArg]) {
    let ctx = ExecutionContext::new(args).with_element(element);
    for action in actions {
        execute_action(rt, action, ctx);
    }
}

/// Triggered actions from a property value
pub(crate) fn action_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn triggered_actions_prop() -> PropertyMetadata {
    PropertyMetadata::array_of(PropertyType::Class(ACTION_BASE))
}

/// Register the built-in behavior types
pub fn register(registry: &mut TypeRegistry) {
    registry.register(TypeDescriptor::new(BEHAVIOR_BASE));

    registry.register(
        TypeDescriptor::new(SELECTOR_SOURCED)
            .base(BEHAVIOR_BASE)
            .metadata(
                TypeMetadata::new()
                    .property("sourceSelector", PropertyMetadata::of(PropertyType::String)),
            ),
    );

    registry.register(
        TypeDescriptor::new(event_trigger::EVENT_TRIGGER)
            .base(SELECTOR_SOURCED)
            .metadata(
                TypeMetadata::new()
                    .property("event", PropertyMetadata::of(PropertyType::String))
                    .property("triggeredActions", triggered_actions_prop()),
            )
            .factory(|| Instance::Behavior(Box::<EventTriggerBehavior>::default())),
    );

    registry.register(
        TypeDescriptor::new(timer::TIMER)
            .base(BEHAVIOR_BASE)
            .metadata(
                TypeMetadata::new()
                    .property("totalTicks", PropertyMetadata::of(PropertyType::Number))
                    .property("millisecondsPerTick", PropertyMetadata::of(PropertyType::Number))
                    .property("triggeredActions", triggered_actions_prop()),
            )
            .factory(|| Instance::Behavior(Box::<TimerBehavior>::default())),
    );

    registry.register(
        TypeDescriptor::new(animation_frame::ANIMATION_FRAME)
            .base(BEHAVIOR_BASE)
            .metadata(TypeMetadata::new().property("triggeredActions", triggered_actions_prop()))
            .factory(|| Instance::Behavior(Box::<RequestAnimationFrameBehavior>::default())),
    );
}
