//! Animation-frame behavior

use super::{Behavior, BehaviorCore, action_list, attach_actions, run_triggered};
use crate::registry::JsonObject;
use crate::runtime::Runtime;
use crate::scheduler::FrameId;
use crate::value::{Map, Value};
use blend_dom::NodeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub(crate) const ANIMATION_FRAME: &str = "Blend.Behaviors.RequestAnimationFrameBehavior";

/// Runs its triggered actions on every animation frame until detached
#[derive(Debug, Default)]
pub struct RequestAnimationFrameBehavior {
    core: BehaviorCore,
    triggered_actions: Vec<Value>,
    requests: RefCell<HashMap<NodeId, FrameId>>,
    extras: Map,
}

impl RequestAnimationFrameBehavior {
    /// Check whether a frame is pending for `element`
    pub fn has_pending_frame(&self, element: NodeId) -> bool {
        self.requests.borrow().contains_key(&element)
    }

    fn request(this: &Rc<Self>, rt: &mut Runtime, element: NodeId) {
        let behavior = Rc::clone(this);
        let frame = rt.request_animation_frame(Rc::new(move |rt: &mut Runtime| {
            Self::on_frame(&behavior, rt, element)
        }));
        this.requests.borrow_mut().insert(element, frame);
    }

    fn on_frame(this: &Rc<Self>, rt: &mut Runtime, element: NodeId) {
        this.requests.borrow_mut().remove(&element);
        run_triggered(rt, &this.triggered_actions, element, &[]);
        if this.core.is_attached_to(element) && !this.has_pending_frame(element) {
            Self::request(this, rt, element);
        }
    }
}

impl JsonObject for RequestAnimationFrameBehavior {
    fn type_name(&self) -> &'static str {
        ANIMATION_FRAME
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match name {
            "triggeredActions" => self.triggered_actions = action_list(value),
            _ => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "triggeredActions" => Value::Array(self.triggered_actions.clone()),
            _ => self.extras.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl Behavior for RequestAnimationFrameBehavior {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn attach_impl(self: Rc<Self>, rt: &mut Runtime, element: NodeId) {
        attach_actions(rt, &self.triggered_actions, element);
        if !self.has_pending_frame(element) {
            Self::request(&self, rt, element);
        }
    }

    fn detach_impl(&self, rt: &mut Runtime, element: NodeId) {
        let frame = self.requests.borrow_mut().remove(&element);
        if let Some(frame) = frame {
            rt.cancel_animation_frame(frame);
        }
    }
}
