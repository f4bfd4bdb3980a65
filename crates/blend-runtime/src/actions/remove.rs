//! Element removal actions
//!
//! Removal goes through the runtime so behaviors, listeners and scope
//! state of the removed subtree are released with it.

use super::{Action, Target};
use crate::action_tree::ExecutionContext;
use crate::registry::JsonObject;
use crate::runtime::Runtime;
use crate::value::{Map, Value};

pub(crate) const REMOVE_ELEMENTS: &str = "Blend.Actions.RemoveElementsAction";
pub(crate) const REMOVE_CHILDREN: &str = "Blend.Actions.RemoveChildrenAction";

/// Removes each target from the document
#[derive(Debug, Default)]
pub struct RemoveElementsAction {
    elements_to_remove: Target,
    extras: Map,
}

impl JsonObject for RemoveElementsAction {
    fn type_name(&self) -> &'static str {
        REMOVE_ELEMENTS
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match name {
            "elementsToRemove" => self.elements_to_remove = Target::from_value(&value),
            _ => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "elementsToRemove" => self.elements_to_remove.to_value(),
            _ => self.extras.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl Action for RemoveElementsAction {
    fn execute(&self, rt: &mut Runtime, ctx: ExecutionContext<'_>) -> Value {
        for element in self.elements_to_remove.resolve(rt, ctx) {
            rt.remove_element(element);
        }
        Value::Null
    }
}

/// Removes every child of each target
#[derive(Debug, Default)]
pub struct RemoveChildrenAction {
    parent_element: Target,
    extras: Map,
}

impl JsonObject for RemoveChildrenAction {
    fn type_name(&self) -> &'static str {
        REMOVE_CHILDREN
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match name {
            "parentElement" => self.parent_element = Target::from_value(&value),
            _ => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "parentElement" => self.parent_element.to_value(),
            _ => self.extras.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl Action for RemoveChildrenAction {
    fn execute(&self, rt: &mut Runtime, ctx: ExecutionContext<'_>) -> Value {
        for element in self.parent_element.resolve(rt, ctx) {
            rt.remove_children(element);
        }
        Value::Null
    }
}
