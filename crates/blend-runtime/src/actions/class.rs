//! Class token actions

use super::{Action, Target, string_value};
use crate::action_tree::ExecutionContext;
use crate::registry::{Instance, JsonObject};
use crate::runtime::Runtime;
use crate::value::{Map, Value};

/// Operation applied to the class list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOperation {
    Add,
    Remove,
    Toggle,
}

impl ClassOperation {
    pub fn type_name(self) -> &'static str {
        match self {
            ClassOperation::Add => "Blend.Actions.AddClassAction",
            ClassOperation::Remove => "Blend.Actions.RemoveClassAction",
            ClassOperation::Toggle => "Blend.Actions.ToggleClassAction",
        }
    }

    pub(crate) fn factory(self) -> fn() -> Instance {
        match self {
            ClassOperation::Add => || Instance::Action(Box::new(ClassAction::new(ClassOperation::Add))),
            ClassOperation::Remove => {
                || Instance::Action(Box::new(ClassAction::new(ClassOperation::Remove)))
            }
            ClassOperation::Toggle => {
                || Instance::Action(Box::new(ClassAction::new(ClassOperation::Toggle)))
            }
        }
    }
}

/// `AddClassAction`, `RemoveClassAction` and `ToggleClassAction`
///
/// Works on whole tokens: removing `hidden` from `"a hidden b"` leaves
/// `"a b"`, and a token that merely contains the name is untouched.
#[derive(Debug)]
pub struct ClassAction {
    operation: ClassOperation,
    class_name: String,
    target: Target,
    extras: Map,
}

impl ClassAction {
    pub fn new(operation: ClassOperation) -> Self {
        Self {
            operation,
            class_name: String::new(),
            target: Target::Scope,
            extras: Map::new(),
        }
    }

    pub fn operation(&self) -> ClassOperation {
        self.operation
    }
}

impl JsonObject for ClassAction {
    fn type_name(&self) -> &'static str {
        self.operation.type_name()
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match name {
            "className" => self.class_name = string_value(&value),
            "targetSelector" => self.target = Target::from_value(&value),
            _ => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "className" => Value::String(self.class_name.clone()),
            "targetSelector" => self.target.to_value(),
            _ => self.extras.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl Action for ClassAction {
    fn execute(&self, rt: &mut Runtime, ctx: ExecutionContext<'_>) -> Value {
        let class_name = self.class_name.trim();
        if class_name.is_empty() {
            return Value::Null;
        }
        for element in self.target.resolve(rt, ctx) {
            let document = rt.document_mut();
            let has_token = document.class_list(element).contains(class_name);
            match self.operation {
                ClassOperation::Add if !has_token => {
                    document.update_class_list(element, |list| list.add(class_name));
                }
                ClassOperation::Remove if has_token => {
                    document.update_class_list(element, |list| list.remove(class_name));
                }
                ClassOperation::Toggle => {
                    document.update_class_list(element, |list| list.toggle(class_name));
                }
                _ => {}
            }
        }
        Value::Null
    }
}
