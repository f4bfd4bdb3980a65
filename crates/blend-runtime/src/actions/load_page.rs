//! Page fragment loading

use super::{Action, Target, string_value};
use crate::action_tree::ExecutionContext;
use crate::registry::JsonObject;
use crate::runtime::Runtime;
use crate::value::{Map, Value};

pub(crate) const LOAD_PAGE: &str = "Blend.Actions.LoadPageAction";

/// Replaces each target's content with an HTML page
///
/// Children are cleared at once; the page itself arrives on a later
/// scheduler turn, after which behaviors inside it are processed and the
/// `pageLoaded` actions run with the target as scope element.
#[derive(Debug, Default)]
pub struct LoadPageAction {
    page: String,
    target: Target,
    page_loaded: Vec<Value>,
    extras: Map,
}

impl JsonObject for LoadPageAction {
    fn type_name(&self) -> &'static str {
        LOAD_PAGE
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match name {
            "page" => self.page = string_value(&value),
            "targetSelector" => self.target = Target::from_value(&value),
            "pageLoaded" => {
                self.page_loaded = match value {
                    Value::Array(items) => items,
                    Value::Null => Vec::new(),
                    other => vec![other],
                }
            }
            _ => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "page" => Value::String(self.page.clone()),
            "targetSelector" => self.target.to_value(),
            "pageLoaded" => Value::Array(self.page_loaded.clone()),
            _ => self.extras.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl Action for LoadPageAction {
    fn execute(&self, rt: &mut Runtime, ctx: ExecutionContext<'_>) -> Value {
        for element in self.target.resolve(rt, ctx) {
            rt.remove_children(element);
            rt.load_page(element, &self.page, self.page_loaded.clone());
        }
        Value::Null
    }
}
