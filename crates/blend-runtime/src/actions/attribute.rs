//! Attribute and inline style actions

use super::{Action, Target, string_value};
use crate::action_tree::ExecutionContext;
use crate::registry::JsonObject;
use crate::runtime::Runtime;
use crate::value::{Map, Value};

pub(crate) const SET_HTML_ATTRIBUTE: &str = "Blend.Actions.SetHTMLAttributeAction";
pub(crate) const SET_STYLE: &str = "Blend.Actions.SetStyleAction";

/// Sets one attribute on each target
#[derive(Debug, Default)]
pub struct SetHtmlAttributeAction {
    attribute: String,
    attribute_value: String,
    target: Target,
    extras: Map,
}

impl JsonObject for SetHtmlAttributeAction {
    fn type_name(&self) -> &'static str {
        SET_HTML_ATTRIBUTE
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match name {
            "attribute" => self.attribute = string_value(&value),
            "attributeValue" => self.attribute_value = string_value(&value),
            "targetSelector" => self.target = Target::from_value(&value),
            _ => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "attribute" => Value::String(self.attribute.clone()),
            "attributeValue" => Value::String(self.attribute_value.clone()),
            "targetSelector" => self.target.to_value(),
            _ => self.extras.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl Action for SetHtmlAttributeAction {
    fn execute(&self, rt: &mut Runtime, ctx: ExecutionContext<'_>) -> Value {
        if self.attribute.is_empty() {
            return Value::Null;
        }
        for element in self.target.resolve(rt, ctx) {
            rt.document_mut()
                .set_attribute(element, &self.attribute, &self.attribute_value);
        }
        Value::Null
    }
}

/// Sets one inline style property on each target
///
/// `styleProperty` may be camelCase (`backgroundColor`) or kebab-case.
/// An empty `styleValue` removes the property.
#[derive(Debug, Default)]
pub struct SetStyleAction {
    style_property: String,
    style_value: String,
    target: Target,
    extras: Map,
}

impl JsonObject for SetStyleAction {
    fn type_name(&self) -> &'static str {
        SET_STYLE
    }

    fn set_property(&mut self, name: &str, value: Value) {
        match name {
            "styleProperty" => self.style_property = string_value(&value),
            "styleValue" => self.style_value = string_value(&value),
            "targetSelector" => self.target = Target::from_value(&value),
            _ => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "styleProperty" => Value::String(self.style_property.clone()),
            "styleValue" => Value::String(self.style_value.clone()),
            "targetSelector" => self.target.to_value(),
            _ => self.extras.get(name).cloned().unwrap_or_default(),
        }
    }
}

impl Action for SetStyleAction {
    fn execute(&self, rt: &mut Runtime, ctx: ExecutionContext<'_>) -> Value {
        if self.style_property.is_empty() {
            return Value::Null;
        }
        for element in self.target.resolve(rt, ctx) {
            rt.document_mut()
                .set_style_property(element, &self.style_property, &self.style_value);
        }
        Value::Null
    }
}
