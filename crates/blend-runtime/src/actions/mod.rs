//! Actions
//!
//! One-shot DOM effects. An action applies to an explicit element, to the
//! matches of a selector, or, with neither configured, to the scope
//! element of the execution context.

mod attribute;
mod class;
mod load_page;
mod remove;

pub use attribute::{SetHtmlAttributeAction, SetStyleAction};
pub use class::{ClassAction, ClassOperation};
pub use load_page::LoadPageAction;
pub use remove::{RemoveChildrenAction, RemoveElementsAction};

use crate::action_tree::ExecutionContext;
use crate::metadata::{PropertyMetadata, PropertyType, TypeMetadata};
use crate::registry::{Instance, JsonObject, TypeDescriptor, TypeRegistry};
use crate::runtime::Runtime;
use crate::value::{Map, Value};
use blend_dom::NodeId;

pub const ACTION_BASE: &str = "Blend.Actions.ActionBase";

/// Executable effect
pub trait Action: JsonObject {
    /// Called when a behavior owning this action attaches to `element`
    fn attach(&self, _rt: &mut Runtime, _element: NodeId) {}

    /// Apply the effect
    fn execute(&self, _rt: &mut Runtime, _ctx: ExecutionContext<'_>) -> Value {
        Value::Null
    }
}

/// Where an action applies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Target {
    /// The scope element of the execution context
    #[default]
    Scope,
    Element(NodeId),
    Selector(String),
}

impl Target {
    /// Accepts an element reference or a selector string
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Element(id) => Target::Element(*id),
            Value::String(s) if !s.trim().is_empty() => Target::Selector(s.clone()),
            _ => Target::Scope,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Target::Scope => Value::Null,
            Target::Element(id) => Value::Element(*id),
            Target::Selector(s) => Value::String(s.clone()),
        }
    }

    /// Elements this target names right now
    pub fn resolve(&self, rt: &mut Runtime, ctx: ExecutionContext<'_>) -> Vec<NodeId> {
        match self {
            Target::Element(id) => vec![*id],
            Target::Selector(selector) => rt.query_selector_all(selector),
            Target::Scope => match ctx.element {
                Some(element) => vec![element],
                None => {
                    rt.diagnostics_mut().debug("Why is there no scope element?");
                    Vec::new()
                }
            },
        }
    }
}

/// String form of a property value (`Null` becomes empty)
pub(crate) fn string_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Root of the action hierarchy; executes nothing
#[derive(Debug, Default)]
pub struct ActionBase {
    extras: Map,
}

impl JsonObject for ActionBase {
    fn type_name(&self) -> &'static str {
        ACTION_BASE
    }

    fn set_property(&mut self, name: &str, value: Value) {
        self.extras.insert(name.to_string(), value);
    }

    fn property(&self, name: &str) -> Value {
        self.extras.get(name).cloned().unwrap_or_default()
    }
}

impl Action for ActionBase {}

fn string_prop() -> PropertyMetadata {
    PropertyMetadata::of(PropertyType::String)
}

/// Register the built-in action types
pub fn register(registry: &mut TypeRegistry) {
    registry.register(
        TypeDescriptor::new(ACTION_BASE).factory(|| Instance::Action(Box::<ActionBase>::default())),
    );

    for op in [ClassOperation::Add, ClassOperation::Remove, ClassOperation::Toggle] {
        registry.register(
            TypeDescriptor::new(op.type_name())
                .base(ACTION_BASE)
                .metadata(
                    TypeMetadata::new()
                        .property("className", string_prop())
                        .property("targetSelector", string_prop()),
                )
                .factory(op.factory()),
        );
    }

    registry.register(
        TypeDescriptor::new(attribute::SET_HTML_ATTRIBUTE)
            .base(ACTION_BASE)
            .metadata(
                TypeMetadata::new()
                    .property("targetSelector", string_prop())
                    .property("attribute", string_prop())
                    .property("attributeValue", string_prop()),
            )
            .factory(|| Instance::Action(Box::<SetHtmlAttributeAction>::default())),
    );

    registry.register(
        TypeDescriptor::new(attribute::SET_STYLE)
            .base(ACTION_BASE)
            .metadata(
                TypeMetadata::new()
                    .property("targetSelector", string_prop())
                    .property("styleProperty", string_prop())
                    .property("styleValue", string_prop()),
            )
            .factory(|| Instance::Action(Box::<SetStyleAction>::default())),
    );

    registry.register(
        TypeDescriptor::new(remove::REMOVE_ELEMENTS)
            .base(ACTION_BASE)
            .metadata(TypeMetadata::new().property("elementsToRemove", string_prop()))
            .factory(|| Instance::Action(Box::<RemoveElementsAction>::default())),
    );

    registry.register(
        TypeDescriptor::new(remove::REMOVE_CHILDREN)
            .base(ACTION_BASE)
            .metadata(TypeMetadata::new().property("parentElement", string_prop()))
            .factory(|| Instance::Action(Box::<RemoveChildrenAction>::default())),
    );

    registry.register(
        TypeDescriptor::new(load_page::LOAD_PAGE)
            .base(ACTION_BASE)
            .metadata(
                TypeMetadata::new()
                    .property("targetSelector", string_prop())
                    .property("page", string_prop())
                    .property(
                        "pageLoaded",
                        PropertyMetadata::array_of(PropertyType::Class(ACTION_BASE)),
                    ),
            )
            .factory(|| Instance::Action(Box::<LoadPageAction>::default())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_value() {
        assert_eq!(Target::from_value(&Value::Null), Target::Scope);
        assert_eq!(Target::from_value(&Value::from("  ")), Target::Scope);
        assert_eq!(
            Target::from_value(&Value::from(".x")),
            Target::Selector(".x".to_string())
        );
        assert_eq!(Target::Selector("p".into()).to_value(), Value::from("p"));
    }

    #[test]
    fn test_action_base_keeps_extras() {
        let mut base = ActionBase::default();
        base.set_property("note", Value::from("hi"));
        assert_eq!(base.property("note"), Value::from("hi"));
        assert!(base.property("missing").is_null());
    }

    #[test]
    fn test_registered_names() {
        let registry = TypeRegistry::with_builtins();
        for name in [
            "AddClassAction",
            "RemoveClassAction",
            "ToggleClassAction",
            "SetHTMLAttributeAction",
            "SetStyleAction",
            "RemoveElementsAction",
            "RemoveChildrenAction",
            "LoadPageAction",
        ] {
            let descriptor = registry.resolve(name).unwrap();
            assert!(descriptor.is_constructible(), "{name}");
            assert!(registry.is_a(name, ACTION_BASE), "{name}");
        }
    }
}
