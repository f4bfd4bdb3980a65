//! Shared fixtures for the runtime integration tests

#![allow(dead_code)]

use blend_dom::{Document, NodeId};
use blend_runtime::actions::{ACTION_BASE, Action, Target};
use blend_runtime::metadata::{PropertyMetadata, PropertyType, TypeMetadata};
use blend_runtime::{
    ExecutionContext, Instance, JsonObject, MemoryFiles, Runtime, RuntimeConfig, TypeDescriptor,
    Value,
};

pub const ACTION_LIST: &str = "js/actionList.json";

/// Appends its label to the `data-log` attribute of the scope element
#[derive(Debug, Default)]
pub struct RecordAction {
    label: String,
}

impl JsonObject for RecordAction {
    fn type_name(&self) -> &'static str {
        "Test.RecordAction"
    }

    fn set_property(&mut self, name: &str, value: Value) {
        if name == "label" {
            self.label = value.as_str().unwrap_or_default().to_string();
        }
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "label" => Value::from(self.label.as_str()),
            _ => Value::Null,
        }
    }
}

impl Action for RecordAction {
    fn execute(&self, rt: &mut Runtime, ctx: ExecutionContext<'_>) -> Value {
        for element in Target::Scope.resolve(rt, ctx) {
            let log = rt
                .document()
                .get_attribute(element, "data-log")
                .unwrap_or_default()
                .to_string();
            let label = if self.label.is_empty() { "x" } else { self.label.as_str() };
            rt.document_mut()
                .set_attribute(element, "data-log", &format!("{log}{label}"));
        }
        Value::Null
    }
}

pub fn config() -> RuntimeConfig {
    RuntimeConfig {
        capture_diagnostics: true,
        ..RuntimeConfig::default()
    }
}

/// Runtime over `html` with `RecordAction` registered and the given files
pub fn runtime_with_files(html: &str, files: MemoryFiles) -> Runtime {
    let mut rt = Runtime::with_files(Document::parse(html), config(), files);
    rt.types_mut().register(
        TypeDescriptor::new("Test.RecordAction")
            .base(ACTION_BASE)
            .metadata(
                TypeMetadata::new().property("label", PropertyMetadata::of(PropertyType::String)),
            )
            .factory(|| Instance::Action(Box::<RecordAction>::default())),
    );
    rt
}

/// Runtime over `html` whose action-tree file holds `action_list`
pub fn runtime(html: &str, action_list: &str) -> Runtime {
    runtime_with_files(html, MemoryFiles::new().with(ACTION_LIST, action_list))
}

pub fn by_id(rt: &Runtime, id: &str) -> NodeId {
    rt.document()
        .get_element_by_id(id)
        .unwrap_or_else(|| panic!("no element #{id}"))
}

pub fn log_of(rt: &Runtime, element: NodeId) -> String {
    rt.document()
        .get_attribute(element, "data-log")
        .unwrap_or_default()
        .to_string()
}

pub fn class_of(rt: &Runtime, element: NodeId) -> String {
    rt.document().class_name(element)
}
