//! Runtime values
//!
//! `Value` is what JSON definitions revive into: plain data plus the
//! typed action and behavior instances created by the deserializer.

use crate::actions::Action;
use crate::behaviors::Behavior;
use blend_dom::{Event, NodeId};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Untyped key/value object, iterated in key order
///
/// Source order is not kept here; code that needs it walks the parsed
/// `serde_json` object instead.
pub type Map = BTreeMap<String, Value>;

/// A revived JSON value
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Map(Map),
    /// Explicit element reference
    Element(NodeId),
    Action(Rc<dyn Action>),
    Behavior(Rc<dyn Behavior>),
}

impl Value {
    /// Convert plain JSON without any type resolution
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// JavaScript truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<NodeId> {
        match self {
            Value::Element(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_action(&self) -> Option<&Rc<dyn Action>> {
        match self {
            Value::Action(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_behavior(&self) -> Option<&Rc<dyn Behavior>> {
        match self {
            Value::Behavior(b) => Some(b),
            _ => None,
        }
    }

    /// Member of a plain object
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Friendly type name used in diagnostics
    pub fn type_description(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "Boolean".to_string(),
            Value::Number(_) => "Number".to_string(),
            Value::String(_) => "String".to_string(),
            Value::Array(_) => "Array".to_string(),
            Value::Map(_) => "Object".to_string(),
            Value::Element(_) => "Element".to_string(),
            Value::Action(a) => short_type_name(a.type_name()).to_string(),
            Value::Behavior(b) => short_type_name(b.type_name()).to_string(),
        }
    }
}

/// Last segment of a dotted type name
pub fn short_type_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Element(a), Value::Element(b)) => a == b,
            (Value::Action(a), Value::Action(b)) => Rc::ptr_eq(a, b),
            (Value::Behavior(a), Value::Behavior(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(","))
            }
            Value::Map(_) => write!(f, "[object Object]"),
            Value::Element(id) => write!(f, "[element {id}]"),
            Value::Action(_) | Value::Behavior(_) => write!(f, "[object {}]", self.type_description()),
        }
    }
}

/// Format a number the way JavaScript prints it
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::Element(id)
    }
}

/// An argument passed to an action-tree invocation
#[derive(Clone, Debug, PartialEq)]
pub enum CallArg {
    Event(Event),
    Value(Value),
}

impl CallArg {
    pub fn as_event(&self) -> Option<&Event> {
        match self {
            CallArg::Event(e) => Some(e),
            CallArg::Value(_) => None,
        }
    }
}

impl From<Event> for CallArg {
    fn from(event: Event) -> Self {
        CallArg::Event(event)
    }
}

impl From<Value> for CallArg {
    fn from(value: Value) -> Self {
        CallArg::Value(value)
    }
}
