//! Type registry
//!
//! Maps type names used in JSON `"type"` fields to factories and property
//! metadata. Each type is reachable under its dotted name and, when not
//! already taken, under its short name (`Blend.Actions.AddClassAction`
//! and `AddClassAction`).

use crate::actions::{self, Action};
use crate::behaviors::{self, Behavior};
use crate::metadata::TypeMetadata;
use crate::value::{Value, short_type_name};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Object whose properties can be assigned from JSON
pub trait JsonObject: fmt::Debug {
    /// Registered (dotted) type name
    fn type_name(&self) -> &'static str;

    /// Assign a property; names the type does not know are kept as extras
    fn set_property(&mut self, name: &str, value: Value);

    /// Current value of a property (`Value::Null` when unset)
    fn property(&self, name: &str) -> Value;
}

/// A freshly constructed, not yet shared, typed object
#[derive(Debug)]
pub enum Instance {
    Action(Box<dyn Action>),
    Behavior(Box<dyn Behavior>),
}

impl Instance {
    pub fn type_name(&self) -> &'static str {
        match self {
            Instance::Action(a) => a.type_name(),
            Instance::Behavior(b) => b.type_name(),
        }
    }

    pub fn set_property(&mut self, name: &str, value: Value) {
        match self {
            Instance::Action(a) => a.set_property(name, value),
            Instance::Behavior(b) => b.set_property(name, value),
        }
    }

    pub fn property(&self, name: &str) -> Value {
        match self {
            Instance::Action(a) => a.property(name),
            Instance::Behavior(b) => b.property(name),
        }
    }

    /// Freeze into a shareable value
    pub fn into_value(self) -> Value {
        match self {
            Instance::Action(a) => Value::Action(Rc::from(a)),
            Instance::Behavior(b) => Value::Behavior(Rc::from(b)),
        }
    }
}

/// Fallback conversion for values that do not match a class type
pub type Converter = fn(&Value) -> Option<Value>;

/// Registration record for one type
#[derive(Clone)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub base: Option<&'static str>,
    metadata: Option<TypeMetadata>,
    factory: Option<fn() -> Instance>,
    converter: Option<Converter>,
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("metadata", &self.metadata)
            .field("constructible", &self.factory.is_some())
            .finish()
    }
}

impl TypeDescriptor {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            base: None,
            metadata: None,
            factory: None,
            converter: None,
        }
    }

    pub fn base(mut self, base: &'static str) -> Self {
        self.base = Some(base);
        self
    }

    pub fn metadata(mut self, metadata: TypeMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn factory(mut self, factory: fn() -> Instance) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Merged property metadata, if the type or any base declares some
    pub fn type_metadata(&self) -> Option<&TypeMetadata> {
        self.metadata.as_ref()
    }

    pub fn is_constructible(&self) -> bool {
        self.factory.is_some()
    }

    /// Construct a default instance
    pub fn construct(&self) -> Option<Instance> {
        self.factory.map(|f| f())
    }

    pub fn convert_from(&self, value: &Value) -> Option<Value> {
        self.converter.and_then(|c| c(value))
    }

    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

/// Registry of constructible JSON types
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<&'static str, TypeDescriptor>,
    aliases: HashMap<&'static str, &'static str>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in action and behavior type
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        actions::register(&mut registry);
        behaviors::register(&mut registry);
        registry
    }

    /// Register a type, merging its metadata over its base's
    ///
    /// Bases must be registered first. Re-registering a name replaces it.
    pub fn register(&mut self, mut descriptor: TypeDescriptor) {
        let base_metadata = descriptor
            .base
            .and_then(|b| self.resolve(b))
            .and_then(|b| b.metadata.clone());
        descriptor.metadata = match (descriptor.metadata.take(), base_metadata) {
            (Some(own), Some(base)) => Some(own.merged_over(&base)),
            (own, base) => own.or(base),
        };

        let short = descriptor.short_name();
        if short != descriptor.name && !self.types.contains_key(short) {
            self.aliases.entry(short).or_insert(descriptor.name);
        }
        tracing::trace!("Registered type {}", descriptor.name);
        self.types.insert(descriptor.name, descriptor);
    }

    /// Look up by full or short name
    pub fn resolve(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types
            .get(name)
            .or_else(|| self.aliases.get(name).and_then(|full| self.types.get(full)))
    }

    /// Check whether `name` is `ancestor` or derives from it
    pub fn is_a(&self, name: &str, ancestor: &str) -> bool {
        let Some(target) = self.resolve(ancestor).map(|d| d.name) else {
            return false;
        };
        let mut current = self.resolve(name);
        while let Some(descriptor) = current {
            if descriptor.name == target {
                return true;
            }
            current = descriptor.base.and_then(|b| self.resolve(b));
        }
        false
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
