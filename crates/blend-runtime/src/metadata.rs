//! Property metadata
//!
//! Per-type schema used by the deserializer to validate JSON properties.
//! A derived type's metadata is merged over its base once, when the type
//! is registered.

/// Declared type of a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// String key mapped to its value; only the listed keys are accepted
    Enumeration(&'static [(&'static str, &'static str)]),
    /// Registered type name (instances of it or of a derived type)
    Class(&'static str),
}

impl PropertyType {
    /// Name used in diagnostics
    pub fn description(&self) -> String {
        match self {
            PropertyType::String => "String".to_string(),
            PropertyType::Number => "Number".to_string(),
            PropertyType::Boolean => "Boolean".to_string(),
            PropertyType::Array => "Array".to_string(),
            PropertyType::Object => "Object".to_string(),
            PropertyType::Enumeration(choices) => enumeration_keys(choices),
            PropertyType::Class(name) => crate::value::short_type_name(name).to_string(),
        }
    }
}

/// Comma-separated keys of an enumeration
pub(crate) fn enumeration_keys(choices: &[(&str, &str)]) -> String {
    choices.iter().map(|(key, _)| *key).collect::<Vec<_>>().join(",")
}

/// Metadata for one property
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyMetadata {
    /// `None` means the entry exists but declares no type
    pub ty: Option<PropertyType>,
    /// Element type for arrays
    pub element_type: Option<PropertyType>,
    pub required: bool,
}

impl PropertyMetadata {
    pub fn of(ty: PropertyType) -> Self {
        Self {
            ty: Some(ty),
            ..Self::default()
        }
    }

    /// Array whose elements must be `element_type`
    pub fn array_of(element_type: PropertyType) -> Self {
        Self {
            ty: Some(PropertyType::Array),
            element_type: Some(element_type),
            required: false,
        }
    }

    /// Entry with no declared type
    pub fn untyped() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Property metadata of a type, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeMetadata {
    properties: Vec<(String, PropertyMetadata)>,
}

impl TypeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style property declaration
    pub fn property(mut self, name: &str, metadata: PropertyMetadata) -> Self {
        self.insert(name, metadata);
        self
    }

    /// Insert or replace, keeping the original position on replace
    pub fn insert(&mut self, name: &str, metadata: PropertyMetadata) {
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = metadata,
            None => self.properties.push((name.to_string(), metadata)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyMetadata> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyMetadata)> {
        self.properties.iter().map(|(n, m)| (n.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Base entries first, overridden by ours
    pub fn merged_over(&self, base: &TypeMetadata) -> TypeMetadata {
        let mut merged = base.clone();
        for (name, metadata) in &self.properties {
            merged.insert(name, metadata.clone());
        }
        merged
    }
}
