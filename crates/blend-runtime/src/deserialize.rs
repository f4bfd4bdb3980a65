//! Typed-object deserializer
//!
//! Revives parsed JSON bottom-up: every object whose `"type"` names a
//! constructible registered type becomes an instance of it, with each
//! property checked against the type's metadata. Shape problems are
//! reported to the diagnostic sink and the offending value dropped; they
//! never surface as `Err`.

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::metadata::{PropertyType, enumeration_keys};
use crate::registry::{Instance, TypeDescriptor, TypeRegistry};
use crate::value::Value;

/// JSON reviver bound to a type registry and a diagnostic sink
pub struct Deserializer<'a> {
    types: &'a TypeRegistry,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Deserializer<'a> {
    pub fn new(types: &'a TypeRegistry, diagnostics: &'a mut Diagnostics) -> Self {
        Self { types, diagnostics }
    }

    /// Parse and revive a JSON document
    ///
    /// Malformed JSON is an explicit `Err`.
    pub fn parse_str(&mut self, text: &str) -> Result<Value> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(self.revive(&json))
    }

    /// Revive an already-parsed JSON value
    pub fn revive(&mut self, json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.revive(item)).collect())
            }
            serde_json::Value::Object(object) => {
                let entries: Vec<(String, Value)> = object
                    .iter()
                    .map(|(k, v)| (k.clone(), self.revive(v)))
                    .collect();
                self.revive_object(entries)
            }
            other => Value::from_json(other),
        }
    }

    fn revive_object(&mut self, entries: Vec<(String, Value)>) -> Value {
        let types = self.types;
        let descriptor = entries
            .iter()
            .find(|(k, _)| k == "type")
            .and_then(|(_, v)| v.as_str())
            .and_then(|name| types.resolve(name))
            .filter(|d| d.is_constructible());

        match descriptor {
            Some(descriptor) => self
                .convert(entries, descriptor)
                .map(Instance::into_value)
                .unwrap_or(Value::Null),
            None => Value::Map(entries.into_iter().collect()),
        }
    }

    /// Build an instance of `descriptor` from object entries
    ///
    /// Returns `None` when a required property is missing or invalid.
    pub fn convert(
        &mut self,
        entries: Vec<(String, Value)>,
        descriptor: &'a TypeDescriptor,
    ) -> Option<Instance> {
        let mut instance = descriptor.construct()?;
        let parent = descriptor.short_name();
        let metadata = descriptor.type_metadata();
        if metadata.is_none() {
            self.diagnostics
                .report_warning("Blend.Util.NoMetadataForType", &[&parent]);
        }

        for (name, value) in entries {
            if name != "type" {
                self.assign(&mut instance, descriptor, &name, value);
            }
        }

        if let Some(metadata) = metadata {
            for (name, property) in metadata.iter() {
                if property.required && !instance.property(name).is_truthy() {
                    self.diagnostics
                        .report_error("Blend.Util.JsonPropertyMissing", &[&parent, &name]);
                    return None;
                }
            }
        }
        Some(instance)
    }

    fn assign(&mut self, instance: &mut Instance, descriptor: &'a TypeDescriptor, name: &str, value: Value) {
        let parent = descriptor.short_name();
        let metadata = descriptor.type_metadata();
        let property = metadata.and_then(|m| m.get(name));

        if let Some(ty) = property.and_then(|p| p.ty.as_ref()) {
            let element_type = property.and_then(|p| p.element_type.as_ref());
            if let Some(validated) = self.validate(parent, name, value, ty, element_type, false) {
                instance.set_property(name, validated);
            }
            return;
        }

        if metadata.is_some() {
            if property.is_some() {
                self.diagnostics
                    .report_warning("Blend.Util.NoTypeMetadataForProperty", &[&parent, &name]);
            } else {
                self.diagnostics
                    .report_warning("Blend.Util.JsonUnexpectedProperty", &[&name, &parent]);
            }
        }
        instance.set_property(name, value);
    }

    /// Check `value` against a declared type, converting where possible
    ///
    /// `quiet` suppresses the per-value mismatch report; array elements
    /// are validated quietly so the array reports a single error.
    fn validate(
        &mut self,
        parent: &str,
        name: &str,
        value: Value,
        ty: &PropertyType,
        element_type: Option<&PropertyType>,
        quiet: bool,
    ) -> Option<Value> {
        if !value.is_truthy() {
            return None;
        }

        if let PropertyType::Enumeration(pairs) = ty {
            let choices = enumeration_keys(pairs);
            let Some(text) = value.as_str() else {
                if !quiet {
                    self.diagnostics.report_error(
                        "Blend.Util.JsonEnumValueNotString",
                        &[&parent, &name, &value.type_description(), &choices],
                    );
                }
                return None;
            };
            let Some((_, mapped)) = pairs.iter().find(|(key, _)| *key == text) else {
                if !quiet {
                    self.diagnostics.report_error(
                        "Blend.Util.JsonInvalidEnumValue",
                        &[&parent, &name, &text, &choices],
                    );
                }
                return None;
            };
            return Some(Value::from(*mapped));
        }

        let types = self.types;
        if !self.matches_type(&value, ty) {
            if let (Value::Map(map), PropertyType::Class(class)) = (&value, ty) {
                let descriptor = types.resolve(class).filter(|d| d.is_constructible());
                if let Some(descriptor) = descriptor {
                    let entries = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                    return self.convert(entries, descriptor).map(Instance::into_value);
                }
            }
            if let PropertyType::Class(class) = ty {
                let converted = types
                    .resolve(class)
                    .and_then(|d| d.convert_from(&value))
                    .filter(Value::is_truthy);
                if converted.is_some() {
                    return converted;
                }
            }
            if !quiet {
                self.diagnostics.report_error(
                    "Blend.Util.JsonTypeMismatch",
                    &[&parent, &name, &value.type_description(), &ty.description()],
                );
            }
            return None;
        }

        let Value::Array(items) = value else {
            return Some(value);
        };
        let Some(element_type) = element_type else {
            self.diagnostics.report_warning(
                "Blend.Util.NoElementTypeMetadataForArrayProperty",
                &[&parent, &name],
            );
            return Some(Value::Array(items));
        };

        let mut validated = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let found = item.type_description();
            let truthy = item.is_truthy();
            match self.validate(parent, name, item, element_type, None, true) {
                Some(v) => validated.push(v),
                None if truthy => {
                    self.diagnostics.report_error(
                        "Blend.Util.JsonArrayTypeMismatch",
                        &[&parent, &name, &index, &found, &element_type.description()],
                    );
                    return None;
                }
                None => {
                    self.diagnostics.report_error(
                        "Blend.Util.JsonArrayElementMissing",
                        &[&parent, &name, &index],
                    );
                    return None;
                }
            }
        }
        Some(Value::Array(validated))
    }

    fn matches_type(&self, value: &Value, ty: &PropertyType) -> bool {
        match (ty, value) {
            (PropertyType::String, Value::String(_))
            | (PropertyType::Number, Value::Number(_))
            | (PropertyType::Boolean, Value::Bool(_))
            | (PropertyType::Array, Value::Array(_))
            | (PropertyType::Object, Value::Map(_) | Value::Action(_) | Value::Behavior(_)) => true,
            (PropertyType::Class(class), Value::Action(a)) => self.types.is_a(a.type_name(), class),
            (PropertyType::Class(class), Value::Behavior(b)) => self.types.is_a(b.type_name(), class),
            _ => false,
        }
    }

    /// Assign the properties of a JSON config block onto an instance
    ///
    /// Values are revived but assigned without validation.
    pub fn populate(&mut self, instance: &mut Instance, text: &str) -> Result<()> {
        if let Value::Map(map) = self.parse_str(text)? {
            for (name, value) in map {
                if name != "type" {
                    instance.set_property(&name, value);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionBase;
    use crate::metadata::{PropertyMetadata, TypeMetadata};

    fn capture() -> Diagnostics {
        Diagnostics::new(true)
    }

    #[test]
    fn test_plain_objects_pass_through() {
        let types = TypeRegistry::with_builtins();
        let mut diags = capture();
        let value = Deserializer::new(&types, &mut diags)
            .parse_str(r#"{"type": "No.Such.Type", "x": 1}"#)
            .unwrap();
        assert_eq!(value.get("x"), Some(&Value::Number(1.0)));
        assert!(diags.records().is_empty());
    }

    #[test]
    fn test_malformed_json_is_err() {
        let types = TypeRegistry::with_builtins();
        let mut diags = capture();
        assert!(Deserializer::new(&types, &mut diags).parse_str("{oops").is_err());
    }

    fn badge_registry() -> TypeRegistry {
        let mut types = TypeRegistry::with_builtins();
        types.register(
            TypeDescriptor::new("Test.Badge")
                .base("Blend.Actions.ActionBase")
                .metadata(
                    TypeMetadata::new()
                        .property("label", PropertyMetadata::of(PropertyType::String).required()),
                )
                .factory(|| Instance::Action(Box::new(ActionBase::default()))),
        );
        types
    }

    #[test]
    fn test_required_missing_drops_object() {
        let types = badge_registry();
        let mut diags = capture();
        let value = Deserializer::new(&types, &mut diags)
            .parse_str(r#"{"type": "Test.Badge", "label": ""}"#)
            .unwrap();
        assert!(value.is_null());
        assert_eq!(diags.count("Blend.Util.JsonPropertyMissing"), 1);
        assert_eq!(
            diags.records()[0].message,
            "Blend.Util.JsonPropertyMissing: Required property \"Badge.label\" is missing or invalid."
        );
    }

    #[test]
    fn test_builtin_actions_have_no_required_properties() {
        let types = TypeRegistry::with_builtins();
        let mut diags = capture();
        let value = Deserializer::new(&types, &mut diags)
            .parse_str(r#"[{"type": "AddClassAction"}, {"type": "LoadPageAction"}, {"type": "SetStyleAction"}]"#)
            .unwrap();
        let items = value.as_array().unwrap();
        assert!(items.iter().all(|item| item.as_action().is_some()));
        assert!(diags.records().is_empty());
    }

    #[test]
    fn test_type_mismatch_drops_property() {
        let types = TypeRegistry::with_builtins();
        let mut diags = capture();
        let value = Deserializer::new(&types, &mut diags)
            .parse_str(r#"{"type": "TimerBehavior", "totalTicks": "three", "millisecondsPerTick": 5}"#)
            .unwrap();
        let behavior = value.as_behavior().unwrap();
        assert_eq!(behavior.property("totalTicks"), Value::Number(10.0));
        assert_eq!(behavior.property("millisecondsPerTick"), Value::Number(5.0));
        assert_eq!(diags.count("Blend.Util.JsonTypeMismatch"), 1);
    }

    #[test]
    fn test_unexpected_property_is_kept() {
        let types = TypeRegistry::with_builtins();
        let mut diags = capture();
        let value = Deserializer::new(&types, &mut diags)
            .parse_str(r#"{"type": "SetStyleAction", "styleProperty": "color", "flavour": "mint"}"#)
            .unwrap();
        let action = value.as_action().unwrap();
        assert_eq!(action.property("flavour"), Value::from("mint"));
        assert_eq!(diags.count("Blend.Util.JsonUnexpectedProperty"), 1);
    }

    #[test]
    fn test_no_metadata_warning() {
        let types = TypeRegistry::with_builtins();
        let mut diags = capture();
        let value = Deserializer::new(&types, &mut diags)
            .parse_str(r#"{"type": "Blend.Actions.ActionBase", "anything": true}"#)
            .unwrap();
        assert!(value.as_action().is_some());
        assert_eq!(diags.count("Blend.Util.NoMetadataForType"), 1);
        assert_eq!(diags.count("Blend.Util.JsonUnexpectedProperty"), 0);
    }

    #[test]
    fn test_nested_map_converted_to_class() {
        let types = TypeRegistry::with_builtins();
        let mut diags = capture();
        let value = Deserializer::new(&types, &mut diags)
            .parse_str(
                r#"{"type": "LoadPageAction", "page": "a.html",
                    "pageLoaded": [{"type": "AddClassAction", "className": "ready"}]}"#,
            )
            .unwrap();
        let action = value.as_action().unwrap();
        let loaded = action.property("pageLoaded");
        let items = loaded.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].type_description(), "AddClassAction");
        assert!(diags.records().is_empty());
    }

    fn colour_registry() -> TypeRegistry {
        fn to_colour(value: &Value) -> Option<Value> {
            match value.as_str()? {
                "red" => Some(Value::Number(16_711_680.0)),
                _ => None,
            }
        }
        let mut types = TypeRegistry::with_builtins();
        types.register(TypeDescriptor::new("Test.Colour").converter(to_colour));
        types.register(
            TypeDescriptor::new("Test.Swatch")
                .base("Blend.Actions.ActionBase")
                .metadata(TypeMetadata::new().property(
                    "colour",
                    PropertyMetadata::of(PropertyType::Class("Test.Colour")),
                ))
                .factory(|| Instance::Action(Box::new(ActionBase::default()))),
        );
        types
    }

    #[test]
    fn test_converter_fallback() {
        let types = colour_registry();
        let mut diags = capture();
        let value = Deserializer::new(&types, &mut diags)
            .parse_str(r#"{"type": "Test.Swatch", "colour": "red"}"#)
            .unwrap();
        assert_eq!(
            value.as_action().unwrap().property("colour"),
            Value::Number(16_711_680.0)
        );

        let value = Deserializer::new(&types, &mut diags)
            .parse_str(r#"{"type": "Test.Swatch", "colour": "blue"}"#)
            .unwrap();
        assert!(value.as_action().unwrap().property("colour").is_null());
        assert_eq!(diags.count("Blend.Util.JsonTypeMismatch"), 1);
    }

    #[test]
    fn test_populate_assigns_raw() {
        let types = TypeRegistry::with_builtins();
        let mut diags = capture();
        let mut instance = types.resolve("TimerBehavior").unwrap().construct().unwrap();
        Deserializer::new(&types, &mut diags)
            .populate(&mut instance, r#"{"type": "ignored", "totalTicks": 3}"#)
            .unwrap();
        assert_eq!(instance.property("totalTicks"), Value::Number(3.0));
        assert_eq!(instance.type_name(), "Blend.Behaviors.TimerBehavior");
    }
}
