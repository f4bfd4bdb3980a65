//! Resource strings
//!
//! Message templates keyed by resource id, and the `{n}` formatter used
//! to fill them.

use crate::error::{BlendError, Result};
use std::fmt::Display;

const STRINGS: &[(&str, &str)] = &[
    ("Blend.Util.JsonUnexpectedProperty", "Property \"{0}\" is not expected for {1}."),
    ("Blend.Util.JsonTypeMismatch", "{0}.{1}: Found type: {2}; Expected type: {3}."),
    ("Blend.Util.JsonPropertyMissing", "Required property \"{0}.{1}\" is missing or invalid."),
    ("Blend.Util.JsonArrayTypeMismatch", "{0}.{1}[{2}]: Found type: {3}; Expected type: {4}."),
    ("Blend.Util.JsonArrayElementMissing", "{0}.{1}[{2}] is missing or invalid."),
    (
        "Blend.Util.JsonEnumValueNotString",
        "{0}.{1}: Found type: {2}; Expected type: String (choice of: {3}).",
    ),
    (
        "Blend.Util.JsonInvalidEnumValue",
        "{0}.{1}: Invalid value. Found: {2}; Expected one of: {3}.",
    ),
    ("Blend.Util.NoMetadataForType", "No property metadata found for type {0}."),
    ("Blend.Util.NoTypeMetadataForProperty", "No type metadata specified for {0}.{1}."),
    (
        "Blend.Util.NoElementTypeMetadataForArrayProperty",
        "No element type metadata specified for {0}.{1}[].",
    ),
    ("Blend.Resources.MalformedFormatStringInput", "Malformed, did you mean to escape your '{0}'?"),
    ("Blend.ActionTrees.JsonNotArray", "ActionTrees JSON data must be an array ({0})."),
    ("Blend.ActionTrees.JsonDuplicateActionTreeName", "Duplicate action tree name \"{0}\" ({1})."),
    ("Blend.ActionTrees.MissingName", "Action tree at index {0} has no name and was skipped."),
    ("Blend.Behaviors.InvalidBehavior", "Entry {0} of the behaviors for \"{1}\" is not a behavior ({2})."),
    ("Blend.Dom.InvalidSelector", "Invalid selector \"{0}\" matches nothing: {1}."),
];

/// Result of a resource lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceString {
    pub value: String,
    /// True when the id is unknown and `value` is the id itself
    pub empty: bool,
}

/// Look up a resource string by id
pub fn get_string(resource_id: &str) -> ResourceString {
    match STRINGS.iter().find(|(id, _)| *id == resource_id) {
        Some((_, value)) => ResourceString {
            value: value.to_string(),
            empty: false,
        },
        None => ResourceString {
            value: resource_id.to_string(),
            empty: true,
        },
    }
}

/// Substitute `{n}` placeholders with `args[n]`
///
/// `{{` and `}}` produce literal braces and an index with no matching
/// argument becomes `undefined`. A lone brace is an error. Without
/// arguments the template is returned untouched.
pub fn format_string(template: &str, args: &[&dyn Display]) -> Result<String> {
    if args.is_empty() {
        return Ok(template.to_string());
    }

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                    digits.push(d);
                    chars.next();
                }
                if digits.is_empty() || chars.peek() != Some(&'}') {
                    return Err(BlendError::MalformedFormatString('{'));
                }
                chars.next();
                match digits.parse::<usize>().ok().and_then(|i| args.get(i)) {
                    Some(arg) => out.push_str(&arg.to_string()),
                    None => out.push_str("undefined"),
                }
            }
            '}' => return Err(BlendError::MalformedFormatString('}')),
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Build the `"{id}: {message}"` line for a diagnostic
///
/// Unknown ids are reported verbatim.
pub fn format_message(resource_id: &str, args: &[&dyn Display]) -> Result<String> {
    let resource = get_string(resource_id);
    if resource.empty {
        return Ok(resource_id.to_string());
    }
    Ok(format!("{resource_id}: {}", format_string(&resource.value, args)?))
}
