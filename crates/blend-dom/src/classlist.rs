//! Class attribute tokens

use std::fmt;

/// Tokens of a `class` attribute, in document order
///
/// Parsing keeps duplicates so that editing one class leaves the rest of
/// the attribute as authored, apart from whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn parse(class_attr: &str) -> Self {
        Self {
            tokens: class_attr.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.tokens.iter().any(|t| t == class_name)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append `class_name` unless present; empty names are ignored
    pub fn add(&mut self, class_name: &str) {
        if !class_name.is_empty() && !self.contains(class_name) {
            self.tokens.push(class_name.to_string());
        }
    }

    /// Drop every occurrence of `class_name`
    pub fn remove(&mut self, class_name: &str) {
        self.tokens.retain(|t| t != class_name);
    }

    /// Flip `class_name`, returning whether it is now present
    pub fn toggle(&mut self, class_name: &str) -> bool {
        if self.contains(class_name) {
            self.remove(class_name);
            false
        } else {
            self.add(class_name);
            !class_name.is_empty()
        }
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}
