//! Inline style declarations
//!
//! Parses and rewrites the `style` attribute. Property names may be given
//! in camelCase (`backgroundColor`) or kebab-case (`background-color`).

/// Ordered list of `property: value` declarations from a `style` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    declarations: Vec<(String, String)>,
}

impl CssStyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value
    pub fn parse(css_text: &str) -> Self {
        let declarations = css_text
            .split(';')
            .filter_map(|decl| {
                let (name, value) = decl.split_once(':')?;
                let name = name.trim();
                let value = value.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        Self { declarations }
    }

    /// Get a property value
    pub fn get_property_value(&self, property: &str) -> Option<&str> {
        let name = to_kebab_case(property);
        self.declarations
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property; an empty value removes it
    pub fn set_property(&mut self, property: &str, value: &str) {
        let name = to_kebab_case(property);
        if name.is_empty() {
            return;
        }
        if value.trim().is_empty() {
            self.remove_property(&name);
            return;
        }
        match self.declarations.iter_mut().find(|(n, _)| *n == name) {
            Some(decl) => decl.1 = value.trim().to_string(),
            None => self.declarations.push((name, value.trim().to_string())),
        }
    }

    /// Remove a property, returning its previous value
    pub fn remove_property(&mut self, property: &str) -> Option<String> {
        let name = to_kebab_case(property);
        let pos = self.declarations.iter().position(|(n, _)| *n == name)?;
        Some(self.declarations.remove(pos).1)
    }

    /// Number of declarations
    pub fn length(&self) -> usize {
        self.declarations.len()
    }

    /// Serialize back to attribute form
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(n, v)| format!("{n}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Convert camelCase to kebab-case (`cssFloat` maps to `float`)
fn to_kebab_case(s: &str) -> String {
    let s = s.trim();
    if s == "cssFloat" {
        return "float".to_string();
    }
    let mut result = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
