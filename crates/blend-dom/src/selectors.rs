//! CSS Selectors
//!
//! Parsing and right-to-left matching of the selector subset used by
//! `querySelectorAll`: type, universal, id, class and attribute selectors,
//! descendant and child combinators, and comma-separated lists.

use crate::{DomTree, NodeId};
use thiserror::Error;

/// Selector syntax error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected character '{ch}' at offset {offset} in selector \"{selector}\"")]
    UnexpectedChar {
        ch: char,
        offset: usize,
        selector: String,
    },
    #[error("unexpected end of selector \"{0}\"")]
    UnexpectedEnd(String),
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name, lowercase)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (Some(matcher), Some(val)) = (&self.matcher, value) else {
            return self.matcher.is_none() && value.is_some();
        };
        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(val);
        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                !expected.is_empty() && val.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{expected}-"))
            }
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && val.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && val.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && val.contains(&fold(expected))
            }
        }
    }
}

/// Combinator between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
}

/// Sequence of simple selectors that all apply to one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    /// Match this compound against a single element
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        let Some(data) = tree.element(element) else {
            return false;
        };
        self.components.iter().all(|component| match component {
            SelectorComponent::Universal => true,
            SelectorComponent::Type(name) => data.tag_name.eq_ignore_ascii_case(name),
            SelectorComponent::Id(id) => data.id() == Some(id.as_str()),
            SelectorComponent::Class(class) => data.classes().any(|c| c == class),
            SelectorComponent::Attribute(attr) => attr.matches(data.get_attr(&attr.name)),
        })
    }
}

/// Compound selectors joined by combinators, e.g. `nav > ul li.active`
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    /// Compounds left to right
    pub compounds: Vec<CompoundSelector>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    pub combinators: Vec<Combinator>,
}

impl ComplexSelector {
    /// Match the selector with `element` as its subject
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(tree, n - 1, element),
        }
    }

    fn matches_at(&self, tree: &DomTree, index: usize, element: NodeId) -> bool {
        if !self.compounds[index].matches(tree, element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent(element)
                .filter(|&p| tree.is_element(p))
                .is_some_and(|p| self.matches_at(tree, index - 1, p)),
            Combinator::Descendant => tree
                .ancestors(element)
                .filter(|&a| tree.is_element(a))
                .any(|a| self.matches_at(tree, index - 1, a)),
        }
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse_list()
    }

    /// True if any selector in the list matches the element
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(tree, element))
    }
}

struct SelectorParser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar {
                ch,
                offset: self.pos,
                selector: self.input.to_string(),
            },
            None => SelectorError::UnexpectedEnd(self.input.to_string()),
        }
    }

    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        if self.input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut selectors = vec![self.parse_complex()?];
        while self.peek() == Some(',') {
            self.bump();
            selectors.push(self.parse_complex()?);
        }
        if self.peek().is_some() {
            return Err(self.unexpected());
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        self.skip_whitespace();
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(',') | None => break,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }
        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();
        match self.peek() {
            Some('*') => {
                self.bump();
                components.push(SelectorComponent::Universal);
            }
            Some(c) if is_ident_char(c) => {
                let name = self.parse_ident()?;
                components.push(SelectorComponent::Type(name.to_ascii_lowercase()));
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    components.push(SelectorComponent::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.bump();
                    components.push(SelectorComponent::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.bump();
                    components.push(SelectorComponent::Attribute(self.parse_attribute()?));
                }
                _ => break,
            }
        }
        if components.is_empty() {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { components })
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                match self.bump() {
                    Some(escaped) => ident.push(escaped),
                    None => return Err(self.unexpected()),
                }
            } else if is_ident_char(c) {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.unexpected());
        }
        Ok(ident)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.peek() {
            Some(']') => {
                self.bump();
                return Ok(AttributeSelector {
                    name,
                    matcher: None,
                    case_insensitive: false,
                });
            }
            Some('=') => {
                self.bump();
                '='
            }
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.bump();
                if self.peek() != Some('=') {
                    return Err(self.unexpected());
                }
                self.bump();
                c
            }
            _ => return Err(self.unexpected()),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => break,
                        Some('\\') => match self.bump() {
                            Some(c) => value.push(c),
                            None => return Err(self.unexpected()),
                        },
                        Some(c) => value.push(c),
                        None => return Err(self.unexpected()),
                    }
                }
                value
            }
            _ => self.parse_ident()?,
        };

        self.skip_whitespace();
        let mut case_insensitive = false;
        if matches!(self.peek(), Some('i' | 'I')) {
            self.bump();
            case_insensitive = true;
            self.skip_whitespace();
        }
        if self.peek() != Some(']') {
            return Err(self.unexpected());
        }
        self.bump();

        let matcher = match op {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
