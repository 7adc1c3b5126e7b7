//! Node and property model.
//!
//! Values are kept in raw bracketed form; which codec applies to them depends
//! on the identifier and is left to the caller.

use std::fmt;

use itertools::Itertools;

use crate::domain::scanner::{identifier_end, value_end};
use crate::domain::value::unwrap_value;

/// One property: identifier plus raw values (`"[...]"`).
///
/// `values` is empty for a bare `ID`, and holds a single `"[]"` for `ID[]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Property {
    pub id: String,
    pub values: Vec<String>,
}

impl Property {
    pub fn new(id: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    /// Parse `ID[v1][v2]...`. Text before the identifier is ignored.
    pub fn parse(text: &str) -> Self {
        Node::parse(text)
            .properties
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// Values with their brackets stripped.
    pub fn bare_values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| unwrap_value(v))
    }

    /// First value with brackets stripped.
    pub fn first_bare(&self) -> Option<&str> {
        self.bare_values().next()
    }

    pub fn to_sgf(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.id, self.values.iter().format(""))
    }
}

/// A node: its properties in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    pub properties: Vec<Property>,
}

impl Node {
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    /// Decompose a node token (`";B[pd]C[hi]"`) into its properties.
    ///
    /// Each identifier owns the values that follow it up to the next
    /// identifier. Values before the first identifier and stray characters
    /// are skipped.
    pub fn parse(token: &str) -> Self {
        let bytes = token.as_bytes();
        let mut properties: Vec<Property> = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b'A'..=b'Z' => {
                    let end = identifier_end(token, pos);
                    properties.push(Property::new(&token[pos..end], Vec::new()));
                    pos = end;
                }
                b'[' => match value_end(token, pos) {
                    Some(end) => {
                        if let Some(current) = properties.last_mut() {
                            current.values.push(token[pos..end].to_string());
                        }
                        pos = end;
                    }
                    None => break,
                },
                _ => pos += 1,
            }
        }

        Self { properties }
    }

    pub fn get(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.id == id)
    }

    pub fn to_sgf(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ";{}", self.properties.iter().format(""))
    }
}
