/*
 * types.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Core type definitions for configuration trees.

use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;

/// Ordered mapping from field names to child nodes.
pub type Mapping = IndexMap<String, ConfigNode>;

/// An atomic configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(f64),
    Bool(bool),
}

/// A node of a configuration tree.
///
/// This mirrors JSON/YAML value shapes. Directive keys (`template`, `repeat`,
/// ...) are ordinary mapping entries at this level; their meaning is applied
/// by the resolver and expander.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigNode {
    #[default]
    Null,

    /// Atomic values (string, number, boolean).
    Scalar(Scalar),

    /// Order-significant list of nodes.
    Sequence(Vec<ConfigNode>),

    /// Field-name keyed nodes. Keys are unique.
    Mapping(Mapping),
}

impl ConfigNode {
    /// Create a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        ConfigNode::Scalar(Scalar::String(value.into()))
    }

    /// Create a numeric scalar.
    pub fn number(value: impl Into<f64>) -> Self {
        ConfigNode::Scalar(Scalar::Number(value.into()))
    }

    /// Create a boolean scalar.
    pub fn bool(value: bool) -> Self {
        ConfigNode::Scalar(Scalar::Bool(value))
    }

    /// Create an empty mapping.
    pub fn empty_mapping() -> Self {
        ConfigNode::Mapping(Mapping::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigNode::Null)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ConfigNode::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, ConfigNode::Sequence(_))
    }

    /// Check if this node is a sequence or a mapping.
    pub fn is_container(&self) -> bool {
        self.is_mapping() || self.is_sequence()
    }

    /// Get a field of a mapping node.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        match self {
            ConfigNode::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Get an element of a sequence node.
    pub fn at(&self, index: usize) -> Option<&ConfigNode> {
        match self {
            ConfigNode::Sequence(items) => items.get(index),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigNode::Scalar(Scalar::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigNode::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigNode]> {
        match self {
            ConfigNode::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConfigNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            ConfigNode::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Check if this value is "truthy".
    ///
    /// Truthiness rules:
    /// - Null, `false`, `0`, `NaN` and the empty string are falsy
    /// - Every other scalar is truthy
    /// - Sequences and mappings are always truthy, even when empty
    pub fn is_truthy(&self) -> bool {
        match self {
            ConfigNode::Null => false,
            ConfigNode::Scalar(Scalar::Bool(b)) => *b,
            ConfigNode::Scalar(Scalar::Number(n)) => *n != 0.0 && !n.is_nan(),
            ConfigNode::Scalar(Scalar::String(s)) => !s.is_empty(),
            ConfigNode::Sequence(_) | ConfigNode::Mapping(_) => true,
        }
    }

    /// Short name of this node's shape, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigNode::Null => "null",
            ConfigNode::Scalar(Scalar::String(_)) => "string",
            ConfigNode::Scalar(Scalar::Number(_)) => "number",
            ConfigNode::Scalar(Scalar::Bool(_)) => "boolean",
            ConfigNode::Sequence(_) => "sequence",
            ConfigNode::Mapping(_) => "mapping",
        }
    }
}

impl From<&str> for ConfigNode {
    fn from(value: &str) -> Self {
        ConfigNode::string(value)
    }
}

impl From<String> for ConfigNode {
    fn from(value: String) -> Self {
        ConfigNode::string(value)
    }
}

impl From<f64> for ConfigNode {
    fn from(value: f64) -> Self {
        ConfigNode::number(value)
    }
}

impl From<i64> for ConfigNode {
    fn from(value: i64) -> Self {
        ConfigNode::number(value as f64)
    }
}

impl From<bool> for ConfigNode {
    fn from(value: bool) -> Self {
        ConfigNode::bool(value)
    }
}

impl From<Vec<ConfigNode>> for ConfigNode {
    fn from(value: Vec<ConfigNode>) -> Self {
        ConfigNode::Sequence(value)
    }
}

impl From<Mapping> for ConfigNode {
    fn from(value: Mapping) -> Self {
        ConfigNode::Mapping(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Errors that can occur while decoding configuration text.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!ConfigNode::Null.is_truthy());
        assert!(!ConfigNode::bool(false).is_truthy());
        assert!(!ConfigNode::number(0.0).is_truthy());
        assert!(!ConfigNode::number(f64::NAN).is_truthy());
        assert!(!ConfigNode::string("").is_truthy());

        assert!(ConfigNode::bool(true).is_truthy());
        assert!(ConfigNode::number(-1.0).is_truthy());
        assert!(ConfigNode::string("false").is_truthy());
        assert!(ConfigNode::Sequence(vec![]).is_truthy());
        assert!(ConfigNode::empty_mapping().is_truthy());
    }

    #[test]
    fn test_accessors() {
        let mut map = Mapping::new();
        map.insert("name".to_string(), ConfigNode::string("box"));
        map.insert(
            "sizes".to_string(),
            ConfigNode::Sequence(vec![ConfigNode::number(1.0), ConfigNode::number(2.0)]),
        );
        let node = ConfigNode::Mapping(map);

        assert!(node.is_mapping());
        assert_eq!(node.get("name").and_then(ConfigNode::as_str), Some("box"));
        assert_eq!(
            node.get("sizes").and_then(|s| s.at(1)).and_then(ConfigNode::as_f64),
            Some(2.0)
        );
        assert!(node.get("missing").is_none());
        assert!(ConfigNode::Null.get("name").is_none());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(ConfigNode::Null.type_name(), "null");
        assert_eq!(ConfigNode::string("x").type_name(), "string");
        assert_eq!(ConfigNode::number(1.0).type_name(), "number");
        assert_eq!(ConfigNode::bool(true).type_name(), "boolean");
        assert_eq!(ConfigNode::Sequence(vec![]).type_name(), "sequence");
        assert_eq!(ConfigNode::empty_mapping().type_name(), "mapping");
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Number(9.0).to_string(), "9");
        assert_eq!(Scalar::Number(0.5).to_string(), "0.5");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::String("hi".into()).to_string(), "hi");
    }
}
