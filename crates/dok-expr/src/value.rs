/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Runtime values produced by expression evaluation.

use crate::error::{ExprError, ExprResult};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Variable bindings visible to an evaluation.
pub type Bindings = HashMap<String, Value>;

/// A value produced or consumed by an expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Check if this value is "truthy" for conditions and logical operators.
    ///
    /// Null, `false`, `0`, `NaN` and `""` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Map(_) => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "object",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Coerce to a number the way arithmetic operators do.
    ///
    /// Booleans become 1/0, null becomes 0 and numeric strings are parsed.
    pub fn to_number(&self) -> ExprResult<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Null => Ok(0.0),
            Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
                ExprError::type_error(format!("Cannot convert \"{}\" to a number", s))
            }),
            other => Err(ExprError::type_error(format!(
                "Cannot convert {} to a number",
                other.type_name()
            ))),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "\"{}\": {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_numbers() {
        assert_eq!(Value::Number(9.0).to_string(), "9");
        assert_eq!(Value::Number(-2.5).to_string(), "-2.5");
    }

    #[test]
    fn test_display_array() {
        let value = Value::Array(vec![Value::Number(1.0), Value::from("a")]);
        assert_eq!(value.to_string(), "1,a");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::Bool(true).to_number(), Ok(1.0));
        assert_eq!(Value::Null.to_number(), Ok(0.0));
        assert_eq!(Value::from(" 42 ").to_number(), Ok(42.0));
        assert!(Value::from("abc").to_number().is_err());
        assert!(Value::Array(vec![]).to_number().is_err());
    }
}
