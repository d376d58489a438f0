/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for expression compilation and evaluation.

use thiserror::Error;

/// Errors that can occur while compiling or evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// The expression text is not well formed.
    #[error("Parse error at position {position}: {message}")]
    Parse { message: String, position: usize },

    /// A variable was neither bound nor a built-in constant.
    #[error("Undefined symbol: {name}")]
    UnknownVariable { name: String },

    /// A call named a function that is not registered.
    #[error("Undefined function: {name}")]
    UnknownFunction { name: String },

    /// A function was called with the wrong number of arguments.
    #[error("Wrong number of arguments for '{name}': expected {expected}, found {found}")]
    Arity {
        name: String,
        expected: String,
        found: usize,
    },

    /// An operator or function received a value it cannot handle.
    #[error("Type error: {message}")]
    Type { message: String },

    /// A host-registered function reported a failure.
    #[error("Function '{name}' failed: {message}")]
    Function { name: String, message: String },
}

impl ExprError {
    pub(crate) fn parse(message: impl Into<String>, position: usize) -> Self {
        ExprError::Parse {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        ExprError::Type {
            message: message.into(),
        }
    }
}

/// Result type for expression operations.
pub type ExprResult<T> = Result<T, ExprError>;
