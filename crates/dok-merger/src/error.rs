/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for the expansion engine.

use dok_expr::ExprError;
use dok_loader::LoadError;
use thiserror::Error;

/// Errors that abort a resolve or expand call.
///
/// Every failure is fatal for the call that raised it; no partial tree is
/// returned.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A template or reference target could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// An embedded expression failed to compile or evaluate.
    #[error("Error in expression '{{{source_text}}}': {error}")]
    Expression {
        source_text: String,
        #[source]
        error: ExprError,
    },

    /// A directive or parameter had the wrong shape.
    #[error("{0}")]
    StructuralMisuse(String),

    /// Template or reference resolution recursed past the configured limit.
    #[error("Nesting exceeds maximum depth of {max_depth} while resolving '{path}'")]
    NestingTooDeep { max_depth: usize, path: String },

    /// A template loaded as text rather than a structured tree.
    #[error("Template '{path}' is not structured data")]
    TemplateNotStructured { path: String },
}

impl EngineError {
    pub(crate) fn misuse(message: impl Into<String>) -> Self {
        EngineError::StructuralMisuse(message.into())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
