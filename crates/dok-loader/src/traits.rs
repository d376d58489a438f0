/*
 * traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Defines the Loader trait used by the engine to fetch templates and
 * reference targets.
 */

use crate::error::LoadResult;
use async_trait::async_trait;
use dok_config::ConfigNode;
use std::sync::Arc;

/// How the caller wants the loaded content returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Decode by file extension into a structured tree when a decoder exists.
    #[default]
    Json,
    /// Return the raw text.
    Text,
}

/// Content returned by a [`Loader`].
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// A decoded tree.
    Structured(ConfigNode),
    /// Raw text, either requested as such or with no decoder for its extension.
    Text(String),
}

impl Loaded {
    pub fn into_structured(self) -> Option<ConfigNode> {
        match self {
            Loaded::Structured(node) => Some(node),
            Loaded::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Loaded::Text(_))
    }
}

/// Turns a path into parsed content.
///
/// Paths handed to a loader are already resolved against the including file
/// (see [`crate::resolve_path`]); a loader only has to fetch and decode.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, path: &str, response_type: ResponseType) -> LoadResult<Loaded>;
}

#[async_trait]
impl<L: Loader + ?Sized> Loader for Arc<L> {
    async fn load(&self, path: &str, response_type: ResponseType) -> LoadResult<Loaded> {
        (**self).load(path, response_type).await
    }
}

/// Loader that never finds anything.
///
/// Use it for trees that carry no `template` or `reference` directives.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLoader;

#[async_trait]
impl Loader for NullLoader {
    async fn load(&self, path: &str, _response_type: ResponseType) -> LoadResult<Loaded> {
        Err(crate::LoadError::NotFound {
            path: path.to_string(),
        })
    }
}
