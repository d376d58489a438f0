/*
 * memory.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! In-memory loader for tests and embedded content.

use crate::error::{LoadError, LoadResult};
use crate::traits::{Loaded, Loader, ResponseType};
use async_trait::async_trait;
use dok_config::ConfigNode;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Loader backed by a path → content map.
///
/// Every request is recorded, so tests can check which paths the engine
/// asked for.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    entries: HashMap<String, Loaded>,
    requests: Mutex<Vec<String>>,
}

impl MemoryLoader {
    /// Create a new empty memory loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a structured entry.
    pub fn add(&mut self, path: impl Into<String>, node: ConfigNode) -> &mut Self {
        self.entries.insert(path.into(), Loaded::Structured(node));
        self
    }

    /// Add a text entry.
    pub fn add_text(&mut self, path: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.entries.insert(path.into(), Loaded::Text(text.into()));
        self
    }

    /// Add an entry parsed from JSON text.
    pub fn add_json(&mut self, path: impl Into<String>, json: &str) -> dok_config::Result<&mut Self> {
        let node = ConfigNode::from_json_str(json)?;
        Ok(self.add(path, node))
    }

    /// Create a loader from `(path, json)` pairs.
    pub fn with_json<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> dok_config::Result<Self> {
        let mut loader = Self::new();
        for (path, json) in entries {
            loader.add_json(path, json)?;
        }
        Ok(loader)
    }

    /// Paths requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Loader for MemoryLoader {
    async fn load(&self, path: &str, response_type: ResponseType) -> LoadResult<Loaded> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());

        let entry = self.entries.get(path).ok_or_else(|| LoadError::NotFound {
            path: path.to_string(),
        })?;

        match (entry, response_type) {
            (Loaded::Structured(node), ResponseType::Text) => node
                .to_json_string_pretty()
                .map(Loaded::Text)
                .map_err(|e| LoadError::Parse {
                    path: path.to_string(),
                    message: e.to_string(),
                }),
            (entry, _) => Ok(entry.clone()),
        }
    }
}
