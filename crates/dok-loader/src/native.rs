/*
 * native.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Filesystem-backed loader with per-extension decoders.
 */

use crate::error::{LoadError, LoadResult};
use crate::path::extension;
use crate::traits::{Loaded, Loader, ResponseType};
use async_trait::async_trait;
use dok_config::ConfigNode;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Decodes file text into a tree. Errors are reported as messages.
pub type Decoder = Arc<dyn Fn(&str) -> Result<ConfigNode, String> + Send + Sync>;

/// Loader that reads from the local filesystem.
///
/// Content requested as [`ResponseType::Json`] is decoded by the decoder
/// registered for the file's extension. Files with no registered decoder
/// come back as [`Loaded::Text`].
#[derive(Clone)]
pub struct FileSystemLoader {
    root: Option<PathBuf>,
    decoders: HashMap<String, Decoder>,
}

impl fmt::Debug for FileSystemLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extensions: Vec<&String> = self.decoders.keys().collect();
        extensions.sort();
        f.debug_struct("FileSystemLoader")
            .field("root", &self.root)
            .field("decoders", &extensions)
            .finish()
    }
}

impl Default for FileSystemLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemLoader {
    /// Create a loader that reads paths as given, with JSON and YAML decoders.
    pub fn new() -> Self {
        let mut loader = Self {
            root: None,
            decoders: HashMap::new(),
        };
        loader.register_decoder("json", |text| {
            ConfigNode::from_json_str(text).map_err(|e| e.to_string())
        });
        let yaml = |text: &str| ConfigNode::from_yaml_str(text).map_err(|e| e.to_string());
        loader.register_decoder("yaml", yaml);
        loader.register_decoder("yml", yaml);
        loader
    }

    /// Create a loader that reads every path, absolute ones included, under `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::new()
        }
    }

    /// Register (or replace) the decoder for an extension, given without the dot.
    pub fn register_decoder<F>(&mut self, extension: impl Into<String>, decoder: F) -> &mut Self
    where
        F: Fn(&str) -> Result<ConfigNode, String> + Send + Sync + 'static,
    {
        self.decoders
            .insert(extension.into().to_ascii_lowercase(), Arc::new(decoder));
        self
    }

    pub fn has_decoder(&self, extension: &str) -> bool {
        self.decoders.contains_key(&extension.to_ascii_lowercase())
    }

    fn file_path(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path.trim_start_matches('/')),
            None => PathBuf::from(path),
        }
    }
}

#[async_trait]
impl Loader for FileSystemLoader {
    async fn load(&self, path: &str, response_type: ResponseType) -> LoadResult<Loaded> {
        let file_path = self.file_path(path);
        tracing::debug!(path, file = %file_path.display(), "Loading file");

        let text = std::fs::read_to_string(&file_path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_string(),
                }
            } else {
                LoadError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        })?;

        if response_type == ResponseType::Text {
            return Ok(Loaded::Text(text));
        }

        let decoder = extension(path).and_then(|ext| self.decoders.get(&ext.to_ascii_lowercase()));
        match decoder {
            Some(decode) => decode(&text)
                .map(Loaded::Structured)
                .map_err(|message| LoadError::Parse {
                    path: path.to_string(),
                    message,
                }),
            None => Ok(Loaded::Text(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        pollster::block_on(future)
    }

    #[test]
    fn test_load_json() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.json"), r#"{"x": 1}"#).unwrap();

        let loader = FileSystemLoader::with_root(temp.path());
        let loaded = block_on(loader.load("a.json", ResponseType::Json)).unwrap();
        assert_eq!(
            loaded,
            Loaded::Structured(ConfigNode::from_json_str(r#"{"x": 1}"#).unwrap())
        );
    }

    #[test]
    fn test_load_yaml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.yaml"), "x: 1\ny: [a, b]\n").unwrap();

        let loader = FileSystemLoader::with_root(temp.path());
        let node = block_on(loader.load("/a.yaml", ResponseType::Json))
            .unwrap()
            .into_structured()
            .unwrap();
        assert_eq!(node.get("x").and_then(ConfigNode::as_f64), Some(1.0));
        assert_eq!(node.get("y").and_then(ConfigNode::as_sequence).map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_text_request_skips_decoding() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.json"), "{ not json").unwrap();

        let loader = FileSystemLoader::with_root(temp.path());
        let loaded = block_on(loader.load("a.json", ResponseType::Text)).unwrap();
        assert_eq!(loaded, Loaded::Text("{ not json".to_string()));
    }

    #[test]
    fn test_unknown_extension_is_text() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "hello").unwrap();

        let loader = FileSystemLoader::with_root(temp.path());
        let loaded = block_on(loader.load("notes.txt", ResponseType::Json)).unwrap();
        assert!(loaded.is_text());
    }

    #[test]
    fn test_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.json"), "{ not json").unwrap();

        let loader = FileSystemLoader::with_root(temp.path());
        let err = block_on(loader.load("bad.json", ResponseType::Json)).unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref path, .. } if path == "bad.json"));
    }

    #[test]
    fn test_not_found() {
        let temp = TempDir::new().unwrap();
        let loader = FileSystemLoader::with_root(temp.path());
        let err = block_on(loader.load("missing.json", ResponseType::Json)).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert_eq!(err.path(), "missing.json");
    }

    #[test]
    fn test_custom_decoder() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("list.csv"), "a,b,c").unwrap();

        let mut loader = FileSystemLoader::with_root(temp.path());
        loader.register_decoder("CSV", |text| {
            Ok(ConfigNode::Sequence(
                text.split(',').map(ConfigNode::from).collect(),
            ))
        });
        assert!(loader.has_decoder("csv"));

        let node = block_on(loader.load("list.csv", ResponseType::Json))
            .unwrap()
            .into_structured()
            .unwrap();
        assert_eq!(node.at(2).and_then(ConfigNode::as_str), Some("c"));
    }
}
