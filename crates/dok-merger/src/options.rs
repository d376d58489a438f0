/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Engine configuration.

use dok_config::{ConfigNode, Mapping};
use serde::Deserialize;

/// Options fixed for the lifetime of a [`crate::ConfigMerger`].
///
/// Deserializes from JSON or YAML; missing fields take their defaults:
///
/// ```yaml
/// debug: true
/// constants:
///   tileSize: 32
/// template_extension: .json
/// max_depth: 256
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Exposed to expressions as `isDebug` (1 or 0).
    pub debug: bool,

    /// Bindings visible to every expression, overridden by runtime parameters.
    pub constants: Mapping,

    /// Suffix appended to `template`/`templates` paths (default: `.json`).
    ///
    /// A path that already ends with the suffix is used as written, so
    /// `template: "button.json"` loads `button.json`, not `button.json.json`.
    /// An empty suffix disables the rewrite.
    pub template_extension: String,

    /// Maximum resolution depth (default: 256).
    ///
    /// Template or reference cycles fail with
    /// [`crate::EngineError::NestingTooDeep`] once this depth is passed.
    pub max_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            debug: false,
            constants: Mapping::new(),
            template_extension: ".json".to_string(),
            max_depth: 256,
        }
    }
}

impl EngineOptions {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_constant(mut self, name: impl Into<String>, value: impl Into<ConfigNode>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert!(!options.debug);
        assert_eq!(options.template_extension, ".json");
        assert_eq!(options.max_depth, 256);
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let options: EngineOptions =
            serde_yaml::from_str("debug: true\nconstants:\n  tileSize: 32\n").unwrap();
        assert!(options.debug);
        assert_eq!(options.max_depth, 256);
        assert_eq!(
            options.constants.get("tileSize").and_then(ConfigNode::as_f64),
            Some(32.0)
        );
    }

    #[test]
    fn test_deserialize_json() {
        let options: EngineOptions =
            serde_json::from_str(r#"{"template_extension": ".yaml", "max_depth": 8}"#).unwrap();
        assert_eq!(options.template_extension, ".yaml");
        assert_eq!(options.max_depth, 8);
        assert!(options.constants.is_empty());
    }
}
