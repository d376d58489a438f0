/*
 * params.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Per-call runtime parameters.

use crate::error::{EngineError, Result};
use dok_config::{ConfigNode, Mapping};

/// Parameters for one `process` call.
///
/// `viewportSize` is split into the `viewportWidth` and `viewportHeight`
/// bindings; every other key passes through as a binding of the same name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeParams {
    pub viewport_size: Option<[f64; 2]>,
    pub extra: Mapping,
}

impl RuntimeParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_size = Some([width, height]);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ConfigNode>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Build parameters from a mapping such as `{"viewportSize": [800, 600]}`.
    pub fn from_node(node: &ConfigNode) -> Result<Self> {
        let Some(mapping) = node.as_mapping() else {
            return Err(EngineError::misuse(format!(
                "Runtime parameters are required and must be a mapping, found {}",
                node.type_name()
            )));
        };

        let mut params = RuntimeParams::new();
        for (key, value) in mapping {
            if key == "viewportSize" {
                params.viewport_size = Some(viewport(value)?);
            } else {
                params.extra.insert(key.clone(), value.clone());
            }
        }
        Ok(params)
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_size.map_or(0.0, |[w, _]| w)
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_size.map_or(0.0, |[_, h]| h)
    }
}

fn viewport(value: &ConfigNode) -> Result<[f64; 2]> {
    match value.as_sequence() {
        Some([w, h]) => match (w.as_f64(), h.as_f64()) {
            (Some(w), Some(h)) => Ok([w, h]),
            _ => Err(EngineError::misuse("viewportSize entries must be numbers")),
        },
        _ => Err(EngineError::misuse(
            "viewportSize must be a sequence of two numbers",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_node() {
        let node =
            ConfigNode::from_json_str(r#"{"viewportSize": [100, 200], "level": 3}"#).unwrap();
        let params = RuntimeParams::from_node(&node).unwrap();
        assert_eq!(params.viewport_size, Some([100.0, 200.0]));
        assert_eq!(params.viewport_width(), 100.0);
        assert_eq!(params.extra.get("level"), Some(&ConfigNode::number(3.0)));
        assert!(!params.extra.contains_key("viewportSize"));
    }

    #[test]
    fn test_missing_params_are_misuse() {
        assert!(matches!(
            RuntimeParams::from_node(&ConfigNode::Null),
            Err(EngineError::StructuralMisuse(_))
        ));
    }

    #[test]
    fn test_malformed_viewport() {
        let node = ConfigNode::from_json_str(r#"{"viewportSize": [100]}"#).unwrap();
        assert!(matches!(
            RuntimeParams::from_node(&node),
            Err(EngineError::StructuralMisuse(_))
        ));
        let node = ConfigNode::from_json_str(r#"{"viewportSize": ["a", 1]}"#).unwrap();
        assert!(RuntimeParams::from_node(&node).is_err());
    }

    #[test]
    fn test_missing_viewport_defaults_to_zero() {
        let params = RuntimeParams::from_node(&ConfigNode::empty_mapping()).unwrap();
        assert_eq!(params.viewport_height(), 0.0);
    }
}
