/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Resolution of `template`, `templates`, `reference` and `params`.
//!
//! The output still carries `repeat`, `table`, `IGNORE` and expression
//! strings; those are handled by [`crate::expander`].

use crate::error::{EngineError, Result};
use crate::evaluator::Evaluator;
use crate::options::EngineOptions;
use dok_config::{ConfigNode, Mapping, Scalar, merge};
use dok_expr::Bindings;
use dok_loader::{Loaded, Loader, ResponseType, resolve_path, with_suffix};
use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use std::collections::HashSet;

pub(crate) struct Resolver<'a> {
    pub loader: &'a dyn Loader,
    pub evaluator: &'a Evaluator,
    pub options: &'a EngineOptions,
    /// Bindings for expression-valued `reference` paths.
    pub bindings: &'a Bindings,
}

impl Resolver<'_> {
    /// Resolve `node`, anchoring relative paths at `base_path`.
    pub fn resolve(
        &self,
        node: ConfigNode,
        base_path: String,
        depth: usize,
    ) -> BoxFuture<'_, Result<ConfigNode>> {
        async move {
            if depth > self.options.max_depth {
                return Err(EngineError::NestingTooDeep {
                    max_depth: self.options.max_depth,
                    path: base_path,
                });
            }

            match node {
                ConfigNode::Mapping(mapping) if mapping.contains_key("reference") => {
                    self.resolve_reference(mapping, &base_path, depth).await
                }
                ConfigNode::Sequence(items) => {
                    let resolved = try_join_all(
                        items
                            .into_iter()
                            .map(|item| self.resolve(item, base_path.clone(), depth + 1)),
                    )
                    .await?;
                    Ok(ConfigNode::Sequence(resolved))
                }
                ConfigNode::Mapping(mapping) => {
                    self.resolve_mapping(mapping, base_path, depth).await
                }
                other => Ok(other),
            }
        }
        .boxed()
    }

    async fn resolve_reference(
        &self,
        mapping: Mapping,
        base_path: &str,
        depth: usize,
    ) -> Result<ConfigNode> {
        let reference = mapping.get("reference").cloned().unwrap_or_default();
        let target = match self.evaluator.evaluate(&reference, self.bindings)? {
            ConfigNode::Scalar(Scalar::String(target)) => target,
            other => {
                return Err(EngineError::misuse(format!(
                    "reference must be a path string, found {}",
                    other.type_name()
                )));
            }
        };

        let path = resolve_path(&target, base_path);
        tracing::debug!(path = %path, "Loading reference");

        match self.loader.load(&path, ResponseType::Json).await? {
            Loaded::Text(text) => Ok(ConfigNode::string(text)),
            Loaded::Structured(content) => {
                let content = match mapping.get("params") {
                    None | Some(ConfigNode::Null) => content,
                    Some(ConfigNode::Mapping(params)) => substitute(content, params),
                    Some(other) => {
                        return Err(EngineError::misuse(format!(
                            "params must be a mapping, found {}",
                            other.type_name()
                        )));
                    }
                };
                self.resolve(content, path, depth + 1).await
            }
        }
    }

    async fn resolve_mapping(
        &self,
        mut mapping: Mapping,
        base_path: String,
        depth: usize,
    ) -> Result<ConfigNode> {
        let paths = template_paths(&mapping)?;
        mapping.shift_remove("templates");
        mapping.shift_remove("template");

        let templates = try_join_all(
            paths
                .iter()
                .map(|path| self.load_template(path, &base_path, depth)),
        )
        .await?;

        let own_keys: HashSet<String> = mapping.keys().cloned().collect();
        let mut resolved = ConfigNode::empty_mapping();
        for template in templates {
            resolved = merge(resolved, template);
        }
        let entries = match merge(resolved, ConfigNode::Mapping(mapping)) {
            ConfigNode::Mapping(entries) => entries,
            other => return Ok(other),
        };

        // Fields only a template supplies were resolved with their template.
        // Reference-bearing fields resolve before their siblings.
        let mut slots: Vec<Option<(String, ConfigNode)>> = vec![None; entries.len()];
        let mut first = Vec::new();
        let mut second = Vec::new();
        for (position, (key, value)) in entries.into_iter().enumerate() {
            if !own_keys.contains(&key) {
                slots[position] = Some((key, value));
            } else if carries_reference(&value) {
                first.push((position, (key, value)));
            } else {
                second.push((position, (key, value)));
            }
        }

        for group in [first, second] {
            let resolved = try_join_all(group.into_iter().map(|(position, (key, value))| {
                let base_path = base_path.clone();
                async move {
                    let value = self.resolve(value, base_path, depth + 1).await?;
                    Ok::<_, EngineError>((position, key, value))
                }
            }))
            .await?;
            for (position, key, value) in resolved {
                slots[position] = Some((key, value));
            }
        }

        Ok(ConfigNode::Mapping(slots.into_iter().flatten().collect()))
    }

    /// Load one template and resolve it against its own path.
    async fn load_template(&self, name: &str, base_path: &str, depth: usize) -> Result<ConfigNode> {
        let path = resolve_path(
            &with_suffix(name, &self.options.template_extension),
            base_path,
        );
        tracing::debug!(path = %path, "Loading template");

        match self.loader.load(&path, ResponseType::Json).await? {
            Loaded::Structured(template) => self.resolve(template, path, depth + 1).await,
            Loaded::Text(_) => Err(EngineError::TemplateNotStructured { path }),
        }
    }
}

fn carries_reference(node: &ConfigNode) -> bool {
    node.as_mapping()
        .is_some_and(|mapping| mapping.contains_key("reference"))
}

/// Template paths in merge order: `templates` as listed, then `template`.
fn template_paths(mapping: &Mapping) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    match mapping.get("templates") {
        None | Some(ConfigNode::Null) => {}
        Some(ConfigNode::Sequence(items)) => {
            for item in items {
                paths.push(template_name(item)?);
            }
        }
        Some(other) => {
            return Err(EngineError::misuse(format!(
                "templates must be a sequence of paths, found {}",
                other.type_name()
            )));
        }
    }
    match mapping.get("template") {
        None | Some(ConfigNode::Null) => {}
        Some(item) => paths.push(template_name(item)?),
    }
    Ok(paths)
}

fn template_name(node: &ConfigNode) -> Result<String> {
    node.as_str().map(str::to_string).ok_or_else(|| {
        EngineError::misuse(format!(
            "template path must be a string, found {}",
            node.type_name()
        ))
    })
}

/// Replace every string leaf that names a parameter with that parameter's value.
fn substitute(node: ConfigNode, params: &Mapping) -> ConfigNode {
    match node {
        ConfigNode::Scalar(Scalar::String(text)) => match params.get(text.as_str()) {
            Some(value) => value.clone(),
            None => ConfigNode::Scalar(Scalar::String(text)),
        },
        ConfigNode::Sequence(items) => ConfigNode::Sequence(
            items
                .into_iter()
                .map(|item| substitute(item, params))
                .collect(),
        ),
        ConfigNode::Mapping(entries) => ConfigNode::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (key, substitute(value, params)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(text: &str) -> ConfigNode {
        ConfigNode::from_json_str(text).unwrap()
    }

    #[test]
    fn test_substitute_replaces_matching_leaves() {
        let params = json(r#"{"$color": "red", "$size": [1, 2]}"#);
        let content = json(r#"{"fill": "$color", "dims": "$size", "label": "$other", "n": 3}"#);
        let result = substitute(content, params.as_mapping().unwrap());
        assert_eq!(
            result,
            json(r#"{"fill": "red", "dims": [1, 2], "label": "$other", "n": 3}"#)
        );
    }

    #[test]
    fn test_substitute_leaves_keys_alone() {
        let params = json(r#"{"key": "value"}"#);
        let result = substitute(json(r#"{"key": ["key"]}"#), params.as_mapping().unwrap());
        assert_eq!(result, json(r#"{"key": ["value"]}"#));
    }

    #[test]
    fn test_template_paths_order() {
        let node = json(r#"{"template": "c", "templates": ["a", "b"]}"#);
        assert_eq!(
            template_paths(node.as_mapping().unwrap()).unwrap(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_template_paths_reject_non_strings() {
        let node = json(r#"{"templates": [1]}"#);
        assert!(matches!(
            template_paths(node.as_mapping().unwrap()),
            Err(EngineError::StructuralMisuse(_))
        ));
        let node = json(r#"{"templates": "a"}"#);
        assert!(template_paths(node.as_mapping().unwrap()).is_err());
    }
}
