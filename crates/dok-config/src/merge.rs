/*
 * merge.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Structural deep merge.
//!
//! [`merge`] is the only combining primitive in dok: templates are layered
//! under a node's literal fields by folding it over the layers in order.
//!
//! # Semantics
//!
//! - A scalar or null `incoming` replaces `target` outright
//! - A mapping `incoming` merges field-wise into a mapping `target`
//! - A sequence `incoming` merges index-wise into a sequence `target`,
//!   extending it when `incoming` is longer
//! - When shapes disagree, `target` is reset to an empty container of
//!   `incoming`'s shape before merging
//! - Keys in [`BLOCKED_KEYS`] are dropped silently

use crate::types::{ConfigNode, Mapping};

/// Keys that are never merged.
pub const BLOCKED_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

/// Check if a mapping key is excluded from merging.
pub fn is_blocked_key(key: &str) -> bool {
    BLOCKED_KEYS.contains(&key)
}

/// Merge `incoming` into `target`, returning the merged tree.
///
/// Values from `incoming` win over values in `target`.
pub fn merge(target: ConfigNode, incoming: ConfigNode) -> ConfigNode {
    match incoming {
        ConfigNode::Mapping(fields) => {
            let mut map = match target {
                ConfigNode::Mapping(map) => map,
                _ => Mapping::new(),
            };
            for (key, value) in fields {
                if is_blocked_key(&key) {
                    continue;
                }
                let slot = map.entry(key).or_default();
                let existing = std::mem::take(slot);
                *slot = merge(existing, value);
            }
            ConfigNode::Mapping(map)
        }
        ConfigNode::Sequence(items) => {
            let mut list = match target {
                ConfigNode::Sequence(list) => list,
                _ => Vec::new(),
            };
            for (i, value) in items.into_iter().enumerate() {
                if i < list.len() {
                    let existing = std::mem::take(&mut list[i]);
                    list[i] = merge(existing, value);
                } else {
                    list.push(merge(ConfigNode::Null, value));
                }
            }
            ConfigNode::Sequence(list)
        }
        scalar => scalar,
    }
}

/// Merge an ordered list of layers (first = lowest priority).
pub fn merge_all(layers: impl IntoIterator<Item = ConfigNode>) -> ConfigNode {
    layers.into_iter().fold(ConfigNode::Null, merge)
}
