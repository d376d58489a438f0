/*
 * convert.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion between configuration trees and expression values.

use dok_config::{ConfigNode, Mapping, Scalar};
use dok_expr::{Bindings, Value};

pub fn to_value(node: &ConfigNode) -> Value {
    match node {
        ConfigNode::Null => Value::Null,
        ConfigNode::Scalar(Scalar::String(s)) => Value::String(s.clone()),
        ConfigNode::Scalar(Scalar::Number(n)) => Value::Number(*n),
        ConfigNode::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
        ConfigNode::Sequence(items) => Value::Array(items.iter().map(to_value).collect()),
        ConfigNode::Mapping(entries) => Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_value(v)))
                .collect(),
        ),
    }
}

pub fn to_node(value: Value) -> ConfigNode {
    match value {
        Value::Null => ConfigNode::Null,
        Value::Bool(b) => ConfigNode::bool(b),
        Value::Number(n) => ConfigNode::number(n),
        Value::String(s) => ConfigNode::string(s),
        Value::Array(items) => ConfigNode::Sequence(items.into_iter().map(to_node).collect()),
        Value::Map(entries) => ConfigNode::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k, to_node(v)))
                .collect::<Mapping>(),
        ),
    }
}

/// Add every entry of `mapping` to `bindings`, replacing existing names.
pub fn extend_bindings(bindings: &mut Bindings, mapping: &Mapping) {
    bindings.extend(mapping.iter().map(|(k, v)| (k.clone(), to_value(v))));
}
