/*
 * expander.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Expansion of `repeat` and `table`, and evaluation of string leaves.

use crate::binding::{Binding, TableCoords};
use crate::error::{EngineError, Result};
use crate::evaluator::Evaluator;
use dok_config::{ConfigNode, Mapping, Scalar};
use dok_expr::{Bindings, Value};

/// Keys that never appear in expanded output.
pub const DIRECTIVE_KEYS: &[&str] = &["template", "templates", "repeat", "table", "IGNORE"];

const MAX_PREALLOCATED_CLONES: usize = 1024;

pub(crate) struct Expander<'a> {
    pub evaluator: &'a Evaluator,
    /// Runtime parameters, viewport and debug bindings shared by every call.
    pub context: &'a Bindings,
}

impl Expander<'_> {
    pub fn translate(&self, node: &ConfigNode, binding: Binding) -> Result<ConfigNode> {
        match node {
            ConfigNode::Sequence(items) => items
                .iter()
                .map(|item| self.translate(item, binding))
                .collect::<Result<Vec<_>>>()
                .map(ConfigNode::Sequence),
            ConfigNode::Mapping(mapping) => self.translate_mapping(node, mapping, binding),
            ConfigNode::Scalar(Scalar::String(text)) => {
                self.evaluator.evaluate_str(text, &self.bindings(binding))
            }
            other => Ok(other.clone()),
        }
    }

    fn translate_mapping(
        &self,
        node: &ConfigNode,
        mapping: &Mapping,
        binding: Binding,
    ) -> Result<ConfigNode> {
        if let Some(flag) = mapping.get("IGNORE") {
            if self.evaluate(flag, binding)?.is_truthy() {
                return Ok(ConfigNode::Null);
            }
        }

        if !binding.is_index_bound() {
            if let Some(repeat) = mapping.get("repeat") {
                let count = self.count(repeat, binding, "repeat")?;
                tracing::trace!(count, "Expanding repeat");
                return (0..count)
                    .map(|index| self.translate(node, binding.bind_index(index)))
                    .collect::<Result<Vec<_>>>()
                    .map(ConfigNode::Sequence);
            }
        }

        if !binding.is_coords_bound() {
            if let Some(table) = mapping.get("table") {
                let [rows, cols, dims] = self.table_shape(table, binding)?;
                let total = rows
                    .checked_mul(cols)
                    .and_then(|cells| cells.checked_mul(dims))
                    .ok_or_else(|| {
                        EngineError::misuse(format!(
                            "table of {rows} x {cols} x {dims} entries is too large"
                        ))
                    })?;
                tracing::trace!(rows, cols, dims, "Expanding table");
                let mut clones = Vec::with_capacity(total.min(MAX_PREALLOCATED_CLONES));
                for row in 0..rows {
                    for col in 0..cols {
                        for dim in 0..dims {
                            let coords = TableCoords::at(row, col, dim);
                            clones.push(self.translate(node, binding.bind_coords(coords))?);
                        }
                    }
                }
                return Ok(ConfigNode::Sequence(clones));
            }
        }

        let mut out = Mapping::with_capacity(mapping.len());
        for (key, value) in mapping {
            if DIRECTIVE_KEYS.contains(&key.as_str()) {
                continue;
            }
            let key = if key.contains('{') {
                field_name(self.evaluator.evaluate_str(key, &self.bindings(binding))?)?
            } else {
                key.clone()
            };
            out.insert(key, self.translate(value, binding)?);
        }
        Ok(ConfigNode::Mapping(out))
    }

    fn bindings(&self, binding: Binding) -> Bindings {
        let mut bindings = self.context.clone();
        for (name, value) in binding.variables() {
            bindings.insert(name.to_string(), Value::Number(value as f64));
        }
        bindings.insert("random".to_string(), Value::Number(rand::random::<f64>()));
        bindings
    }

    fn evaluate(&self, node: &ConfigNode, binding: Binding) -> Result<ConfigNode> {
        match node {
            ConfigNode::Scalar(Scalar::String(text)) => {
                self.evaluator.evaluate_str(text, &self.bindings(binding))
            }
            other => Ok(other.clone()),
        }
    }

    /// Evaluate a repeat or table count, which must be a non-negative integer.
    fn count(&self, node: &ConfigNode, binding: Binding, what: &str) -> Result<usize> {
        let value = self.evaluate(node, binding)?;
        match value.as_f64() {
            Some(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 => Ok(n as usize),
            _ => Err(EngineError::misuse(format!(
                "{} must be a non-negative integer, found {}",
                what,
                describe(&value)
            ))),
        }
    }

    /// `[rows, cols, dims]`, each defaulting to 1 when missing or null.
    fn table_shape(&self, table: &ConfigNode, binding: Binding) -> Result<[usize; 3]> {
        let Some(entries) = table.as_sequence() else {
            return Err(EngineError::misuse(format!(
                "table must be a sequence of up to three counts, found {}",
                table.type_name()
            )));
        };
        let mut shape = [1; 3];
        for (slot, entry) in shape.iter_mut().zip(entries) {
            if !entry.is_null() {
                *slot = self.count(entry, binding, "table entry")?;
            }
        }
        Ok(shape)
    }
}

fn field_name(node: ConfigNode) -> Result<String> {
    match node {
        ConfigNode::Scalar(scalar) => Ok(scalar.to_string()),
        ConfigNode::Null => Ok(String::new()),
        other => Err(EngineError::misuse(format!(
            "field name evaluated to a {}",
            other.type_name()
        ))),
    }
}

fn describe(node: &ConfigNode) -> String {
    match node {
        ConfigNode::Scalar(scalar) => format!("{} '{}'", node.type_name(), scalar),
        other => other.type_name().to_string(),
    }
}
