/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation of `{expr}` spans inside strings.

use crate::convert::to_node;
use crate::error::{EngineError, Result};
use crate::interpolate;
use dok_config::ConfigNode;
use dok_expr::{Bindings, ExprEnvironment, ExprResult, Program, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Evaluates strings against constants plus per-call bindings.
///
/// Compiled programs are cached by their exact source text for the lifetime
/// of the evaluator. The cache only grows.
#[derive(Debug)]
pub struct Evaluator {
    env: ExprEnvironment,
    constants: Bindings,
    cache: Mutex<HashMap<String, Arc<Program>>>,
}

impl Evaluator {
    pub fn new(constants: Bindings) -> Self {
        Self {
            env: ExprEnvironment::new(),
            constants,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Register a function visible to every later evaluation.
    pub fn import<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> ExprResult<Value> + Send + Sync + 'static,
    {
        self.env.import(name, function);
    }

    /// Number of distinct expression sources compiled so far.
    pub fn cache_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Evaluate a node. Only strings are evaluated; anything else is returned as is.
    pub fn evaluate(&self, node: &ConfigNode, extra: &Bindings) -> Result<ConfigNode> {
        match node.as_str() {
            Some(text) => self.evaluate_str(text, extra),
            None => Ok(node.clone()),
        }
    }

    /// Evaluate the spans of `text`.
    ///
    /// A string that is exactly one span yields the span's value with its own
    /// type. Otherwise each span is replaced by its string form (null renders
    /// as nothing), `{{text}}` is unescaped to `{text}` and the result is a
    /// string.
    pub fn evaluate_str(&self, text: &str, extra: &Bindings) -> Result<ConfigNode> {
        let mut bindings = self.constants.clone();
        bindings.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        if let Some(source) = interpolate::sole_expression(text) {
            return self.eval_span(source, &bindings).map(to_node);
        }

        interpolate::interpolate(text, |source| {
            Ok(match self.eval_span(source, &bindings)? {
                Value::Null => String::new(),
                value => value.to_string(),
            })
        })
        .map(ConfigNode::string)
    }

    fn eval_span(&self, source: &str, bindings: &Bindings) -> Result<Value> {
        let program = self.program(source)?;
        self.env
            .evaluate(&program, bindings)
            .map_err(|error| EngineError::Expression {
                source_text: source.to_string(),
                error,
            })
    }

    fn program(&self, source: &str) -> Result<Arc<Program>> {
        if let Some(program) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
        {
            return Ok(Arc::clone(program));
        }

        let program = self
            .env
            .compile(source)
            .map_err(|error| EngineError::Expression {
                source_text: source.to_string(),
                error,
            })?;
        tracing::trace!(source, "Compiled expression");

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(
            cache
                .entry(source.to_string())
                .or_insert_with(|| Arc::new(program)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, f64)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::Number(*v)))
            .collect()
    }

    #[test]
    fn test_sole_expression_keeps_type() {
        let evaluator = Evaluator::new(Bindings::new());
        let result = evaluator
            .evaluate_str("{a+b}", &bindings(&[("a", 5.0), ("b", 4.0)]))
            .unwrap();
        assert_eq!(result, ConfigNode::number(9.0));
    }

    #[test]
    fn test_interpolation_with_literal_braces() {
        let evaluator = Evaluator::new(Bindings::new());
        let result = evaluator
            .evaluate_str("{{a+b}} = {a+b}", &bindings(&[("a", 5.0), ("b", 4.0)]))
            .unwrap();
        assert_eq!(result, ConfigNode::string("{a+b} = 9"));
    }

    #[test]
    fn test_non_string_passes_through() {
        let evaluator = Evaluator::new(Bindings::new());
        let node = ConfigNode::bool(true);
        assert_eq!(evaluator.evaluate(&node, &Bindings::new()).unwrap(), node);
    }

    #[test]
    fn test_extra_bindings_override_constants() {
        let evaluator = Evaluator::new(bindings(&[("speed", 1.0), ("scale", 10.0)]));
        let result = evaluator
            .evaluate_str("{speed * scale}", &bindings(&[("speed", 3.0)]))
            .unwrap();
        assert_eq!(result, ConfigNode::number(30.0));
    }

    #[test]
    fn test_cache_is_keyed_by_source() {
        let evaluator = Evaluator::new(Bindings::new());
        for i in 0..4 {
            let extra = bindings(&[("index", i as f64)]);
            evaluator.evaluate_str("{index * 2}", &extra).unwrap();
            evaluator.evaluate_str("item-{index}", &extra).unwrap();
        }
        assert_eq!(evaluator.cache_len(), 2);

        evaluator.evaluate_str("{index + 1}", &bindings(&[("index", 0.0)])).unwrap();
        assert_eq!(evaluator.cache_len(), 3);
    }

    #[test]
    fn test_plain_string_compiles_nothing() {
        let evaluator = Evaluator::new(Bindings::new());
        let result = evaluator.evaluate_str("plain {", &Bindings::new()).unwrap();
        assert_eq!(result, ConfigNode::string("plain {"));
        assert_eq!(evaluator.cache_len(), 0);
    }

    #[test]
    fn test_doubled_braces_unescape_without_spans() {
        let evaluator = Evaluator::new(Bindings::new());
        let result = evaluator.evaluate_str("{{a+b}}", &Bindings::new()).unwrap();
        assert_eq!(result, ConfigNode::string("{a+b}"));
        assert_eq!(evaluator.cache_len(), 0);
    }

    #[test]
    fn test_null_interpolates_as_empty() {
        let evaluator = Evaluator::new(Bindings::new());
        let result = evaluator.evaluate_str("[{null}]", &Bindings::new()).unwrap();
        assert_eq!(result, ConfigNode::string("[]"));
    }

    #[test]
    fn test_expression_error_carries_source() {
        let evaluator = Evaluator::new(Bindings::new());
        let err = evaluator
            .evaluate_str("size: {missing * 2}", &Bindings::new())
            .unwrap_err();
        match err {
            EngineError::Expression { source_text, .. } => assert_eq!(source_text, "missing * 2"),
            other => panic!("expected expression error, got {other:?}"),
        }
    }

    #[test]
    fn test_imported_function() {
        let mut evaluator = Evaluator::new(Bindings::new());
        evaluator.import("half", |args: &[Value]| {
            Ok(Value::Number(args[0].to_number()? / 2.0))
        });
        let result = evaluator.evaluate_str("{half(9)}", &Bindings::new()).unwrap();
        assert_eq!(result, ConfigNode::number(4.5));
    }
}
