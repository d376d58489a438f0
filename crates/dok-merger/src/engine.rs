/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The `process` entry point tying resolution and expansion together.

use crate::binding::Binding;
use crate::convert::extend_bindings;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::expander::Expander;
use crate::options::EngineOptions;
use crate::params::RuntimeParams;
use crate::resolver::Resolver;
use dok_config::ConfigNode;
use dok_expr::{Bindings, ExprResult, Value};
use dok_loader::Loader;
use std::fmt;
use std::sync::Arc;

/// Expands configuration trees.
///
/// A `ConfigMerger` owns the loader, the options and an [`Evaluator`] whose
/// compiled-expression cache persists across calls.
///
/// ```no_run
/// use dok_merger::{ConfigMerger, EngineOptions, RuntimeParams};
/// use dok_config::ConfigNode;
/// use dok_loader::FileSystemLoader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let merger = ConfigMerger::new(FileSystemLoader::new(), EngineOptions::default());
/// let tree = ConfigNode::from_json_str(r#"{"template": "button", "width": "{viewportWidth / 4}"}"#)?;
/// let params = RuntimeParams::new().with_viewport(800.0, 600.0);
/// let result = pollster::block_on(merger.process(tree, "ui/main.json", &params))?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigMerger {
    loader: Arc<dyn Loader>,
    evaluator: Evaluator,
    options: EngineOptions,
}

impl fmt::Debug for ConfigMerger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigMerger")
            .field("options", &self.options)
            .field("cached_expressions", &self.evaluator.cache_len())
            .finish_non_exhaustive()
    }
}

impl ConfigMerger {
    pub fn new(loader: impl Loader + 'static, options: EngineOptions) -> Self {
        Self::with_loader(Arc::new(loader), options)
    }

    /// Create an engine sharing an existing loader.
    pub fn with_loader(loader: Arc<dyn Loader>, options: EngineOptions) -> Self {
        let mut constants = Bindings::new();
        extend_bindings(&mut constants, &options.constants);
        Self {
            loader,
            evaluator: Evaluator::new(constants),
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Register a function callable from every later expression.
    pub fn import_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> ExprResult<Value> + Send + Sync + 'static,
    {
        self.evaluator.import(name, function);
    }

    /// Resolve templates and references, then expand and evaluate.
    ///
    /// `base_path` anchors relative `template` and `reference` paths. Any
    /// failure aborts the whole call.
    pub async fn process(
        &self,
        tree: ConfigNode,
        base_path: &str,
        params: &RuntimeParams,
    ) -> Result<ConfigNode> {
        tracing::debug!(base_path, "Processing tree");
        let resolved = self.resolve(tree, base_path, params).await?;
        self.translate(&resolved, params)
    }

    /// Like [`ConfigMerger::process`], taking parameters as a tree such as
    /// `{"viewportSize": [800, 600]}`. Anything but a mapping is rejected.
    pub async fn process_node(
        &self,
        tree: ConfigNode,
        base_path: &str,
        params: &ConfigNode,
    ) -> Result<ConfigNode> {
        let params = RuntimeParams::from_node(params)?;
        self.process(tree, base_path, &params).await
    }

    /// Resolve `template`, `templates`, `reference` and `params` only.
    pub async fn resolve(
        &self,
        tree: ConfigNode,
        base_path: &str,
        params: &RuntimeParams,
    ) -> Result<ConfigNode> {
        let mut bindings = self.context(params);
        for (name, value) in Binding::unbound().variables() {
            bindings.insert(name.to_string(), Value::Number(value as f64));
        }
        bindings.insert("random".to_string(), Value::Number(rand::random::<f64>()));

        let resolver = Resolver {
            loader: self.loader.as_ref(),
            evaluator: &self.evaluator,
            options: &self.options,
            bindings: &bindings,
        };
        resolver.resolve(tree, base_path.to_string(), 0).await
    }

    /// Expand `repeat`/`table`, drop ignored nodes and evaluate every string.
    pub fn translate(&self, tree: &ConfigNode, params: &RuntimeParams) -> Result<ConfigNode> {
        let context = self.context(params);
        let expander = Expander {
            evaluator: &self.evaluator,
            context: &context,
        };
        expander.translate(tree, Binding::unbound())
    }

    /// Pass-through parameters, then the viewport and debug bindings.
    fn context(&self, params: &RuntimeParams) -> Bindings {
        let mut bindings = Bindings::new();
        extend_bindings(&mut bindings, &params.extra);
        bindings.insert(
            "viewportWidth".to_string(),
            Value::Number(params.viewport_width()),
        );
        bindings.insert(
            "viewportHeight".to_string(),
            Value::Number(params.viewport_height()),
        );
        bindings.insert(
            "isDebug".to_string(),
            Value::Number(if self.options.debug { 1.0 } else { 0.0 }),
        );
        bindings
    }
}
