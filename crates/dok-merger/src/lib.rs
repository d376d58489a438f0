/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Declarative configuration expansion.
//!
//! A tree goes through two phases:
//!
//! 1. **Resolve**: `template`/`templates` are loaded and merged beneath the
//!    node's own fields, and `reference` nodes are replaced by the content
//!    they point at (with `params` substituted).
//! 2. **Expand**: `repeat` and `table` fan a node out into bound clones,
//!    `IGNORE` drops nodes, and every `{expr}` span in keys and string values
//!    is evaluated.
//!
//! ```
//! use dok_config::ConfigNode;
//! use dok_loader::NullLoader;
//! use dok_merger::{ConfigMerger, EngineOptions, RuntimeParams};
//!
//! let merger = ConfigMerger::new(NullLoader, EngineOptions::default());
//! let tree = ConfigNode::from_json_str(r#"{"repeat": 3, "x": "{index * 10}"}"#).unwrap();
//! let result = pollster::block_on(merger.process(tree, "", &RuntimeParams::new())).unwrap();
//! assert_eq!(result.at(2).and_then(|n| n.get("x")), Some(&ConfigNode::number(20.0)));
//! ```

mod binding;
mod convert;
mod engine;
mod error;
mod evaluator;
mod expander;
pub mod interpolate;
mod options;
mod params;
mod resolver;

pub use binding::{Binding, BindingState, TableCoords};
pub use convert::{to_node, to_value};
pub use engine::ConfigMerger;
pub use error::{EngineError, Result};
pub use evaluator::Evaluator;
pub use expander::DIRECTIVE_KEYS;
pub use options::EngineOptions;
pub use params::RuntimeParams;
