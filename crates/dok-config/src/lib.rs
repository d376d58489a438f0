/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Configuration tree model and deep merge for dok.
//!
//! Every stage of the dok pipeline (loading, template resolution, expansion)
//! passes the same [`ConfigNode`] tree around. This crate owns that type and
//! the single merge primitive used to layer templates underneath literal data.
//!
//! # Key Features
//!
//! - **Explicit shape**: a tagged union of null, scalars, sequences and mappings
//! - **Layered merge**: later layers win, nested mappings merge field-wise
//! - **Pollution guard**: `__proto__`, `constructor` and `prototype` keys are
//!   never merged
//! - **Format neutral**: `serde` implementations, plus JSON and YAML helpers
//!
//! # Example
//!
//! ```rust
//! use dok_config::{ConfigNode, merge};
//!
//! let defaults = ConfigNode::from_json_str(r#"{"size": {"w": 10, "h": 10}}"#).unwrap();
//! let literal = ConfigNode::from_json_str(r#"{"size": {"w": 20}}"#).unwrap();
//!
//! let merged = merge(defaults, literal);
//! assert_eq!(merged.get("size").and_then(|s| s.get("w")).and_then(|w| w.as_f64()), Some(20.0));
//! assert_eq!(merged.get("size").and_then(|s| s.get("h")).and_then(|h| h.as_f64()), Some(10.0));
//! ```

mod convert;
mod merge;
mod types;

pub use merge::{BLOCKED_KEYS, is_blocked_key, merge, merge_all};
pub use types::{ConfigError, ConfigNode, Mapping, Result, Scalar};
