/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Loading of templates and reference targets.
//!
//! The engine never touches files itself. It resolves each `template` or
//! `reference` path against the including file with [`resolve_path`] and
//! hands the result to a [`Loader`]:
//!
//! - [`FileSystemLoader`]: local files, decoded by extension (JSON, YAML, or
//!   anything registered with [`FileSystemLoader::register_decoder`])
//! - [`MemoryLoader`]: an in-memory map, for tests and embedded content
//! - [`NullLoader`]: finds nothing

mod error;
mod memory;
mod native;
mod path;
mod traits;

pub use error::{LoadError, LoadResult};
pub use memory::MemoryLoader;
pub use native::{Decoder, FileSystemLoader};
pub use path::{extension, resolve_path, with_suffix};
pub use traits::{Loaded, Loader, NullLoader, ResponseType};
