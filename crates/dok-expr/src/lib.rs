/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A small arithmetic expression language.
//!
//! Expressions are compiled once into a [`Program`] and evaluated any number
//! of times against a set of variable [`Bindings`]:
//!
//! ```
//! use dok_expr::{Bindings, ExprEnvironment, Value};
//!
//! let env = ExprEnvironment::new();
//! let program = env.compile("index * 2 + 1").unwrap();
//!
//! let mut bindings = Bindings::new();
//! bindings.insert("index".to_string(), Value::Number(3.0));
//! assert_eq!(env.evaluate(&program, &bindings).unwrap(), Value::Number(7.0));
//! ```
//!
//! Host code can extend the language with [`ExprEnvironment::import`].

mod ast;
mod env;
mod error;
mod functions;
mod lexer;
mod parser;
mod value;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use env::{ExprEnvironment, Program};
pub use error::{ExprError, ExprResult};
pub use functions::{FunctionTable, NativeFunction};
pub use parser::parse;
pub use value::{Bindings, Value};
