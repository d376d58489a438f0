/*
 * env.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compilation and evaluation of expressions.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{ExprError, ExprResult};
use crate::functions::{FunctionTable, NativeFunction, floored_mod};
use crate::parser::parse;
use crate::value::{Bindings, Value};
use std::sync::Arc;

/// A compiled expression, ready to be evaluated against any bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    source: String,
    expr: Expr,
}

impl Program {
    /// The source text this program was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

/// An expression environment: a function table plus compile/evaluate entry points.
///
/// Functions imported with [`ExprEnvironment::import`] are visible to every
/// subsequent evaluation, including evaluations of programs compiled earlier.
#[derive(Debug, Clone, Default)]
pub struct ExprEnvironment {
    functions: FunctionTable,
}

impl ExprEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named function.
    pub fn import<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> ExprResult<Value> + Send + Sync + 'static,
    {
        let function: NativeFunction = Arc::new(function);
        self.functions.insert(name, function);
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    /// Compile source text into a reusable program.
    pub fn compile(&self, source: &str) -> ExprResult<Program> {
        Ok(Program {
            source: source.to_string(),
            expr: parse(source)?,
        })
    }

    /// Evaluate a compiled program against a set of bindings.
    pub fn evaluate(&self, program: &Program, bindings: &Bindings) -> ExprResult<Value> {
        Scope {
            bindings,
            functions: &self.functions,
        }
        .eval(&program.expr)
    }

    /// Compile and evaluate in one step.
    pub fn evaluate_str(&self, source: &str, bindings: &Bindings) -> ExprResult<Value> {
        let program = self.compile(source)?;
        self.evaluate(&program, bindings)
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "PI" => Some(std::f64::consts::PI),
        "e" | "E" => Some(std::f64::consts::E),
        "tau" => Some(std::f64::consts::TAU),
        "Infinity" => Some(f64::INFINITY),
        "NaN" => Some(f64::NAN),
        _ => None,
    }
}

struct Scope<'a> {
    bindings: &'a Bindings,
    functions: &'a FunctionTable,
}

impl Scope<'_> {
    fn eval(&self, expr: &Expr) -> ExprResult<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Array(items) => items
                .iter()
                .map(|item| self.eval(item))
                .collect::<ExprResult<Vec<_>>>()
                .map(Value::Array),
            Expr::Variable(name) => self.lookup(name),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match op {
                    UnaryOp::Negate => Ok(Value::Number(-value.to_number()?)),
                    UnaryOp::Plus => Ok(Value::Number(value.to_number()?)),
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                }
            }
            Expr::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<ExprResult<Vec<_>>>()?;
                self.functions.call(name, &args)
            }
            Expr::Index { target, index } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                index_value(target, &index)
            }
            Expr::Member { target, field } => match self.eval(target)? {
                Value::Map(mut entries) => entries.swap_remove(field).ok_or_else(|| {
                    ExprError::type_error(format!("Object has no field '{}'", field))
                }),
                other => Err(ExprError::type_error(format!(
                    "Cannot read field '{}' of {}",
                    field,
                    other.type_name()
                ))),
            },
        }
    }

    fn lookup(&self, name: &str) -> ExprResult<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Ok(value.clone());
        }
        constant(name)
            .map(Value::Number)
            .ok_or_else(|| ExprError::UnknownVariable {
                name: name.to_string(),
            })
    }

    fn binary(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> ExprResult<Value> {
        match op {
            BinaryOp::And => {
                let left = self.eval(lhs)?;
                if !left.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval(rhs)?.is_truthy()))
            }
            BinaryOp::Or => {
                let left = self.eval(lhs)?;
                if left.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval(rhs)?.is_truthy()))
            }
            _ => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                apply_binary(op, &left, &right)
            }
        }
    }
}

fn apply_binary(op: BinaryOp, left: &Value, right: &Value) -> ExprResult<Value> {
    if let (BinaryOp::Add, Value::String(a), Value::String(b)) = (op, left, right) {
        return Ok(Value::String(format!("{}{}", a, b)));
    }

    match op {
        BinaryOp::Equal => return Ok(Value::Bool(values_equal(left, right))),
        BinaryOp::NotEqual => return Ok(Value::Bool(!values_equal(left, right))),
        BinaryOp::Xor => return Ok(Value::Bool(left.is_truthy() != right.is_truthy())),
        _ => {}
    }

    if let (Value::String(a), Value::String(b)) = (left, right) {
        let ordering = a.cmp(b);
        let result = match op {
            BinaryOp::Less => Some(ordering.is_lt()),
            BinaryOp::LessEqual => Some(ordering.is_le()),
            BinaryOp::Greater => Some(ordering.is_gt()),
            BinaryOp::GreaterEqual => Some(ordering.is_ge()),
            _ => None,
        };
        if let Some(result) = result {
            return Ok(Value::Bool(result));
        }
    }

    let a = left.to_number().map_err(|_| operand_error(op, left, right))?;
    let b = right.to_number().map_err(|_| operand_error(op, left, right))?;
    let value = match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Subtract => Value::Number(a - b),
        BinaryOp::Multiply => Value::Number(a * b),
        BinaryOp::Divide => Value::Number(a / b),
        BinaryOp::Modulo => Value::Number(floored_mod(a, b)),
        BinaryOp::Power => Value::Number(a.powf(b)),
        BinaryOp::Less => Value::Bool(a < b),
        BinaryOp::LessEqual => Value::Bool(a <= b),
        BinaryOp::Greater => Value::Bool(a > b),
        BinaryOp::GreaterEqual => Value::Bool(a >= b),
        BinaryOp::Equal
        | BinaryOp::NotEqual
        | BinaryOp::And
        | BinaryOp::Or
        | BinaryOp::Xor => unreachable!("handled above"),
    };
    Ok(value)
}

fn operand_error(op: BinaryOp, left: &Value, right: &Value) -> ExprError {
    ExprError::type_error(format!(
        "Unexpected operands for '{}': {} and {}",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Map(a), Value::Map(b)) => a == b,
        (Value::Null, Value::Null) => true,
        _ => match (left.to_number(), right.to_number()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        },
    }
}

/// Index with a 1-based position (arrays, strings) or a key (objects).
fn index_value(target: Value, index: &Value) -> ExprResult<Value> {
    match (target, index) {
        (Value::Map(mut entries), Value::String(key)) => entries
            .swap_remove(key)
            .ok_or_else(|| ExprError::type_error(format!("Object has no field '{}'", key))),
        (Value::Array(items), index) => {
            let position = one_based(index, items.len())?;
            Ok(items.into_iter().nth(position).unwrap_or_default())
        }
        (Value::String(s), index) => {
            let chars: Vec<char> = s.chars().collect();
            let position = one_based(index, chars.len())?;
            Ok(Value::String(chars[position].to_string()))
        }
        (other, index) => Err(ExprError::type_error(format!(
            "Cannot index {} with {}",
            other.type_name(),
            index.type_name()
        ))),
    }
}

fn one_based(index: &Value, len: usize) -> ExprResult<usize> {
    let n = index.to_number()?;
    if n.fract() != 0.0 || n < 1.0 || n > len as f64 {
        return Err(ExprError::type_error(format!(
            "Index {} out of range [1, {}]",
            n, len
        )));
    }
    Ok(n as usize - 1)
}
