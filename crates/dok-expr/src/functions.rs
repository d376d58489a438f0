/*
 * functions.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Built-in and host-registered functions.

use crate::error::{ExprError, ExprResult};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A function callable from expressions.
pub type NativeFunction = Arc<dyn Fn(&[Value]) -> ExprResult<Value> + Send + Sync>;

/// Named functions available to an environment.
///
/// Lookups check host-registered functions first, so an import shadows a
/// built-in of the same name.
#[derive(Clone, Default)]
pub struct FunctionTable {
    imported: HashMap<String, NativeFunction>,
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.imported.keys().collect();
        names.sort();
        f.debug_struct("FunctionTable")
            .field("imported", &names)
            .finish()
    }
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host function.
    pub fn insert(&mut self, name: impl Into<String>, function: NativeFunction) {
        self.imported.insert(name.into(), function);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.imported.contains_key(name) || builtin(name).is_some()
    }

    /// Call a function by name.
    pub fn call(&self, name: &str, args: &[Value]) -> ExprResult<Value> {
        if let Some(function) = self.imported.get(name) {
            return function(args);
        }
        match builtin(name) {
            Some(function) => function(args),
            None => Err(ExprError::UnknownFunction {
                name: name.to_string(),
            }),
        }
    }
}

type Builtin = fn(&[Value]) -> ExprResult<Value>;

fn builtin(name: &str) -> Option<Builtin> {
    let function: Builtin = match name {
        "abs" => |a| unary("abs", a, f64::abs),
        "ceil" => |a| unary("ceil", a, f64::ceil),
        "floor" => |a| unary("floor", a, f64::floor),
        "sqrt" => |a| unary("sqrt", a, f64::sqrt),
        "cbrt" => |a| unary("cbrt", a, f64::cbrt),
        "exp" => |a| unary("exp", a, f64::exp),
        "log10" => |a| unary("log10", a, f64::log10),
        "log2" => |a| unary("log2", a, f64::log2),
        "sin" => |a| unary("sin", a, f64::sin),
        "cos" => |a| unary("cos", a, f64::cos),
        "tan" => |a| unary("tan", a, f64::tan),
        "asin" => |a| unary("asin", a, f64::asin),
        "acos" => |a| unary("acos", a, f64::acos),
        "atan" => |a| unary("atan", a, f64::atan),
        "sign" => |a| unary("sign", a, sign),
        "round" => round,
        "log" => log,
        "pow" => |a| binary("pow", a, f64::powf),
        "atan2" => |a| binary("atan2", a, f64::atan2),
        "mod" => |a| binary("mod", a, floored_mod),
        "min" => |a| fold("min", a, f64::min),
        "max" => |a| fold("max", a, f64::max),
        "random" => random,
        "number" => number,
        "string" => string,
        "concat" => concat,
        "size" => size,
        _ => return None,
    };
    Some(function)
}

/// Floored modulo: the result takes the sign of the divisor.
pub(crate) fn floored_mod(x: f64, y: f64) -> f64 {
    if y == 0.0 { x } else { x - y * (x / y).floor() }
}

fn sign(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() { x } else { x.signum() }
}

fn check_arity(name: &str, args: &[Value], min: usize, max: usize) -> ExprResult<()> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else if max == usize::MAX {
            format!("at least {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(ExprError::Arity {
            name: name.to_string(),
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn unary(name: &str, args: &[Value], f: fn(f64) -> f64) -> ExprResult<Value> {
    check_arity(name, args, 1, 1)?;
    Ok(Value::Number(f(args[0].to_number()?)))
}

fn binary(name: &str, args: &[Value], f: fn(f64, f64) -> f64) -> ExprResult<Value> {
    check_arity(name, args, 2, 2)?;
    Ok(Value::Number(f(args[0].to_number()?, args[1].to_number()?)))
}

/// Reduce numeric arguments; a single array argument is reduced element-wise.
fn fold(name: &str, args: &[Value], f: fn(f64, f64) -> f64) -> ExprResult<Value> {
    check_arity(name, args, 1, usize::MAX)?;
    let items = match args {
        [Value::Array(items)] if !items.is_empty() => items.as_slice(),
        [Value::Array(_)] => {
            return Err(ExprError::type_error(format!(
                "{} of an empty array",
                name
            )));
        }
        _ => args,
    };
    let mut acc = items[0].to_number()?;
    for item in &items[1..] {
        acc = f(acc, item.to_number()?);
    }
    Ok(Value::Number(acc))
}

fn round(args: &[Value]) -> ExprResult<Value> {
    check_arity("round", args, 1, 2)?;
    let x = args[0].to_number()?;
    let digits = match args.get(1) {
        Some(n) => n.to_number()?,
        None => 0.0,
    };
    let scale = 10f64.powf(digits);
    Ok(Value::Number((x * scale).round() / scale))
}

fn log(args: &[Value]) -> ExprResult<Value> {
    check_arity("log", args, 1, 2)?;
    let x = args[0].to_number()?;
    match args.get(1) {
        Some(base) => Ok(Value::Number(x.ln() / base.to_number()?.ln())),
        None => Ok(Value::Number(x.ln())),
    }
}

fn random(args: &[Value]) -> ExprResult<Value> {
    check_arity("random", args, 0, 2)?;
    let (low, high) = match args {
        [] => (0.0, 1.0),
        [max] => (0.0, max.to_number()?),
        [min, max] => (min.to_number()?, max.to_number()?),
        _ => unreachable!("arity checked"),
    };
    Ok(Value::Number(low + rand::random::<f64>() * (high - low)))
}

fn number(args: &[Value]) -> ExprResult<Value> {
    check_arity("number", args, 1, 1)?;
    Ok(Value::Number(args[0].to_number()?))
}

fn string(args: &[Value]) -> ExprResult<Value> {
    check_arity("string", args, 1, 1)?;
    Ok(Value::String(args[0].to_string()))
}

fn concat(args: &[Value]) -> ExprResult<Value> {
    check_arity("concat", args, 1, usize::MAX)?;
    if args.iter().all(|a| matches!(a, Value::Array(_))) {
        let items = args
            .iter()
            .flat_map(|a| match a {
                Value::Array(items) => items.clone(),
                _ => Vec::new(),
            })
            .collect();
        return Ok(Value::Array(items));
    }
    Ok(Value::String(args.iter().map(Value::to_string).collect()))
}

fn size(args: &[Value]) -> ExprResult<Value> {
    check_arity("size", args, 1, 1)?;
    let len = match &args[0] {
        Value::Array(items) => items.len(),
        Value::String(s) => s.chars().count(),
        Value::Map(entries) => entries.len(),
        other => {
            return Err(ExprError::type_error(format!(
                "size() is not defined for {}",
                other.type_name()
            )));
        }
    };
    Ok(Value::Number(len as f64))
}
