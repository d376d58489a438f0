/*
 * expr_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for dok-expr through its public API.
 */

use dok_expr::{Bindings, ExprEnvironment, ExprError, Value};
use pretty_assertions::assert_eq;

fn bindings(pairs: &[(&str, Value)]) -> Bindings {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_sum_of_bound_variables() {
    let env = ExprEnvironment::new();
    let vars = bindings(&[("a", Value::Number(5.0)), ("b", Value::Number(4.0))]);
    assert_eq!(env.evaluate_str("a+b", &vars).unwrap(), Value::Number(9.0));
}

#[test]
fn test_viewport_layout_arithmetic() {
    let env = ExprEnvironment::new();
    let vars = bindings(&[
        ("viewportWidth", Value::Number(800.0)),
        ("viewportHeight", Value::Number(600.0)),
        ("index", Value::Number(2.0)),
    ]);
    assert_eq!(
        env.evaluate_str("viewportWidth / 4 * index", &vars).unwrap(),
        Value::Number(400.0)
    );
    assert_eq!(
        env.evaluate_str("min(viewportWidth, viewportHeight) / 2", &vars)
            .unwrap(),
        Value::Number(300.0)
    );
    assert_eq!(
        env.evaluate_str("index % 2 == 0 ? 'even' : 'odd'", &vars)
            .unwrap(),
        Value::from("even")
    );
}

#[test]
fn test_imported_function() {
    let mut env = ExprEnvironment::new();
    env.import("double", |args: &[Value]| match args {
        [value] => Ok(Value::Number(value.to_number()? * 2.0)),
        _ => Err(ExprError::Function {
            name: "double".into(),
            message: "expects one argument".into(),
        }),
    });

    assert!(env.has_function("double"));
    assert_eq!(
        env.evaluate_str("double(21)", &Bindings::new()).unwrap(),
        Value::Number(42.0)
    );
    assert!(matches!(
        env.evaluate_str("double()", &Bindings::new()),
        Err(ExprError::Function { .. })
    ));
}

#[test]
fn test_import_applies_to_programs_compiled_earlier() {
    let mut env = ExprEnvironment::new();
    let program = env.compile("greet('dok')").unwrap();
    assert!(matches!(
        env.evaluate(&program, &Bindings::new()),
        Err(ExprError::UnknownFunction { .. })
    ));

    env.import("greet", |args: &[Value]| {
        Ok(Value::String(format!("hello {}", args[0])))
    });
    assert_eq!(
        env.evaluate(&program, &Bindings::new()).unwrap(),
        Value::from("hello dok")
    );
}

#[test]
fn test_array_helpers() {
    let env = ExprEnvironment::new();
    let none = Bindings::new();
    assert_eq!(
        env.evaluate_str("size([1, 2, 3])", &none).unwrap(),
        Value::Number(3.0)
    );
    assert_eq!(
        env.evaluate_str("concat([1], [2, 3])", &none).unwrap(),
        Value::Array(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0)
        ])
    );
    assert_eq!(
        env.evaluate_str("concat('row-', 3)", &none).unwrap(),
        Value::from("row-3")
    );
}

#[test]
fn test_errors_are_reported() {
    let env = ExprEnvironment::new();
    let none = Bindings::new();
    assert!(matches!(
        env.compile("3 +* 4"),
        Err(ExprError::Parse { .. })
    ));
    assert!(matches!(
        env.evaluate_str("sqrt(1, 2)", &none),
        Err(ExprError::Arity { .. })
    ));
    let message = env.evaluate_str("missing * 2", &none).unwrap_err().to_string();
    assert_eq!(message, "Undefined symbol: missing");
}
