/*
 * eval.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Eval command implementation
 */

use anyhow::Result;

use dok_expr::Bindings;
use dok_merger::{Evaluator, to_value};

use super::parse_key_value;

/// Execute the eval command
pub fn execute(text: &str, bindings: &[String]) -> Result<()> {
    let result = evaluate(text, bindings)?;
    println!("{}", serde_json::Value::from(result));
    Ok(())
}

fn evaluate(text: &str, bindings: &[String]) -> Result<dok_config::ConfigNode> {
    let mut extra = Bindings::new();
    for binding in bindings {
        let (key, value) = parse_key_value(binding)?;
        extra.insert(key, to_value(&value));
    }
    let evaluator = Evaluator::new(Bindings::new());
    Ok(evaluator.evaluate_str(text, &extra)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dok_config::ConfigNode;

    #[test]
    fn test_eval_sole_expression() {
        let bindings = vec!["a=5".to_string(), "b=4".to_string()];
        assert_eq!(evaluate("{a+b}", &bindings).unwrap(), ConfigNode::number(9.0));
    }

    #[test]
    fn test_eval_interpolation() {
        let bindings = vec!["a=5".to_string(), "b=4".to_string()];
        assert_eq!(
            evaluate("{{a+b}} = {a+b}", &bindings).unwrap(),
            ConfigNode::string("{a+b} = 9")
        );
    }

    #[test]
    fn test_eval_error() {
        assert!(evaluate("{nope}", &[]).is_err());
    }
}
