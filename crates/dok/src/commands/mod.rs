//! Command implementations for the dok CLI

pub mod eval;
pub mod expand;

use anyhow::{Result, bail};
use clap::ValueEnum;
use dok_config::ConfigNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn render(self, node: &ConfigNode) -> Result<String> {
        let text = match self {
            OutputFormat::Json => node.to_json_string_pretty()?,
            OutputFormat::Yaml => node.to_yaml_string()?,
        };
        Ok(text)
    }
}

/// Split `KEY=VALUE`. The value is read as JSON when it parses, so `3`,
/// `true` and `[1,2]` keep their types; anything else is a string.
pub fn parse_key_value(arg: &str) -> Result<(String, ConfigNode)> {
    let Some((key, value)) = arg.split_once('=') else {
        bail!("Expected KEY=VALUE, got '{}'", arg);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Missing key in '{}'", arg);
    }
    let value = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => ConfigNode::from(json),
        Err(_) => ConfigNode::string(value),
    };
    Ok((key.to_string(), value))
}
