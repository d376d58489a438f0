/*
 * expand.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Expand command implementation
 */

//! Expand command implementation.
//!
//! Loads the input through the filesystem loader, runs the full
//! resolve/expand pipeline and prints the result.

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use dok_loader::{FileSystemLoader, Loaded, Loader, ResponseType};
use dok_merger::{ConfigMerger, EngineOptions, RuntimeParams};

use super::{OutputFormat, parse_key_value};

/// Arguments for the expand command
#[derive(Debug)]
pub struct ExpandArgs {
    pub input: String,
    pub base_path: Option<String>,
    pub viewport: Option<Vec<f64>>,
    pub params: Vec<String>,
    pub constants: Vec<String>,
    pub config: Option<String>,
    pub debug: bool,
    pub format: OutputFormat,
    pub output: Option<String>,
}

/// Execute the expand command
pub fn execute(args: ExpandArgs) -> Result<()> {
    let rendered = run(&args)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered).with_context(|| format!("Failed to write {}", path))?;
            info!(output = %path, "Wrote expanded configuration");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn run(args: &ExpandArgs) -> Result<String> {
    let options = engine_options(args)?;
    let params = runtime_params(args)?;
    let loader = FileSystemLoader::new();

    let tree = match pollster::block_on(loader.load(&args.input, ResponseType::Json))
        .with_context(|| format!("Failed to load {}", args.input))?
    {
        Loaded::Structured(tree) => tree,
        Loaded::Text(_) => bail!(
            "Input {} is not JSON or YAML (no decoder for its extension)",
            args.input
        ),
    };

    let base_path = args.base_path.as_deref().unwrap_or(&args.input);
    debug!(input = %args.input, base_path, "Expanding");

    let merger = ConfigMerger::new(loader, options);
    let result = pollster::block_on(merger.process(tree, base_path, &params))
        .with_context(|| format!("Failed to expand {}", args.input))?;

    args.format.render(&result)
}

fn engine_options(args: &ExpandArgs) -> Result<EngineOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path))?;
            // YAML is a superset of JSON, so one parser covers both.
            serde_yaml::from_str::<EngineOptions>(&text)
                .with_context(|| format!("Invalid engine options in {}", path))?
        }
        None => EngineOptions::default(),
    };
    if args.debug {
        options.debug = true;
    }
    for constant in &args.constants {
        let (key, value) = parse_key_value(constant)?;
        options.constants.insert(key, value);
    }
    Ok(options)
}

fn runtime_params(args: &ExpandArgs) -> Result<RuntimeParams> {
    let mut params = RuntimeParams::new();
    if let Some(viewport) = &args.viewport {
        let [width, height] = viewport.as_slice() else {
            bail!("--viewport takes exactly two numbers");
        };
        params = params.with_viewport(*width, *height);
    }
    for param in &args.params {
        let (key, value) = parse_key_value(param)?;
        params = params.with_param(key, value);
    }
    Ok(params)
}
