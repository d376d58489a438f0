//! dok CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "dok")]
#[command(version)]
#[command(about = "Expand declarative configuration trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve templates and references, then expand repeat/table directives
    Expand {
        /// Input file (JSON or YAML)
        input: String,

        /// Path that relative template and reference paths are resolved
        /// against (defaults to the input path)
        #[arg(long)]
        base_path: Option<String>,

        /// Viewport size, exposed as viewportWidth and viewportHeight
        #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
        viewport: Option<Vec<f64>>,

        /// Runtime parameter (KEY=VALUE, VALUE parsed as JSON when possible)
        #[arg(short = 'P', long = "param")]
        params: Vec<String>,

        /// Engine constant (KEY=VALUE, VALUE parsed as JSON when possible)
        #[arg(short = 'C', long = "constant")]
        constants: Vec<String>,

        /// JSON or YAML file with engine options
        #[arg(long)]
        config: Option<String>,

        /// Expose isDebug = 1 to expressions
        #[arg(long)]
        debug: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write output to FILE instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Evaluate a string containing {expr} spans
    Eval {
        /// Text to evaluate, e.g. "{a + b}" or "width: {w * 2}px"
        text: String,

        /// Variable binding (KEY=VALUE, VALUE parsed as JSON when possible)
        #[arg(short = 'B', long = "bind")]
        bindings: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dok=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Expand {
            input,
            base_path,
            viewport,
            params,
            constants,
            config,
            debug,
            format,
            output,
        } => commands::expand::execute(commands::expand::ExpandArgs {
            input,
            base_path,
            viewport,
            params,
            constants,
            config,
            debug,
            format,
            output,
        }),
        Commands::Eval { text, bindings } => commands::eval::execute(&text, &bindings),
    }
}
