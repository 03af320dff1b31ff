//! Dirac Command-Line Interface
//!
//! The main entry point for the `dirac` calculator.
//!
//! ```text
//! $ dirac eval "(|0> + i|1>)/sqrt(2)"
//! 0.7071|0> + 0.7071i|1>
//! $ dirac eval --style unicode "|0><1| + |1><0|"
//! |0〉〈1| + |1〉〈0|
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{OutputArgs, Settings, eval, repl, version};
use config::Config;

/// dirac - evaluate and pretty-print Dirac bra-ket notation
#[derive(Parser)]
#[command(name = "dirac")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = "DIRAC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one expression and print the result
    Eval {
        /// Expression in Dirac notation, e.g. "<0|(|0> + |1>)"
        expression: String,

        #[command(flatten)]
        output: OutputArgs,

        /// Print a JSON report instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Evaluate expressions read line by line from stdin
    Repl {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());

    // Setup logging
    let filter = match cli.verbose {
        0 => config
            .as_ref()
            .map_or_else(|_| "warn".to_string(), |c| c.log_level.clone()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = config
        .map_err(anyhow::Error::from)
        .and_then(|config| match cli.command {
            Commands::Eval {
                expression,
                output,
                json,
            } => Settings::resolve(&config, &output)
                .and_then(|settings| eval::execute(&expression, &settings, json)),

            Commands::Repl { output } => {
                Settings::resolve(&config, &output).and_then(repl::execute)
            }

            Commands::Version => {
                version::execute();
                Ok(())
            }
        });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
