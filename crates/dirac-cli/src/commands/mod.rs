//! CLI command implementations.

pub mod eval;
pub mod repl;
pub mod version;

use anyhow::Result;
use clap::Args;
use dirac_core::{FormatSpec, Style, notation::MAX_QUBITS};

use crate::config::{Config, MAX_DECIMALS};

/// Output flags shared by `eval` and `repl`. Each one overrides the
/// configuration when given.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Scale bras, kets and scalars to unit norm
    #[arg(short, long)]
    pub normalize: bool,

    /// Output style (ascii, unicode, tex, html)
    #[arg(short, long)]
    pub style: Option<Style>,

    /// Decimal places for coefficients
    #[arg(short, long)]
    pub decimals: Option<usize>,

    /// Minimum width of basis labels, in bits
    #[arg(long)]
    pub min_qubits: Option<u32>,
}

/// Resolved output settings for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub spec: FormatSpec,
    pub normalize: bool,
}

impl Settings {
    /// Combine the configuration with command-line overrides.
    pub fn resolve(config: &Config, args: &OutputArgs) -> Result<Self> {
        let configured = config.format_spec()?;
        let mut spec = match args.style {
            Some(style) => FormatSpec {
                decimals: configured.decimals,
                min_qubits: configured.min_qubits,
                ..style.spec()
            },
            None => configured,
        };
        if let Some(decimals) = args.decimals {
            if decimals > MAX_DECIMALS {
                anyhow::bail!("--decimals must be at most {MAX_DECIMALS}");
            }
            spec.decimals = decimals;
        }
        if let Some(q) = args.min_qubits {
            if q > MAX_QUBITS {
                anyhow::bail!("--min-qubits must be at most {MAX_QUBITS}");
            }
            spec.min_qubits = Some(q);
        }

        Ok(Settings {
            spec,
            normalize: args.normalize || config.normalize,
        })
    }
}
