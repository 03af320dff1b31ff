//! Configuration for the `dirac` command.
//!
//! Supports loading configuration from:
//! 1. A configuration file (YAML)
//! 2. Environment variables (with DIRAC_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use std::path::Path;

use dirac_core::{FormatSpec, Style, notation::MAX_QUBITS};
use serde::{Deserialize, Serialize};

/// Largest precision `format!` renders meaningfully for an `f64`.
pub const MAX_DECIMALS: usize = 15;

/// Output and logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Output style: "ascii", "unicode", "tex" or "html"
    #[serde(default = "default_style")]
    pub style: String,

    /// Decimal places for coefficients
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    /// Minimum width of basis labels, in bits
    #[serde(default)]
    pub min_qubits: Option<u32>,

    /// Scale bras, kets and scalars to unit norm before printing
    #[serde(default)]
    pub normalize: bool,

    /// Log level used when no -v flag is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_style() -> String {
    Style::Ascii.to_string()
}

fn default_decimals() -> usize {
    4
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            style: default_style(),
            decimals: default_decimals(),
            min_qubits: None,
            normalize: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::IoError(format!("{}: {e}", path.as_ref().display()))
        })?;

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            Config::default()
        };

        let config = config.merge_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into this configuration.
    ///
    /// `lookup` returns the value of a variable if it is set. Only variables
    /// that are set override the file-loaded (or default) values; numbers
    /// and flags that fail to parse are ignored.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("DIRAC_STYLE") {
            self.style = v;
        }
        if let Some(v) = lookup("DIRAC_DECIMALS") {
            if let Ok(val) = v.parse() {
                self.decimals = val;
            }
        }
        if let Some(v) = lookup("DIRAC_MIN_QUBITS") {
            if let Ok(val) = v.parse() {
                self.min_qubits = Some(val);
            }
        }
        if let Some(v) = lookup("DIRAC_NORMALIZE") {
            if let Some(val) = parse_flag(&v) {
                self.normalize = val;
            }
        }
        if let Some(v) = lookup("DIRAC_LOG_LEVEL") {
            self.log_level = v;
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_style()?;

        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::ValidationError(format!(
                "decimals must be at most {MAX_DECIMALS}, got {}",
                self.decimals
            )));
        }

        if let Some(q) = self.min_qubits {
            if q > MAX_QUBITS {
                return Err(ConfigError::ValidationError(format!(
                    "min_qubits must be at most {MAX_QUBITS}, got {q}"
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        Ok(())
    }

    /// The configured style.
    pub fn parsed_style(&self) -> Result<Style, ConfigError> {
        self.style
            .parse()
            .map_err(|e: dirac_core::UnknownStyle| ConfigError::ValidationError(e.to_string()))
    }

    /// The format described by this configuration.
    pub fn format_spec(&self) -> Result<FormatSpec, ConfigError> {
        let mut spec = self.parsed_style()?.spec().with_decimals(self.decimals);
        spec.min_qubits = self.min_qubits;
        Ok(spec)
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
