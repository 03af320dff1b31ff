//! Eval command implementation.

use anyhow::{Context, Result};
use dirac_core::{Shape, Value, evaluate_notation_with, normalize_best_effort};
use serde::Serialize;
use tracing::info;

use super::Settings;

/// Machine-readable result of one evaluation.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub input: &'a str,
    pub shape: Shape,
    pub qubits: u32,
    pub dims: (usize, usize),
    pub normalized: bool,
    pub output: String,
}

impl<'a> Report<'a> {
    /// Evaluate `input` and describe the result.
    pub fn build(input: &'a str, settings: &Settings) -> Result<Self> {
        let mut value = Value::parse(input)?;
        let normalized =
            settings.normalize && value.shape() != Shape::Operator && normalize_best_effort(&mut value);

        Ok(Report {
            input,
            shape: value.shape(),
            qubits: value.qubits(),
            dims: value.dims(),
            normalized,
            output: value.format(&settings.spec),
        })
    }
}

/// Execute the eval command.
pub fn execute(expression: &str, settings: &Settings, json: bool) -> Result<()> {
    info!("Evaluating {:?}", expression);

    if json {
        let report = Report::build(expression, settings)?;
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{text}");
    } else {
        let output = evaluate_notation_with(expression, settings.normalize, &settings.spec)?;
        println!("{output}");
    }

    Ok(())
}
