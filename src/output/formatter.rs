use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::engine::{Diagnostic, Resolution, ResolvedValue};
use indexmap::IndexMap;

pub const DOTENV_LINE_SEPARATOR: &str = "\r\n";

#[derive(Debug, Serialize)]
pub struct JsonOutput<'r> {
    pub total_variables: usize,
    pub unresolved: usize,
    pub variables: &'r IndexMap<String, ResolvedValue>,
    #[serde(skip_serializing_if = "no_diagnostics")]
    pub diagnostics: &'r [Diagnostic],
}

fn no_diagnostics(diagnostics: &&[Diagnostic]) -> bool {
    diagnostics.is_empty()
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format(resolution: &Resolution, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Dotenv => Ok(Self::to_dotenv(&resolution.variables)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&Self::build_output(
                resolution,
            ))?),
        }
    }

    /// `KEY=value` lines. Unresolved values are written as empty strings.
    pub fn to_dotenv(variables: &IndexMap<String, ResolvedValue>) -> String {
        variables
            .iter()
            .map(|(key, value)| format!("{key}={}", value.to_env_string()))
            .collect::<Vec<_>>()
            .join(DOTENV_LINE_SEPARATOR)
    }

    pub fn build_output(resolution: &Resolution) -> JsonOutput<'_> {
        JsonOutput {
            total_variables: resolution.variables.len(),
            unresolved: resolution.unresolved_keys().len(),
            variables: &resolution.variables,
            diagnostics: &resolution.diagnostics,
        }
    }
}
