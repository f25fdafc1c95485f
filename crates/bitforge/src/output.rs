//! Output formatting: JSON or YAML.
//!
//! Descriptors are flat JSON objects, so every format is a plain serde
//! rendering of the same value.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render any serializable value in the chosen format.
pub fn render<T: Serialize + ?Sized>(format: OutputFormat, data: &T) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?.trim_end().to_owned(),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a status note to stderr, respecting quiet mode.
pub fn print_note(note: &str, quiet: bool) {
    if quiet {
        return;
    }
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{note}");
}
