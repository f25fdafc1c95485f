//! Command handlers.

pub mod config_cmd;
pub mod resource;

use crate::cli::OutputFormat;

/// Rendering settings shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub format: OutputFormat,
    pub quiet: bool,
}
