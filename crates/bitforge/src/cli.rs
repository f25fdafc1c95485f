//! Clap derive structures for the `bitforge` CLI.
//!
//! One subcommand per reconciliation verb, each taking a resource type
//! name and a descriptor, plus config and completion helpers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use bitforge_core::ResourceKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bitforge -- declarative reconciliation for Bitbucket Cloud
#[derive(Debug, Parser)]
#[command(
    name = "bitforge",
    version,
    about = "Reconcile Bitbucket Cloud resources from the command line",
    long_about = "Drive Bitbucket Cloud groups, repositories, projects, webhooks and\n\
        permissions toward a desired-state descriptor.\n\n\
        Every mutating command prints the state observed by a fresh read.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "BITFORGE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "BITFORGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides the config default)
    #[arg(long, short = 'o', env = "BITFORGE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BITFORGE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a resource and print its observed state
    Create(DescriptorArgs),

    /// Read a resource's remote state (absence is not an error)
    Read(DescriptorArgs),

    /// Apply the full desired state to an existing resource
    Update(DescriptorArgs),

    /// Delete a resource; already-absent counts as success
    #[command(alias = "rm")]
    Delete(DescriptorArgs),

    /// Resolve an import ID into a full descriptor
    Import(ImportArgs),

    /// List supported resource types and their import ID formats
    Resources,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Verb Arguments ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DescriptorArgs {
    /// Resource type, e.g. bitbucket_repository
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Descriptor as an inline JSON object
    #[arg(long, short = 'd', conflicts_with = "from_file")]
    pub descriptor: Option<String>,

    /// Read the descriptor from a JSON file ("-" for stdin)
    #[arg(long, short = 'f')]
    pub from_file: Option<PathBuf>,

    /// Set a single field (repeatable); values parse as JSON, else string
    #[arg(long = "set", short = 's', value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Resource type, e.g. bitbucket_group
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Import ID: the resource's key fields joined by '/'
    pub id: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the loaded configuration with secrets masked
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

fn parse_kind(raw: &str) -> Result<ResourceKind, String> {
    ResourceKind::from_name(raw)
        .map_err(|e| format!("{e}; run `bitforge resources` for the list"))
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field.to_owned(), value.to_owned())),
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("url=https://ci/hook?a=b").unwrap(),
            ("url".to_string(), "https://ci/hook?a=b".to_string())
        );
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn kind_parser_names_the_listing_command() {
        let err = parse_kind("bitbucket_branch").unwrap_err();
        assert!(err.contains("bitforge resources"));
    }
}
