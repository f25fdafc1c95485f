//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use bitforge_config::ConfigError;
use bitforge_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach Bitbucket")]
    #[diagnostic(
        code(bitforge::connection_failed),
        help("Check network access and the api_url / legacy_url settings of your profile.")
    )]
    ConnectionFailed {
        #[source]
        source: CoreError,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(bitforge::auth_failed),
        help(
            "Verify your credentials.\n\
             Basic auth: BITBUCKET_USERNAME / BITBUCKET_PASSWORD (an app password works).\n\
             OAuth: BITBUCKET_OAUTH_CLIENT_ID / BITBUCKET_OAUTH_CLIENT_SECRET with auth_method = \"oauth\"."
        )
    )]
    AuthFailed {
        #[source]
        source: CoreError,
    },

    #[error("{message}")]
    #[diagnostic(
        code(bitforge::no_credentials),
        help(
            "Set BITBUCKET_USERNAME and BITBUCKET_PASSWORD, or add them to a profile.\n\
             Run: bitforge config path"
        )
    )]
    NoCredentials { message: String },

    // ── Client setup ─────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(bitforge::client_setup),
        help("Check the ca_cert, api_url and legacy_url settings of your profile.")
    )]
    ClientSetup(CoreError),

    // ── Resources ────────────────────────────────────────────────────
    #[error("{kind} '{id}' not found")]
    #[diagnostic(
        code(bitforge::not_found),
        help("Check the import ID; it must name an entity that exists remotely.")
    )]
    NotFound { kind: String, id: String },

    #[error(transparent)]
    #[diagnostic(
        code(bitforge::unsupported),
        help("Delete and recreate the resource instead.")
    )]
    Unsupported(CoreError),

    // ── Input ────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(bitforge::invalid_input))]
    InvalidInput(CoreError),

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bitforge::validation))]
    Validation { field: String, reason: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(bitforge::api_error))]
    Api(CoreError),

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(bitforge::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(bitforge::json), help("Check the descriptor JSON and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported(_)
            | Self::InvalidInput(_)
            | Self::Validation { .. }
            | Self::Config(ConfigError::Validation { .. }) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_auth() {
            return Self::AuthFailed { source: err };
        }
        if err.is_connection() {
            return Self::ConnectionFailed { source: err };
        }
        match err {
            CoreError::NotFoundDuringImport { kind, id } => Self::NotFound { kind, id },
            err @ CoreError::Client { .. } => Self::ClientSetup(err),
            err @ CoreError::Unsupported { .. } => Self::Unsupported(err),
            err if err.is_configuration() => Self::InvalidInput(err),
            err => Self::Api(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { .. } => Self::NoCredentials {
                message: err.to_string(),
            },
            other => Self::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_miss_is_not_found() {
        let err = CliError::from(CoreError::NotFoundDuringImport {
            kind: "bitbucket_group".into(),
            id: "W/ghost".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn bad_import_id_is_usage() {
        let err = CliError::from(CoreError::InvalidImportId {
            kind: "bitbucket_group".into(),
            raw: "W".into(),
            expected: "<workspace>/<slug>".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn client_setup_is_not_a_credentials_problem() {
        let err = CliError::from(CoreError::Client {
            source: bitforge_api::Error::Tls("failed to read CA cert: no such file".into()),
        });
        assert!(matches!(err, CliError::ClientSetup(_)));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn rejected_token_exchange_is_auth() {
        let err = CliError::from(CoreError::Credentials {
            source: bitforge_api::Error::OAuthExchange {
                message: "HTTP 401".into(),
            },
        });
        assert!(matches!(err, CliError::AuthFailed { .. }));
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn missing_credentials_are_auth() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "default".into(),
            method: "basic".into(),
            missing: "username".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
