// ── Core error types ──
//
// Errors surfaced by the reconciler. API failures are wrapped together
// with the operation that failed ("create group", "read repository"),
// so every message names both what was attempted and why it broke.
// Remote absence never reaches this type: reads report it as
// `ReadOutcome::Absent` and deletes treat it as success.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Credential material was rejected before any resource call.
    #[error("Unable to obtain credentials: {source}")]
    Credentials {
        #[source]
        source: bitforge_api::Error,
    },

    /// The HTTP client could not be built: unreadable CA file, bad base URL.
    #[error("Unable to construct API client: {source}")]
    Client {
        #[source]
        source: bitforge_api::Error,
    },

    #[error("Invalid import ID '{raw}' for {kind}: expected \"{expected}\"")]
    InvalidImportId {
        kind: String,
        raw: String,
        expected: String,
    },

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidIdentifier {
        field: String,
        value: String,
        reason: String,
    },

    // ── Descriptor errors ────────────────────────────────────────────
    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Unknown resource type '{name}'")]
    UnknownResourceType { name: String },

    // ── Reconciliation errors ────────────────────────────────────────
    #[error("{kind} '{id}' not found during import")]
    NotFoundDuringImport { kind: String, id: String },

    #[error("{kind} does not support {operation}; every field forces replacement")]
    Unsupported { kind: String, operation: String },

    // ── API errors (wrapped with the failing operation) ──────────────
    #[error("Unable to {operation}: {source}")]
    Api {
        operation: String,
        #[source]
        source: bitforge_api::Error,
    },
}

impl CoreError {
    /// Adapter for `map_err` that records which operation failed.
    pub(crate) fn api(operation: impl Into<String>) -> impl FnOnce(bitforge_api::Error) -> Self {
        let operation = operation.into();
        move |source| Self::Api { operation, source }
    }

    /// Returns `true` when the wrapped API error means remote absence.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { source, .. } if source.is_not_found())
    }

    /// Returns `true` when credentials were rejected or never obtained.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Credentials { .. }
                | Self::Api {
                    source: bitforge_api::Error::Authentication { .. }
                        | bitforge_api::Error::OAuthExchange { .. },
                    ..
                }
        )
    }

    /// Returns `true` when the remote could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Api { source, .. } if source.is_transient())
    }

    /// Returns `true` for errors caused by operator input rather than the remote.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::Credentials { .. }
                | Self::Client { .. }
                | Self::InvalidImportId { .. }
                | Self::InvalidIdentifier { .. }
                | Self::MissingField { .. }
                | Self::InvalidField { .. }
                | Self::UnknownResourceType { .. }
        )
    }
}
