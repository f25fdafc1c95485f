use thiserror::Error;

/// Top-level error type for the `bitforge-api` crate.
///
/// Covers every failure mode across both API surfaces: credential setup,
/// transport, status classification, and response decoding.
/// `bitforge-core` wraps these with the operation that failed.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials were rejected (HTTP 401) or could not be encoded.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The OAuth2 client-credentials exchange did not yield a token.
    #[error("OAuth2 token exchange failed: {message}")]
    OAuthExchange { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A pagination link pointed away from the configured API origin.
    #[error("Refusing to follow page link to foreign origin: {url}")]
    ForeignPageLink { url: String },

    // ── Status classification ───────────────────────────────────────
    /// The remote reported that the entity does not exist: HTTP 404, or a
    /// zero-element array from a legacy single-entity endpoint.
    #[error("Not found: {url}")]
    NotFound { url: String },

    /// Any status other than 200/201/204/404.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A 200/201 response arrived without a body to decode.
    #[error("HTTP {status} response carried no body")]
    MissingBody { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the remote reported the entity as absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the request never produced a usable response.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Authentication { .. } => Some(401),
            Self::Http { status, .. } | Self::MissingBody { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
