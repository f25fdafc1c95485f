// ── Provider configuration ──
//
// Fully resolved settings handed to `Provider::connect`. Nothing in this
// crate reads files or environment variables; that is the job of
// `bitforge-config` (or whatever embeds the provider).

use std::time::Duration;

use bitforge_api::{AuthConfig, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// Everything needed to construct both API clients.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub auth: AuthConfig,
    /// Root of the legacy (1.0) surface.
    pub legacy_url: Url,
    /// Root of the modern (2.0) surface.
    pub api_url: Url,
    /// OAuth2 token endpoint; only contacted for client-credentials auth.
    pub token_url: Url,
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Configuration pointing at Bitbucket Cloud with default transport settings.
    pub fn new(auth: AuthConfig) -> Result<Self, CoreError> {
        Ok(Self {
            auth,
            legacy_url: parse_url("legacy_url", bitforge_api::LEGACY_API_URL)?,
            api_url: parse_url("api_url", bitforge_api::API_URL)?,
            token_url: parse_url("token_url", bitforge_api::TOKEN_URL)?,
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        })
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, CoreError> {
    Url::parse(raw).map_err(|e| CoreError::Config {
        message: format!("invalid {field} '{raw}': {e}"),
    })
}
