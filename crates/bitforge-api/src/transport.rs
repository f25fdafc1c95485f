// Shared transport configuration and response classification.
//
// Both the legacy and the modern client build their `reqwest::Client`
// through this module and run every response through `classify`, so the
// status-code policy lives in exactly one place.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::trace;
use url::Url;

use crate::error::Error;

const USER_AGENT: &str = concat!("bitforge/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the bundled/system certificate store.
    #[default]
    System,
    /// Additionally trust a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        if let TlsMode::CustomCa(path) = &self.tls {
            let cert_pem = std::fs::read(path)
                .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
            let cert = reqwest::Certificate::from_pem(&cert_pem)
                .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── URL helpers ──────────────────────────────────────────────────────

/// Normalize a base URL so relative joins land beneath it.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidBaseUrl(raw.to_owned()));
    }
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
///
/// Each segment is encoded on its own, so identifiers such as `{uuid}` or
/// slugs never split into extra path components.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

// ── Response classification ──────────────────────────────────────────

/// Outcome of a successfully classified response.
#[derive(Debug)]
pub(crate) enum Payload {
    /// 200/201 with a non-empty body.
    Body(String),
    /// 204 No Content.
    Empty,
}

/// Apply the status-code policy shared by both API surfaces.
///
/// 200/201 carry a body to decode, 204 is success without one, 404 is
/// absence, 401 is an authentication failure and everything else fails.
pub(crate) async fn classify(resp: reqwest::Response) -> Result<Payload, Error> {
    let status = resp.status();
    let url = resp.url().to_string();

    match status {
        StatusCode::OK | StatusCode::CREATED => {
            let body = resp.text().await?;
            if body.trim().is_empty() {
                return Err(Error::MissingBody {
                    status: status.as_u16(),
                });
            }
            trace!(%url, bytes = body.len(), "response body received");
            Ok(Payload::Body(body))
        }
        StatusCode::NO_CONTENT => Ok(Payload::Empty),
        StatusCode::NOT_FOUND => Err(Error::NotFound { url }),
        StatusCode::UNAUTHORIZED => Err(Error::Authentication {
            message: format!("credentials rejected by {url}"),
        }),
        _ => {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            Err(Error::Http {
                status: status.as_u16(),
                message: if preview.is_empty() {
                    status.to_string()
                } else {
                    preview
                },
            })
        }
    }
}

/// Decode a JSON body, keeping a preview of the raw text on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

/// Require a decodable body; a 204 here is a contract violation.
pub(crate) fn require_body<T: DeserializeOwned>(payload: Payload) -> Result<T, Error> {
    match payload {
        Payload::Body(body) => decode(body),
        Payload::Empty => Err(Error::MissingBody { status: 204 }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base_url("https://api.bitbucket.org/2.0").unwrap();
        assert_eq!(url.as_str(), "https://api.bitbucket.org/2.0/");
    }

    #[test]
    fn endpoint_encodes_each_segment() {
        let base = normalize_base_url("https://api.bitbucket.org/2.0/").unwrap();
        let url = endpoint(&base, &["repositories", "{abc}", "my-repo"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.bitbucket.org/2.0/repositories/%7Babc%7D/my-repo"
        );
    }

    #[test]
    fn endpoint_never_splits_a_segment() {
        let base = normalize_base_url("https://example.com/1.0").unwrap();
        let url = endpoint(&base, &["groups", "a/b"]).unwrap();
        assert_eq!(url.path(), "/1.0/groups/a%2Fb");
    }

    #[test]
    fn decode_failure_keeps_body() {
        let err = decode::<Vec<u32>>("{\"nope\":1}".into()).unwrap_err();
        match err {
            Error::Deserialization { body, .. } => assert_eq!(body, "{\"nope\":1}"),
            other => panic!("expected Deserialization, got {other:?}"),
        }
    }

    #[test]
    fn custom_ca_must_exist() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/ca.pem")),
            ..TransportConfig::default()
        };
        assert!(matches!(config.build_client(), Err(Error::Tls(_))));
    }
}
