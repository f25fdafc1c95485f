// Credential provider
//
// Turns one of the supported authentication configurations into a
// `Credentials` value that decorates every outgoing request. Client
// credentials are exchanged for a bearer token exactly once, at
// construction time; the token is never refreshed.

use std::fmt;

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;

/// Authentication configuration supplied once at process start.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Username + password (or app password), sent as HTTP Basic.
    Basic {
        username: String,
        password: SecretString,
    },
    /// OAuth2 consumer key/secret, exchanged for a bearer token.
    OAuthClientCredentials {
        client_id: String,
        client_secret: SecretString,
    },
}

/// Resolved credentials, immutable once constructed.
///
/// Call sites never branch on the variant; they hand a request builder to
/// [`decorate`](Self::decorate) and get it back with the right header.
#[derive(Clone)]
pub enum Credentials {
    Basic {
        username: String,
        password: SecretString,
    },
    Bearer {
        token: SecretString,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
}

impl Credentials {
    /// Resolve an [`AuthConfig`] into usable credentials.
    ///
    /// Basic credentials are taken as-is. Client credentials trigger a
    /// single `grant_type=client_credentials` exchange against
    /// `token_url`; any failure there is returned as
    /// [`Error::OAuthExchange`] and is not retried.
    pub async fn resolve(
        config: &AuthConfig,
        http: &reqwest::Client,
        token_url: &str,
    ) -> Result<Self, Error> {
        match config {
            AuthConfig::Basic { username, password } => Ok(Self::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            AuthConfig::OAuthClientCredentials {
                client_id,
                client_secret,
            } => Self::exchange(http, token_url, client_id, client_secret).await,
        }
    }

    async fn exchange(
        http: &reqwest::Client,
        token_url: &str,
        client_id: &str,
        client_secret: &SecretString,
    ) -> Result<Self, Error> {
        debug!(%token_url, "exchanging client credentials for a bearer token");

        let resp = http
            .post(token_url)
            .basic_auth(client_id, Some(client_secret.expose_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| Error::OAuthExchange {
                message: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::OAuthExchange {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let preview: String = body.chars().take(200).collect();
            return Err(Error::OAuthExchange {
                message: format!("HTTP {status}: {preview}"),
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::OAuthExchange {
                message: format!("malformed token response: {e}"),
            })?;

        if token.access_token.is_empty() {
            return Err(Error::OAuthExchange {
                message: "token response carried an empty access_token".into(),
            });
        }

        debug!(token_type = ?token.token_type, "bearer token obtained");
        Ok(Self::Bearer {
            token: SecretString::from(token.access_token),
        })
    }

    /// Attach the `Authorization` header for these credentials.
    pub fn decorate(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
            Self::Bearer { token } => builder.bearer_auth(token.expose_secret()),
        }
    }

    /// Short label for logs (never includes secret material).
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn header_of(creds: &Credentials) -> String {
        let http = reqwest::Client::new();
        let req = creds
            .decorate(http.get("https://api.bitbucket.org/2.0/user"))
            .build()
            .unwrap();
        req.headers()
            .get(reqwest::header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[test]
    fn basic_decorates_with_basic_header() {
        let creds = Credentials::Basic {
            username: "alice".into(),
            password: SecretString::from("s3cret".to_string()),
        };
        // base64("alice:s3cret")
        assert_eq!(header_of(&creds), "Basic YWxpY2U6czNjcmV0");
    }

    #[test]
    fn bearer_decorates_with_bearer_header() {
        let creds = Credentials::Bearer {
            token: SecretString::from("tok-123".to_string()),
        };
        assert_eq!(header_of(&creds), "Bearer tok-123");
    }

    #[test]
    fn debug_hides_secrets() {
        let creds = Credentials::Basic {
            username: "alice".into(),
            password: SecretString::from("s3cret".to_string()),
        };
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("s3cret"));
    }

    #[tokio::test]
    async fn basic_config_resolves_without_network() {
        let config = AuthConfig::Basic {
            username: "alice".into(),
            password: SecretString::from("pw".to_string()),
        };
        // Unroutable token URL: a network call here would fail the test.
        let creds = Credentials::resolve(&config, &reqwest::Client::new(), "http://127.0.0.1:9/")
            .await
            .unwrap();
        assert_eq!(creds.scheme(), "basic");
    }
}
