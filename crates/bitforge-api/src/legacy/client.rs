// Legacy API HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, credential
// decoration, and the 1.0 surface's response quirks. Endpoint families
// (groups, group members) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::{self, Payload};

/// Raw HTTP client for the Bitbucket 1.0 API.
///
/// Single-entity reads on this surface come back as arrays; [`get_one`]
/// turns a zero-element array into [`Error::NotFound`] so callers see
/// the same absence signal as a 404.
///
/// [`get_one`]: Self::get_one
#[derive(Debug, Clone)]
pub struct LegacyClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<Credentials>,
}

impl LegacyClient {
    /// Create a legacy client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        credentials: Arc<Credentials>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: transport::normalize_base_url(base_url)?,
            credentials,
        })
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        transport::endpoint(&self.base_url, segments)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET an endpoint that returns a JSON array.
    pub(crate) async fn get_array<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {url}");
        let resp = self
            .credentials
            .decorate(self.http.get(url))
            .send()
            .await?;
        transport::require_body(transport::classify(resp).await?)
    }

    /// GET a "single entity" endpoint that answers with a one-element array.
    pub(crate) async fn get_one<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let not_found = url.to_string();
        self.get_array(url)
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NotFound { url: not_found })
    }

    /// POST a form-encoded body.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        url: Url,
        form: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self
            .credentials
            .decorate(self.http.post(url).form(form))
            .send()
            .await?;
        transport::require_body(transport::classify(resp).await?)
    }

    /// PUT a JSON body.
    pub(crate) async fn put_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {url}");
        let resp = self
            .credentials
            .decorate(self.http.put(url).json(body))
            .send()
            .await?;
        transport::require_body(transport::classify(resp).await?)
    }

    /// DELETE an endpoint; 204 (or a 200 with a body) counts as success.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self
            .credentials
            .decorate(self.http.delete(url))
            .send()
            .await?;
        match transport::classify(resp).await? {
            Payload::Body(_) | Payload::Empty => Ok(()),
        }
    }
}
