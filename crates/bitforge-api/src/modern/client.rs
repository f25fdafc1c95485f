// Modern API HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, credential
// decoration, status classification, and pagination over the 2.0
// surface's `{ values, next }` pages.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use super::types::Page;
use crate::auth::Credentials;
use crate::error::Error;
use crate::transport;

/// Page size requested for list endpoints.
const PAGE_LEN: &str = "100";

/// Raw HTTP client for the Bitbucket 2.0 API.
#[derive(Debug, Clone)]
pub struct ModernClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<Credentials>,
}

impl ModernClient {
    /// Create a modern client around a pre-built `reqwest::Client`.
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

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self
            .credentials
            .decorate(self.http.get(url))
            .send()
            .await?;
        transport::require_body(transport::classify(resp).await?)
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self
            .credentials
            .decorate(self.http.post(url).json(body))
            .send()
            .await?;
        transport::require_body(transport::classify(resp).await?)
    }

    pub(crate) async fn put<T: DeserializeOwned>(
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

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self
            .credentials
            .decorate(self.http.delete(url))
            .send()
            .await?;
        transport::classify(resp).await.map(|_| ())
    }

    /// Follow `next` links until the listing is exhausted.
    ///
    /// Credentials ride along on every page, so a link leaving the API
    /// origin is an error rather than a request.
    pub(crate) async fn list_all<T: DeserializeOwned>(&self, mut url: Url) -> Result<Vec<T>, Error> {
        url.query_pairs_mut().append_pair("pagelen", PAGE_LEN);

        let mut items = Vec::new();
        let mut next = Some(url);
        while let Some(page_url) = next.take() {
            let page: Page<T> = self.get(page_url).await?;
            trace!(count = page.values.len(), "page received");
            items.extend(page.values);
            next = page
                .next
                .as_deref()
                .map(|raw| self.same_origin(raw))
                .transpose()?;
        }
        Ok(items)
    }

    fn same_origin(&self, raw: &str) -> Result<Url, Error> {
        let url = Url::parse(raw)?;
        if url.origin() == self.base_url.origin() {
            Ok(url)
        } else {
            Err(Error::ForeignPageLink { url: raw.to_owned() })
        }
    }
}
