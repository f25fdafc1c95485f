// Repository and pipelines-config endpoints

use tracing::debug;

use super::types::{PipelinesConfig, Repository, RepositoryWrite};
use crate::error::Error;
use crate::modern::client::ModernClient;

impl ModernClient {
    /// List every repository in a workspace, following pagination.
    ///
    /// `GET repositories/{workspace}`
    pub async fn list_repositories(&self, workspace: &str) -> Result<Vec<Repository>, Error> {
        let url = self.url(&["repositories", workspace])?;
        self.list_all(url).await
    }

    /// `POST repositories/{workspace}/{slug}`
    pub async fn create_repository(
        &self,
        workspace: &str,
        slug: &str,
        body: &RepositoryWrite,
    ) -> Result<Repository, Error> {
        debug!(workspace, slug, "creating repository");
        let url = self.url(&["repositories", workspace, slug])?;
        self.post(url, body).await
    }

    /// `PUT repositories/{workspace}/{slug}`
    pub async fn update_repository(
        &self,
        workspace: &str,
        slug: &str,
        body: &RepositoryWrite,
    ) -> Result<Repository, Error> {
        debug!(workspace, slug, "updating repository");
        let url = self.url(&["repositories", workspace, slug])?;
        self.put(url, body).await
    }

    /// `DELETE repositories/{workspace}/{slug}`
    pub async fn delete_repository(&self, workspace: &str, slug: &str) -> Result<(), Error> {
        debug!(workspace, slug, "deleting repository");
        let url = self.url(&["repositories", workspace, slug])?;
        self.delete(url).await
    }

    /// `GET repositories/{workspace}/{slug}/pipelines_config`
    ///
    /// Repositories that never had pipelines enabled answer 404 here.
    pub async fn get_pipelines_config(
        &self,
        workspace: &str,
        slug: &str,
    ) -> Result<PipelinesConfig, Error> {
        let url = self.url(&["repositories", workspace, slug, "pipelines_config"])?;
        self.get(url).await
    }

    /// `PUT repositories/{workspace}/{slug}/pipelines_config`
    pub async fn update_pipelines_config(
        &self,
        workspace: &str,
        slug: &str,
        enabled: bool,
    ) -> Result<PipelinesConfig, Error> {
        debug!(workspace, slug, enabled, "updating pipelines config");
        let url = self.url(&["repositories", workspace, slug, "pipelines_config"])?;
        self.put(url, &PipelinesConfig { enabled }).await
    }
}
