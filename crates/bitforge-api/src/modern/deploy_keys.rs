// Repository deploy key endpoints

use tracing::debug;

use super::types::{DeployKey, DeployKeyWrite};
use crate::error::Error;
use crate::modern::client::ModernClient;

impl ModernClient {
    /// `GET repositories/{workspace}/{repo}/deploy-keys/{id}`
    pub async fn get_deploy_key(
        &self,
        workspace: &str,
        repo: &str,
        id: &str,
    ) -> Result<DeployKey, Error> {
        let url = self.url(&["repositories", workspace, repo, "deploy-keys", id])?;
        self.get(url).await
    }

    /// `POST repositories/{workspace}/{repo}/deploy-keys`
    pub async fn create_deploy_key(
        &self,
        workspace: &str,
        repo: &str,
        body: &DeployKeyWrite,
    ) -> Result<DeployKey, Error> {
        debug!(workspace, repo, label = %body.label, "adding deploy key");
        let url = self.url(&["repositories", workspace, repo, "deploy-keys"])?;
        self.post(url, body).await
    }

    /// `DELETE repositories/{workspace}/{repo}/deploy-keys/{id}`
    pub async fn delete_deploy_key(&self, workspace: &str, repo: &str, id: &str) -> Result<(), Error> {
        debug!(workspace, repo, id, "removing deploy key");
        let url = self.url(&["repositories", workspace, repo, "deploy-keys", id])?;
        self.delete(url).await
    }
}
