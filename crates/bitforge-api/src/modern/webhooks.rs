// Repository webhook endpoints

use tracing::debug;

use super::types::{Webhook, WebhookWrite};
use crate::error::Error;
use crate::modern::client::ModernClient;

impl ModernClient {
    /// `GET repositories/{workspace}/{repo}/hooks/{uuid}`
    pub async fn get_webhook(
        &self,
        workspace: &str,
        repo: &str,
        uuid: &str,
    ) -> Result<Webhook, Error> {
        let url = self.url(&["repositories", workspace, repo, "hooks", uuid])?;
        self.get(url).await
    }

    /// `POST repositories/{workspace}/{repo}/hooks`
    pub async fn create_webhook(
        &self,
        workspace: &str,
        repo: &str,
        body: &WebhookWrite,
    ) -> Result<Webhook, Error> {
        debug!(workspace, repo, url = %body.url, "creating webhook");
        let url = self.url(&["repositories", workspace, repo, "hooks"])?;
        self.post(url, body).await
    }

    /// `PUT repositories/{workspace}/{repo}/hooks/{uuid}`
    pub async fn update_webhook(
        &self,
        workspace: &str,
        repo: &str,
        uuid: &str,
        body: &WebhookWrite,
    ) -> Result<Webhook, Error> {
        debug!(workspace, repo, uuid, "updating webhook");
        let url = self.url(&["repositories", workspace, repo, "hooks", uuid])?;
        self.put(url, body).await
    }

    /// `DELETE repositories/{workspace}/{repo}/hooks/{uuid}`
    pub async fn delete_webhook(&self, workspace: &str, repo: &str, uuid: &str) -> Result<(), Error> {
        debug!(workspace, repo, uuid, "deleting webhook");
        let url = self.url(&["repositories", workspace, repo, "hooks", uuid])?;
        self.delete(url).await
    }
}
