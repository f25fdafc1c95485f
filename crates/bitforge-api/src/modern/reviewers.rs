// Default reviewer endpoints

use tracing::debug;

use super::types::User;
use crate::error::Error;
use crate::modern::client::ModernClient;

impl ModernClient {
    /// `GET repositories/{workspace}/{repo}/default-reviewers/{user}`
    ///
    /// 404 when the user is not a default reviewer of the repository.
    pub async fn get_default_reviewer(
        &self,
        workspace: &str,
        repo: &str,
        user: &str,
    ) -> Result<User, Error> {
        let url = self.url(&["repositories", workspace, repo, "default-reviewers", user])?;
        self.get(url).await
    }

    /// `PUT repositories/{workspace}/{repo}/default-reviewers/{user}`
    pub async fn add_default_reviewer(
        &self,
        workspace: &str,
        repo: &str,
        user: &str,
    ) -> Result<User, Error> {
        debug!(workspace, repo, user, "adding default reviewer");
        let url = self.url(&["repositories", workspace, repo, "default-reviewers", user])?;
        self.put(url, &serde_json::json!({})).await
    }

    /// `DELETE repositories/{workspace}/{repo}/default-reviewers/{user}`
    pub async fn remove_default_reviewer(
        &self,
        workspace: &str,
        repo: &str,
        user: &str,
    ) -> Result<(), Error> {
        debug!(workspace, repo, user, "removing default reviewer");
        let url = self.url(&["repositories", workspace, repo, "default-reviewers", user])?;
        self.delete(url).await
    }
}
