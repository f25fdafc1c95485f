// Workspace project endpoints

use tracing::debug;

use super::types::{Project, ProjectWrite};
use crate::error::Error;
use crate::modern::client::ModernClient;

impl ModernClient {
    /// `GET workspaces/{workspace}/projects/{key}`
    pub async fn get_project(&self, workspace: &str, key: &str) -> Result<Project, Error> {
        let url = self.url(&["workspaces", workspace, "projects", key])?;
        self.get(url).await
    }

    /// `POST workspaces/{workspace}/projects`
    pub async fn create_project(
        &self,
        workspace: &str,
        body: &ProjectWrite,
    ) -> Result<Project, Error> {
        debug!(workspace, key = %body.key, "creating project");
        let url = self.url(&["workspaces", workspace, "projects"])?;
        self.post(url, body).await
    }

    /// `PUT workspaces/{workspace}/projects/{key}`
    pub async fn update_project(
        &self,
        workspace: &str,
        key: &str,
        body: &ProjectWrite,
    ) -> Result<Project, Error> {
        debug!(workspace, key, "updating project");
        let url = self.url(&["workspaces", workspace, "projects", key])?;
        self.put(url, body).await
    }

    /// `DELETE workspaces/{workspace}/projects/{key}`
    pub async fn delete_project(&self, workspace: &str, key: &str) -> Result<(), Error> {
        debug!(workspace, key, "deleting project");
        let url = self.url(&["workspaces", workspace, "projects", key])?;
        self.delete(url).await
    }
}
