// Deployment environment and environment variable endpoints
//
// The remote offers no single-variable GET; reads list the environment
// and pick the entry out client-side.

use tracing::debug;
use url::Url;

use super::types::{Environment, EnvironmentWrite, Variable, VariableWrite};
use crate::error::Error;
use crate::modern::client::ModernClient;

impl ModernClient {
    // ── Environments ─────────────────────────────────────────────────

    /// `GET repositories/{workspace}/{repo}/environments/{uuid}`
    pub async fn get_environment(
        &self,
        workspace: &str,
        repo: &str,
        uuid: &str,
    ) -> Result<Environment, Error> {
        let url = self.url(&["repositories", workspace, repo, "environments", uuid])?;
        self.get(url).await
    }

    /// `POST repositories/{workspace}/{repo}/environments`
    pub async fn create_environment(
        &self,
        workspace: &str,
        repo: &str,
        body: &EnvironmentWrite,
    ) -> Result<Environment, Error> {
        debug!(workspace, repo, name = %body.name, "creating deployment environment");
        let url = self.url(&["repositories", workspace, repo, "environments"])?;
        self.post(url, body).await
    }

    /// `DELETE repositories/{workspace}/{repo}/environments/{uuid}`
    pub async fn delete_environment(
        &self,
        workspace: &str,
        repo: &str,
        uuid: &str,
    ) -> Result<(), Error> {
        debug!(workspace, repo, uuid, "deleting deployment environment");
        let url = self.url(&["repositories", workspace, repo, "environments", uuid])?;
        self.delete(url).await
    }

    // ── Environment variables ────────────────────────────────────────

    /// `repositories/{workspace}/{repo}/deployments_config/environments/{env}/variables[/{uuid}]`
    fn variables_url(
        &self,
        workspace: &str,
        repo: &str,
        environment: &str,
        uuid: Option<&str>,
    ) -> Result<Url, Error> {
        let mut segments = vec![
            "repositories",
            workspace,
            repo,
            "deployments_config",
            "environments",
            environment,
            "variables",
        ];
        segments.extend(uuid);
        self.url(&segments)
    }

    /// List the variables of one deployment environment.
    pub async fn list_deployment_variables(
        &self,
        workspace: &str,
        repo: &str,
        environment: &str,
    ) -> Result<Vec<Variable>, Error> {
        let url = self.variables_url(workspace, repo, environment, None)?;
        self.list_all(url).await
    }

    pub async fn create_deployment_variable(
        &self,
        workspace: &str,
        repo: &str,
        environment: &str,
        body: &VariableWrite,
    ) -> Result<Variable, Error> {
        debug!(workspace, repo, environment, key = %body.key, "creating deployment variable");
        let url = self.variables_url(workspace, repo, environment, None)?;
        self.post(url, body).await
    }

    pub async fn update_deployment_variable(
        &self,
        workspace: &str,
        repo: &str,
        environment: &str,
        uuid: &str,
        body: &VariableWrite,
    ) -> Result<Variable, Error> {
        debug!(workspace, repo, environment, uuid, "updating deployment variable");
        let url = self.variables_url(workspace, repo, environment, Some(uuid))?;
        self.put(url, body).await
    }

    pub async fn delete_deployment_variable(
        &self,
        workspace: &str,
        repo: &str,
        environment: &str,
        uuid: &str,
    ) -> Result<(), Error> {
        debug!(workspace, repo, environment, uuid, "deleting deployment variable");
        let url = self.variables_url(workspace, repo, environment, Some(uuid))?;
        self.delete(url).await
    }
}
