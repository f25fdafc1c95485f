// Pipelines variable and SSH key pair endpoints
//
// Both live under `repositories/{workspace}/{repo}/pipelines_config`.
// A repository has at most one key pair, so it has no identifier of its own.

use tracing::debug;
use url::Url;

use super::types::{PipelineKeyPair, PipelineKeyPairWrite, Variable, VariableWrite};
use crate::error::Error;
use crate::modern::client::ModernClient;

impl ModernClient {
    fn pipelines_url(&self, workspace: &str, repo: &str, tail: &[&str]) -> Result<Url, Error> {
        let mut segments = vec!["repositories", workspace, repo, "pipelines_config"];
        segments.extend_from_slice(tail);
        self.url(&segments)
    }

    // ── Variables ────────────────────────────────────────────────────

    /// `GET …/pipelines_config/variables/{uuid}`
    pub async fn get_pipeline_variable(
        &self,
        workspace: &str,
        repo: &str,
        uuid: &str,
    ) -> Result<Variable, Error> {
        let url = self.pipelines_url(workspace, repo, &["variables", uuid])?;
        self.get(url).await
    }

    /// `POST …/pipelines_config/variables`
    pub async fn create_pipeline_variable(
        &self,
        workspace: &str,
        repo: &str,
        body: &VariableWrite,
    ) -> Result<Variable, Error> {
        debug!(workspace, repo, key = %body.key, "creating pipeline variable");
        let url = self.pipelines_url(workspace, repo, &["variables"])?;
        self.post(url, body).await
    }

    /// `PUT …/pipelines_config/variables/{uuid}`
    pub async fn update_pipeline_variable(
        &self,
        workspace: &str,
        repo: &str,
        uuid: &str,
        body: &VariableWrite,
    ) -> Result<Variable, Error> {
        debug!(workspace, repo, uuid, "updating pipeline variable");
        let url = self.pipelines_url(workspace, repo, &["variables", uuid])?;
        self.put(url, body).await
    }

    /// `DELETE …/pipelines_config/variables/{uuid}`
    pub async fn delete_pipeline_variable(
        &self,
        workspace: &str,
        repo: &str,
        uuid: &str,
    ) -> Result<(), Error> {
        debug!(workspace, repo, uuid, "deleting pipeline variable");
        let url = self.pipelines_url(workspace, repo, &["variables", uuid])?;
        self.delete(url).await
    }

    // ── SSH key pair ─────────────────────────────────────────────────

    /// `GET …/pipelines_config/ssh/key_pair`
    ///
    /// 404 when the repository has no key pair.
    pub async fn get_pipeline_key_pair(
        &self,
        workspace: &str,
        repo: &str,
    ) -> Result<PipelineKeyPair, Error> {
        let url = self.pipelines_url(workspace, repo, &["ssh", "key_pair"])?;
        self.get(url).await
    }

    /// `PUT …/pipelines_config/ssh/key_pair`, replacing any existing pair.
    pub async fn put_pipeline_key_pair(
        &self,
        workspace: &str,
        repo: &str,
        body: &PipelineKeyPairWrite,
    ) -> Result<PipelineKeyPair, Error> {
        debug!(workspace, repo, "installing pipeline key pair");
        let url = self.pipelines_url(workspace, repo, &["ssh", "key_pair"])?;
        self.put(url, body).await
    }

    /// `DELETE …/pipelines_config/ssh/key_pair`
    pub async fn delete_pipeline_key_pair(&self, workspace: &str, repo: &str) -> Result<(), Error> {
        debug!(workspace, repo, "removing pipeline key pair");
        let url = self.pipelines_url(workspace, repo, &["ssh", "key_pair"])?;
        self.delete(url).await
    }
}
