// Branch restriction endpoints
//
// Restrictions carry a numeric id; it is passed around as the decimal
// string the descriptor stores.

use tracing::debug;

use super::types::{BranchRestriction, BranchRestrictionWrite};
use crate::error::Error;
use crate::modern::client::ModernClient;

impl ModernClient {
    /// `GET repositories/{workspace}/{repo}/branch-restrictions/{id}`
    pub async fn get_branch_restriction(
        &self,
        workspace: &str,
        repo: &str,
        id: &str,
    ) -> Result<BranchRestriction, Error> {
        let url = self.url(&["repositories", workspace, repo, "branch-restrictions", id])?;
        self.get(url).await
    }

    /// `POST repositories/{workspace}/{repo}/branch-restrictions`
    pub async fn create_branch_restriction(
        &self,
        workspace: &str,
        repo: &str,
        body: &BranchRestrictionWrite,
    ) -> Result<BranchRestriction, Error> {
        debug!(workspace, repo, kind = %body.kind, pattern = %body.pattern, "creating branch restriction");
        let url = self.url(&["repositories", workspace, repo, "branch-restrictions"])?;
        self.post(url, body).await
    }

    /// `PUT repositories/{workspace}/{repo}/branch-restrictions/{id}`
    pub async fn update_branch_restriction(
        &self,
        workspace: &str,
        repo: &str,
        id: &str,
        body: &BranchRestrictionWrite,
    ) -> Result<BranchRestriction, Error> {
        debug!(workspace, repo, id, "updating branch restriction");
        let url = self.url(&["repositories", workspace, repo, "branch-restrictions", id])?;
        self.put(url, body).await
    }

    /// `DELETE repositories/{workspace}/{repo}/branch-restrictions/{id}`
    pub async fn delete_branch_restriction(
        &self,
        workspace: &str,
        repo: &str,
        id: &str,
    ) -> Result<(), Error> {
        debug!(workspace, repo, id, "deleting branch restriction");
        let url = self.url(&["repositories", workspace, repo, "branch-restrictions", id])?;
        self.delete(url).await
    }
}
