// Repository permission endpoints for groups and individual users

use serde::Serialize;
use tracing::debug;

use super::types::{GroupPermission, UserPermission};
use crate::error::Error;
use crate::modern::client::ModernClient;

#[derive(Serialize)]
struct PermissionBody<'a> {
    permission: &'a str,
}

impl ModernClient {
    // ── Groups ───────────────────────────────────────────────────────

    /// `GET repositories/{workspace}/{repo}/permissions-config/groups/{group}`
    pub async fn get_group_permission(
        &self,
        workspace: &str,
        repo: &str,
        group: &str,
    ) -> Result<GroupPermission, Error> {
        let url = self.url(&[
            "repositories",
            workspace,
            repo,
            "permissions-config",
            "groups",
            group,
        ])?;
        self.get(url).await
    }

    /// Grant or change a group's permission on a repository.
    ///
    /// `PUT repositories/{workspace}/{repo}/permissions-config/groups/{group}`
    pub async fn put_group_permission(
        &self,
        workspace: &str,
        repo: &str,
        group: &str,
        permission: &str,
    ) -> Result<GroupPermission, Error> {
        debug!(workspace, repo, group, permission, "setting group permission");
        let url = self.url(&[
            "repositories",
            workspace,
            repo,
            "permissions-config",
            "groups",
            group,
        ])?;
        self.put(url, &PermissionBody { permission }).await
    }

    /// `DELETE repositories/{workspace}/{repo}/permissions-config/groups/{group}`
    pub async fn delete_group_permission(
        &self,
        workspace: &str,
        repo: &str,
        group: &str,
    ) -> Result<(), Error> {
        debug!(workspace, repo, group, "revoking group permission");
        let url = self.url(&[
            "repositories",
            workspace,
            repo,
            "permissions-config",
            "groups",
            group,
        ])?;
        self.delete(url).await
    }

    // ── Users ────────────────────────────────────────────────────────

    /// `GET repositories/{workspace}/{repo}/permissions-config/users/{user}`
    pub async fn get_user_permission(
        &self,
        workspace: &str,
        repo: &str,
        user: &str,
    ) -> Result<UserPermission, Error> {
        let url = self.url(&[
            "repositories",
            workspace,
            repo,
            "permissions-config",
            "users",
            user,
        ])?;
        self.get(url).await
    }

    /// Grant or change a user's permission on a repository.
    ///
    /// `PUT repositories/{workspace}/{repo}/permissions-config/users/{user}`
    pub async fn put_user_permission(
        &self,
        workspace: &str,
        repo: &str,
        user: &str,
        permission: &str,
    ) -> Result<UserPermission, Error> {
        debug!(workspace, repo, user, permission, "setting user permission");
        let url = self.url(&[
            "repositories",
            workspace,
            repo,
            "permissions-config",
            "users",
            user,
        ])?;
        self.put(url, &PermissionBody { permission }).await
    }

    /// `DELETE repositories/{workspace}/{repo}/permissions-config/users/{user}`
    pub async fn delete_user_permission(
        &self,
        workspace: &str,
        repo: &str,
        user: &str,
    ) -> Result<(), Error> {
        debug!(workspace, repo, user, "revoking user permission");
        let url = self.url(&[
            "repositories",
            workspace,
            repo,
            "permissions-config",
            "users",
            user,
        ])?;
        self.delete(url).await
    }
}
