// Legacy API group-member endpoints

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::GroupMember;

impl LegacyClient {
    /// List the members of a group.
    ///
    /// `GET groups/{workspace}/{slug}/members`. A missing group yields
    /// [`Error::NotFound`].
    pub async fn list_group_members(
        &self,
        workspace: &str,
        slug: &str,
    ) -> Result<Vec<GroupMember>, Error> {
        let url = self.url(&["groups", workspace, slug, "members"])?;
        self.get_array(url).await
    }

    /// Add a user to a group.
    ///
    /// `PUT groups/{workspace}/{slug}/members/{user}` with an empty JSON object.
    pub async fn add_group_member(
        &self,
        workspace: &str,
        slug: &str,
        user: &str,
    ) -> Result<GroupMember, Error> {
        debug!(workspace, slug, user, "adding group member");
        let url = self.url(&["groups", workspace, slug, "members", user])?;
        self.put_json(url, &json!({})).await
    }

    /// Remove a user from a group.
    ///
    /// `DELETE groups/{workspace}/{slug}/members/{user}`
    pub async fn remove_group_member(
        &self,
        workspace: &str,
        slug: &str,
        user: &str,
    ) -> Result<(), Error> {
        debug!(workspace, slug, user, "removing group member");
        let url = self.url(&["groups", workspace, slug, "members", user])?;
        self.delete(url).await
    }
}
