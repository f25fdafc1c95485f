// Legacy API group endpoints
//
// Groups live under `groups/{workspace}` on the 1.0 surface. Creation
// only accepts a form-encoded name; everything else is applied by a
// follow-up update carrying the full desired state.

use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::{Group, GroupUpdate, Permission};

impl LegacyClient {
    /// Fetch a single group by workspace and slug.
    ///
    /// `GET groups?group={workspace}/{slug}`. The endpoint answers with an
    /// array; an empty one surfaces as [`Error::NotFound`].
    pub async fn get_group(&self, workspace: &str, slug: &str) -> Result<Group, Error> {
        let mut url = self.url(&["groups"])?;
        url.query_pairs_mut()
            .append_pair("group", &format!("{workspace}/{slug}"));
        self.get_one(url).await
    }

    /// List all groups in a workspace.
    ///
    /// `GET groups/{workspace}`
    pub async fn list_groups(&self, workspace: &str) -> Result<Vec<Group>, Error> {
        let url = self.url(&["groups", workspace])?;
        self.get_array(url).await
    }

    /// Create a group with just a name; the server derives the slug.
    ///
    /// `POST groups/{workspace}` with form body `name=...`
    pub async fn create_group(&self, workspace: &str, name: &str) -> Result<Group, Error> {
        debug!(workspace, name, "creating group");
        let url = self.url(&["groups", workspace])?;
        self.post_form(url, &[("name", name)]).await
    }

    /// Replace a group's mutable attributes.
    ///
    /// `PUT groups/{workspace}/{slug}`
    pub async fn update_group(
        &self,
        workspace: &str,
        slug: &str,
        name: &str,
        auto_add: bool,
        permission: Permission,
    ) -> Result<Group, Error> {
        debug!(workspace, slug, %permission, auto_add, "updating group");
        let url = self.url(&["groups", workspace, slug])?;
        let body = GroupUpdate {
            name,
            auto_add,
            permission,
        };
        self.put_json(url, &body).await
    }

    /// Delete a group.
    ///
    /// `DELETE groups/{workspace}/{slug}`
    pub async fn delete_group(&self, workspace: &str, slug: &str) -> Result<(), Error> {
        debug!(workspace, slug, "deleting group");
        let url = self.url(&["groups", workspace, slug])?;
        self.delete(url).await
    }
}
