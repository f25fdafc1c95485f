// Group membership (legacy surface).
//
// There is no single-member endpoint: reads list the group's members
// and match the user UUID case-insensitively. A missing group means the
// membership is absent too.

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, IdScheme};

pub(crate) struct GroupMember;

impl Reconcile for GroupMember {
    const KIND: ResourceKind = ResourceKind::GroupMember;
    const SCHEME: IdScheme =
        IdScheme::new("bitbucket_group_member", &["workspace", "group", "user"]);

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let group = required(&desired, "group")?;
        let user = required(&desired, "user")?;

        ctx.legacy
            .add_group_member(&workspace, &group, &user)
            .await
            .map_err(CoreError::api("add group member"))?;

        let id = Self::SCHEME.stored_id(&[workspace.as_str(), group.as_str(), user.as_str()]);
        desired.set_id(id);
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let group = required(&desired, "group")?;
        let user = required(&desired, "user")?;

        let members = found(ctx.legacy.list_group_members(&workspace, &group).await)
            .map_err(CoreError::api("read group members"))?
            .unwrap_or_default();

        if !members.iter().any(|m| m.uuid.eq_ignore_ascii_case(&user)) {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        }

        let id = Self::SCHEME.stored_id(&[workspace.as_str(), group.as_str(), user.as_str()]);
        desired.set_id(id);
        Ok(ReadOutcome::Present(desired))
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.legacy
            .remove_group_member(
                desired.require_str("workspace")?,
                desired.require_str("group")?,
                desired.require_str("user")?,
            )
            .await
            .map_err(CoreError::api("remove group member"))
    }
}
