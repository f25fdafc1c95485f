// Repository permissions granted to workspace groups (modern surface).
//
// Create and update are the same idempotent PUT.

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, granted, required};
use crate::error::CoreError;
use crate::model::{Descriptor, IdScheme};

pub(crate) struct GroupPermission;

async fn put(ctx: &Context, desired: &Descriptor, operation: &str) -> Result<(), CoreError> {
    let permission = granted(desired)?;
    ctx.modern
        .put_group_permission(
            desired.require_str("workspace")?,
            desired.require_str("repository")?,
            desired.require_str("group")?,
            permission.as_str(),
        )
        .await
        .map(|_| ())
        .map_err(CoreError::api(operation))
}

impl Reconcile for GroupPermission {
    const KIND: ResourceKind = ResourceKind::GroupPermission;
    const SCHEME: IdScheme = IdScheme::new(
        "bitbucket_group_permission",
        &["workspace", "repository", "group"],
    );

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        put(ctx, &desired, "create group permission").await?;
        let id = Self::SCHEME.stored_id(&[
            desired.require_str("workspace")?,
            desired.require_str("repository")?,
            desired.require_str("group")?,
        ]);
        desired.set_id(id);
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let group = required(&desired, "group")?;

        let Some(grant) = found(
            ctx.modern
                .get_group_permission(&workspace, &repository, &group)
                .await,
        )
        .map_err(CoreError::api("read group permission"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        desired.set_id(Self::SCHEME.stored_id(&[
            workspace.as_str(),
            repository.as_str(),
            grant.group.slug.as_str(),
        ]));
        desired.set("group", grant.group.slug);
        desired.set("permission", grant.permission);
        Ok(ReadOutcome::Present(desired))
    }

    async fn update(ctx: &Context, desired: Descriptor) -> Result<Descriptor, CoreError> {
        put(ctx, &desired, "update group permission").await?;
        Ok(desired)
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_group_permission(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str("group")?,
            )
            .await
            .map_err(CoreError::api("delete group permission"))
    }
}
