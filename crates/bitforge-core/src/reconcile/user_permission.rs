// Repository permissions granted to individual users (modern surface).
//
// Same shape as group permissions, keyed by user UUID or account id.

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, granted, required};
use crate::error::CoreError;
use crate::model::{Descriptor, IdScheme};

pub(crate) struct UserPermission;

async fn put(ctx: &Context, desired: &Descriptor, operation: &str) -> Result<(), CoreError> {
    let permission = granted(desired)?;
    ctx.modern
        .put_user_permission(
            desired.require_str("workspace")?,
            desired.require_str("repository")?,
            desired.require_str("user")?,
            permission.as_str(),
        )
        .await
        .map(|_| ())
        .map_err(CoreError::api(operation))
}

impl Reconcile for UserPermission {
    const KIND: ResourceKind = ResourceKind::UserPermission;
    const SCHEME: IdScheme = IdScheme::new(
        "bitbucket_user_permission",
        &["workspace", "repository", "user"],
    );

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        put(ctx, &desired, "create user permission").await?;
        let id = Self::SCHEME.stored_id(&[
            desired.require_str("workspace")?,
            desired.require_str("repository")?,
            desired.require_str("user")?,
        ]);
        desired.set_id(id);
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let user = required(&desired, "user")?;

        let Some(grant) = found(
            ctx.modern
                .get_user_permission(&workspace, &repository, &user)
                .await,
        )
        .map_err(CoreError::api("read user permission"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        desired.set_id(Self::SCHEME.stored_id(&[
            workspace.as_str(),
            repository.as_str(),
            grant.user.uuid.as_str(),
        ]));
        desired.set("user", grant.user.uuid);
        desired.set("permission", grant.permission);
        Ok(ReadOutcome::Present(desired))
    }

    async fn update(ctx: &Context, desired: Descriptor) -> Result<Descriptor, CoreError> {
        put(ctx, &desired, "update user permission").await?;
        Ok(desired)
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_user_permission(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str("user")?,
            )
            .await
            .map_err(CoreError::api("delete user permission"))
    }
}
