// Workspace groups (legacy surface).
//
// The create endpoint accepts only a name, so create is followed by a
// full update before the closing read. The stored id is
// `<owner>-<slug>`, where owner is the workspace UUID reported by the
// remote, falling back to the workspace as configured.

use bitforge_api::Permission;

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, IdScheme};

pub(crate) struct Group;

fn permission(desired: &Descriptor) -> Result<Permission, CoreError> {
    desired
        .str_or("permission", "none")?
        .parse()
        .map_err(|e: bitforge_api::UnknownPermission| CoreError::InvalidField {
            field: "permission".into(),
            reason: e.to_string(),
        })
}

impl Reconcile for Group {
    const KIND: ResourceKind = ResourceKind::Group;
    const SCHEME: IdScheme = IdScheme::new("bitbucket_group", &["workspace", "slug"]);

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let name = required(&desired, "name")?;

        let group = ctx
            .legacy
            .create_group(&workspace, &name)
            .await
            .map_err(CoreError::api("create group"))?;

        let owner = group.owner_uuid().unwrap_or(&workspace);
        desired.set_id(Self::SCHEME.stored_id(&[owner, group.slug.as_str()]));
        desired.set("slug", group.slug);

        Self::update(ctx, desired).await
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let slug = required(&desired, "slug")?;

        let Some(group) = found(ctx.legacy.get_group(&workspace, &slug).await)
            .map_err(CoreError::api("read group"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        let owner = group.owner_uuid().unwrap_or(&workspace);
        desired.set_id(Self::SCHEME.stored_id(&[owner, group.slug.as_str()]));
        desired.set("name", group.name);
        desired.set("slug", group.slug);
        desired.set("auto_add", group.auto_add);
        desired.set("permission", group.permission.as_str());
        Ok(ReadOutcome::Present(desired))
    }

    async fn update(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let slug = required(&desired, "slug")?;
        let name = required(&desired, "name")?;
        let auto_add = desired.bool_or("auto_add", false)?;
        let permission = permission(&desired)?;

        let group = ctx
            .legacy
            .update_group(&workspace, &slug, &name, auto_add, permission)
            .await
            .map_err(CoreError::api("update group"))?;

        desired.set("slug", group.slug);
        Ok(desired)
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        let workspace = desired.require_str("workspace")?;
        let slug = desired.require_str("slug")?;
        ctx.legacy
            .delete_group(workspace, slug)
            .await
            .map_err(CoreError::api("delete group"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn permission_defaults_to_none() {
        let d = Descriptor::new();
        assert_eq!(permission(&d).unwrap(), Permission::None);
    }

    #[test]
    fn unknown_permission_is_invalid_field() {
        let d = Descriptor::new().with("permission", "owner");
        assert!(matches!(
            permission(&d),
            Err(CoreError::InvalidField { field, .. }) if field == "permission"
        ));
    }
}
