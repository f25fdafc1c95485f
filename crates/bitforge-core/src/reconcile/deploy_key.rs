// Repository deploy keys (modern surface).
//
// The remote strips the comment off the submitted key; reads glue it
// back on so the stored key matches what was configured.

use bitforge_api::modern_types::DeployKeyWrite;

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, ID_FIELD, IdScheme};

pub(crate) struct DeployKey;

impl Reconcile for DeployKey {
    const KIND: ResourceKind = ResourceKind::DeployKey;
    const SCHEME: IdScheme =
        IdScheme::new("bitbucket_deploy_key", &["workspace", "repository", ID_FIELD]);

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let body = DeployKeyWrite {
            key: required(&desired, "key")?,
            label: desired.str_or("label", "")?.to_owned(),
        };

        let key = ctx
            .modern
            .create_deploy_key(&workspace, &repository, &body)
            .await
            .map_err(CoreError::api("create deploy key"))?;

        desired.set_id(key.id.to_string());
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let id = required(&desired, ID_FIELD)?;

        let Some(key) = found(ctx.modern.get_deploy_key(&workspace, &repository, &id).await)
            .map_err(CoreError::api("read deploy key"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        desired.set("key", key.full_key());
        desired.set_id(key.id.to_string());
        desired.set("label", key.label);
        Ok(ReadOutcome::Present(desired))
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_deploy_key(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str(ID_FIELD)?,
            )
            .await
            .map_err(CoreError::api("delete deploy key"))
    }
}
