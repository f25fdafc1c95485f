// The pipelines SSH key pair of a repository (modern surface).
//
// One per repository, so the stored id is just `workspace-repository`.
// The private half is write-only and stays as configured.

use bitforge_api::modern_types::PipelineKeyPairWrite;

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, IdScheme};

pub(crate) struct PipelineKeyPair;

impl Reconcile for PipelineKeyPair {
    const KIND: ResourceKind = ResourceKind::PipelineKeyPair;
    const SCHEME: IdScheme =
        IdScheme::new("bitbucket_pipeline_key_pair", &["workspace", "repository"]);

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let body = PipelineKeyPairWrite {
            private_key: required(&desired, "private_key")?,
            public_key: required(&desired, "public_key")?,
        };

        ctx.modern
            .put_pipeline_key_pair(&workspace, &repository, &body)
            .await
            .map_err(CoreError::api("create pipeline key pair"))?;

        desired.set_id(Self::SCHEME.stored_id(&[workspace.as_str(), repository.as_str()]));
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;

        let Some(pair) = found(
            ctx.modern
                .get_pipeline_key_pair(&workspace, &repository)
                .await,
        )
        .map_err(CoreError::api("read pipeline key pair"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        desired.set_id(Self::SCHEME.stored_id(&[workspace.as_str(), repository.as_str()]));
        desired.set("public_key", pair.public_key);
        Ok(ReadOutcome::Present(desired))
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_pipeline_key_pair(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
            )
            .await
            .map_err(CoreError::api("delete pipeline key pair"))
    }
}
