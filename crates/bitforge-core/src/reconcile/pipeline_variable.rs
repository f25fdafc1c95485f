// Repository-level pipeline variables (modern surface).
//
// Unlike deployment variables these have a direct GET by UUID.

use super::{
    Context, ReadOutcome, Reconcile, ResourceKind, apply_variable, found, required, variable_body,
};
use crate::error::CoreError;
use crate::model::{Descriptor, ID_FIELD, IdScheme};

pub(crate) struct PipelineVariable;

impl Reconcile for PipelineVariable {
    const KIND: ResourceKind = ResourceKind::PipelineVariable;
    const SCHEME: IdScheme = IdScheme::new(
        "bitbucket_pipeline_variable",
        &["workspace", "repository", ID_FIELD],
    );

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let body = variable_body(&desired)?;

        let variable = ctx
            .modern
            .create_pipeline_variable(&workspace, &repository, &body)
            .await
            .map_err(CoreError::api("create pipeline variable"))?;

        desired.set_id(variable.uuid);
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let uuid = required(&desired, ID_FIELD)?;

        let Some(variable) = found(
            ctx.modern
                .get_pipeline_variable(&workspace, &repository, &uuid)
                .await,
        )
        .map_err(CoreError::api("read pipeline variable"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        apply_variable(&mut desired, variable);
        Ok(ReadOutcome::Present(desired))
    }

    async fn update(ctx: &Context, desired: Descriptor) -> Result<Descriptor, CoreError> {
        let body = variable_body(&desired)?;
        ctx.modern
            .update_pipeline_variable(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str(ID_FIELD)?,
                &body,
            )
            .await
            .map_err(CoreError::api("update pipeline variable"))?;
        Ok(desired)
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_pipeline_variable(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str(ID_FIELD)?,
            )
            .await
            .map_err(CoreError::api("delete pipeline variable"))
    }
}
