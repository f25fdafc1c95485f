// Deployment environment variables (modern surface).
//
// The remote has no single-variable GET: reads list the environment and
// match by UUID, or by key while the UUID is still unknown. Secured
// values are never returned, so the desired value is kept for them.

use bitforge_api::modern_types::Variable as RemoteVariable;

use super::{
    Context, ReadOutcome, Reconcile, ResourceKind, apply_variable, found, required, variable_body,
};
use crate::error::CoreError;
use crate::model::{Descriptor, ID_FIELD, IdScheme};

pub(crate) struct DeploymentVariable;

fn pick(variables: Vec<RemoteVariable>, desired: &Descriptor) -> Option<RemoteVariable> {
    match (desired.id(), desired.get_str("key")) {
        (Some(uuid), _) => variables.into_iter().find(|v| v.uuid == uuid),
        (None, Some(key)) => variables.into_iter().find(|v| v.key == key),
        (None, None) => None,
    }
}

impl Reconcile for DeploymentVariable {
    const KIND: ResourceKind = ResourceKind::DeploymentVariable;
    const SCHEME: IdScheme = IdScheme::new(
        "bitbucket_deployment_variable",
        &["workspace", "repository", "deployment", ID_FIELD],
    );

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let deployment = required(&desired, "deployment")?;
        let body = variable_body(&desired)?;

        let variable = ctx
            .modern
            .create_deployment_variable(&workspace, &repository, &deployment, &body)
            .await
            .map_err(CoreError::api("create deployment variable"))?;

        desired.set_id(variable.uuid);
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let deployment = required(&desired, "deployment")?;

        let variables = found(
            ctx.modern
                .list_deployment_variables(&workspace, &repository, &deployment)
                .await,
        )
        .map_err(CoreError::api("read deployment variables"))?
        .unwrap_or_default();

        let Some(variable) = pick(variables, &desired) else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        apply_variable(&mut desired, variable);
        Ok(ReadOutcome::Present(desired))
    }

    async fn update(ctx: &Context, desired: Descriptor) -> Result<Descriptor, CoreError> {
        let body = variable_body(&desired)?;
        ctx.modern
            .update_deployment_variable(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str("deployment")?,
                desired.require_str(ID_FIELD)?,
                &body,
            )
            .await
            .map_err(CoreError::api("update deployment variable"))?;
        Ok(desired)
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_deployment_variable(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str("deployment")?,
                desired.require_str(ID_FIELD)?,
            )
            .await
            .map_err(CoreError::api("delete deployment variable"))
    }
}
