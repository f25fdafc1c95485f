// Deployment environments (modern surface).
//
// `environment` is one of Test, Staging or Production; the remote keeps
// it as a rank. Nothing is editable in place, so every change replaces
// the environment.

use bitforge_api::modern_types::{EnvironmentType, EnvironmentWrite};

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, ID_FIELD, IdScheme};

pub(crate) struct Deployment;

fn category(desired: &Descriptor) -> Result<EnvironmentType, CoreError> {
    let raw = desired.require_str("environment")?;
    EnvironmentType::from_name(raw).ok_or_else(|| CoreError::InvalidField {
        field: "environment".into(),
        reason: format!("expected Test, Staging or Production, got '{raw}'"),
    })
}

impl Reconcile for Deployment {
    const KIND: ResourceKind = ResourceKind::Deployment;
    const SCHEME: IdScheme =
        IdScheme::new("bitbucket_deployment", &["workspace", "repository", ID_FIELD]);

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let body = EnvironmentWrite::new(required(&desired, "name")?, category(&desired)?);

        let environment = ctx
            .modern
            .create_environment(&workspace, &repository, &body)
            .await
            .map_err(CoreError::api("create deployment"))?;

        desired.set_id(environment.uuid);
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let uuid = required(&desired, ID_FIELD)?;

        let Some(environment) = found(
            ctx.modern
                .get_environment(&workspace, &repository, &uuid)
                .await,
        )
        .map_err(CoreError::api("read deployment"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        if let Some(category) = environment.category() {
            desired.set("environment", category.as_str());
        }
        desired.set_id(environment.uuid);
        desired.set("name", environment.name);
        Ok(ReadOutcome::Present(desired))
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_environment(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str(ID_FIELD)?,
            )
            .await
            .map_err(CoreError::api("delete deployment"))
    }
}
