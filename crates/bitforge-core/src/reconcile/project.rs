// Workspace projects (modern surface). Stored id is the project UUID.

use bitforge_api::modern_types::ProjectWrite;

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, IdScheme};

pub(crate) struct Project;

fn write_body(desired: &Descriptor) -> Result<ProjectWrite, CoreError> {
    Ok(ProjectWrite {
        name: required(desired, "name")?,
        key: required(desired, "key")?,
        description: desired.str_or("description", "")?.to_owned(),
        is_private: desired.bool_or("is_private", true)?,
    })
}

impl Reconcile for Project {
    const KIND: ResourceKind = ResourceKind::Project;
    const SCHEME: IdScheme = IdScheme::new("bitbucket_project", &["workspace", "key"]);

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let body = write_body(&desired)?;

        let project = ctx
            .modern
            .create_project(&workspace, &body)
            .await
            .map_err(CoreError::api("create project"))?;

        desired.set_id(project.uuid);
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let key = required(&desired, "key")?;

        let Some(project) = found(ctx.modern.get_project(&workspace, &key).await)
            .map_err(CoreError::api("read project"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        desired.set_id(project.uuid);
        desired.set("name", project.name);
        desired.set("key", project.key);
        desired.set("description", project.description);
        desired.set("is_private", project.is_private);
        Ok(ReadOutcome::Present(desired))
    }

    async fn update(ctx: &Context, desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let body = write_body(&desired)?;

        ctx.modern
            .update_project(&workspace, &body.key, &body)
            .await
            .map_err(CoreError::api("update project"))?;
        Ok(desired)
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_project(desired.require_str("workspace")?, desired.require_str("key")?)
            .await
            .map_err(CoreError::api("delete project"))
    }
}
