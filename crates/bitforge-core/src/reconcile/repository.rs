// Repositories (modern surface), read through the workspace inventory.
//
// Reads resolve from the per-workspace cache, listing the workspace on
// first use. Every successful write is reflected into a warm cache
// before anything else can fail, and deletes always evict. The pipelines
// setting lives on a separate endpoint that answers 404 until pipelines
// were enabled once; that 404 means "disabled", not "absent".

use bitforge_api::modern_types::{ProjectRef, Repository as RemoteRepository, RepositoryWrite};
use tracing::debug;

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, IdScheme};

const FORK_POLICIES: [&str; 3] = ["allow_forks", "no_public_forks", "no_forks"];

pub(crate) struct Repository;

fn write_body(desired: &Descriptor) -> Result<RepositoryWrite, CoreError> {
    let fork_policy = desired.str_or("fork_policy", "no_forks")?;
    if !FORK_POLICIES.contains(&fork_policy) {
        return Err(CoreError::InvalidField {
            field: "fork_policy".into(),
            reason: format!("expected one of {}, got '{fork_policy}'", FORK_POLICIES.join(", ")),
        });
    }

    Ok(RepositoryWrite {
        scm: "git",
        description: desired.str_or("description", "")?.to_owned(),
        is_private: desired.bool_or("is_private", true)?,
        has_wiki: desired.bool_or("has_wiki", false)?,
        fork_policy: fork_policy.to_owned(),
        project: ProjectRef {
            key: required(desired, "project_key")?,
        },
    })
}

async fn sync_pipelines(
    ctx: &Context,
    desired: &Descriptor,
    workspace: &str,
    slug: &str,
) -> Result<(), CoreError> {
    let enabled = desired.bool_or("enable_pipelines", false)?;
    ctx.modern
        .update_pipelines_config(workspace, slug, enabled)
        .await
        .map(|_| ())
        .map_err(CoreError::api("configure pipelines for repository"))
}

async fn list(ctx: &Context, workspace: &str) -> Result<Vec<(String, RemoteRepository)>, bitforge_api::Error> {
    let repos = ctx.modern.list_repositories(workspace).await?;
    Ok(repos.into_iter().map(|r| (r.slug.clone(), r)).collect())
}

impl Reconcile for Repository {
    const KIND: ResourceKind = ResourceKind::Repository;
    const SCHEME: IdScheme = IdScheme::new("bitbucket_repository", &["workspace", "name"]);

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let slug = required(&desired, "name")?;
        let body = write_body(&desired)?;

        let repo = ctx
            .modern
            .create_repository(&workspace, &slug, &body)
            .await
            .map_err(CoreError::api("create repository"))?;

        desired.set_id(repo.uuid.clone());
        if ctx.repositories.put(&workspace, &slug, repo).await {
            debug!(%workspace, %slug, "inventory updated after create");
        }

        sync_pipelines(ctx, &desired, &workspace, &slug).await?;
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let slug = required(&desired, "name")?;

        let cached = ctx
            .repositories
            .get_or_warm(&workspace, &slug, || list(ctx, &workspace))
            .await
            .map_err(CoreError::api("list repositories"))?;
        let Some(repo) = cached else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        let pipelines = found(ctx.modern.get_pipelines_config(&workspace, &slug).await)
            .map_err(CoreError::api("read pipelines config for repository"))?;

        desired.set_id(repo.uuid);
        desired.set("description", repo.description);
        desired.set("is_private", repo.is_private);
        desired.set("has_wiki", repo.has_wiki);
        desired.set("fork_policy", repo.fork_policy);
        if let Some(project) = repo.project {
            desired.set("project_key", project.key);
        }
        desired.set("enable_pipelines", pipelines.is_some_and(|p| p.enabled));
        Ok(ReadOutcome::Present(desired))
    }

    async fn update(ctx: &Context, desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let slug = required(&desired, "name")?;
        let body = write_body(&desired)?;

        let repo = ctx
            .modern
            .update_repository(&workspace, &slug, &body)
            .await
            .map_err(CoreError::api("update repository"))?;

        if ctx.repositories.put(&workspace, &slug, repo).await {
            debug!(%workspace, %slug, "inventory updated after update");
        }

        sync_pipelines(ctx, &desired, &workspace, &slug).await?;
        Ok(desired)
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        let workspace = desired.require_str("workspace")?;
        let slug = desired.require_str("name")?;

        let result = ctx.modern.delete_repository(workspace, slug).await;
        let gone = match &result {
            Ok(()) => true,
            Err(err) => err.is_not_found(),
        };
        if gone {
            ctx.repositories.remove(workspace, slug).await;
        }
        result.map_err(CoreError::api("delete repository"))
    }
}
