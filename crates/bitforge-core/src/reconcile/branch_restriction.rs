// Branch restrictions (modern surface).
//
// The remote id is numeric; the descriptor stores its decimal form.
// `value` only applies to count-based kinds and is omitted when zero.

use bitforge_api::modern_types::{BranchRestrictionWrite, GroupSlug, UserRef};

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, ID_FIELD, IdScheme};

pub(crate) struct BranchRestriction;

const KINDS: &[&str] = &[
    "require_tasks_to_be_completed",
    "allow_auto_merge_when_builds_pass",
    "require_passing_builds_to_merge",
    "force",
    "require_all_dependencies_merged",
    "require_commits_behind",
    "restrict_merges",
    "enforce_merge_checks",
    "reset_pullrequest_changes_requested_on_change",
    "require_no_changes_requested",
    "smart_reset_pullrequest_approvals",
    "push",
    "require_approvals_to_merge",
    "require_default_reviewer_approvals_to_merge",
    "reset_pullrequest_approvals_on_change",
    "delete",
];

fn write_body(desired: &Descriptor) -> Result<BranchRestrictionWrite, CoreError> {
    let kind = required(desired, "kind")?;
    if !KINDS.contains(&kind.as_str()) {
        return Err(CoreError::InvalidField {
            field: "kind".into(),
            reason: format!("unknown restriction kind '{kind}'"),
        });
    }

    let value = desired.u64_or("value", 0)?;
    Ok(BranchRestrictionWrite {
        kind,
        branch_match_kind: "glob",
        pattern: required(desired, "pattern")?,
        value: (value > 0).then_some(value),
        users: desired
            .string_list("users")?
            .iter()
            .map(|user| UserRef::parse(user))
            .collect(),
        groups: desired
            .string_list("groups")?
            .into_iter()
            .map(|slug| GroupSlug { slug })
            .collect(),
    })
}

impl Reconcile for BranchRestriction {
    const KIND: ResourceKind = ResourceKind::BranchRestriction;
    const SCHEME: IdScheme = IdScheme::new(
        "bitbucket_branch_restriction",
        &["workspace", "repository", ID_FIELD],
    );

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let body = write_body(&desired)?;

        let restriction = ctx
            .modern
            .create_branch_restriction(&workspace, &repository, &body)
            .await
            .map_err(CoreError::api("create branch restriction"))?;

        desired.set_id(restriction.id.to_string());
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let id = required(&desired, ID_FIELD)?;

        let Some(restriction) = found(
            ctx.modern
                .get_branch_restriction(&workspace, &repository, &id)
                .await,
        )
        .map_err(CoreError::api("read branch restriction"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        desired.set_id(restriction.id.to_string());
        desired.set("kind", restriction.kind);
        desired.set("pattern", restriction.pattern);
        desired.set("value", restriction.value.unwrap_or_default());
        Ok(ReadOutcome::Present(desired))
    }

    async fn update(ctx: &Context, desired: Descriptor) -> Result<Descriptor, CoreError> {
        let body = write_body(&desired)?;
        ctx.modern
            .update_branch_restriction(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str(ID_FIELD)?,
                &body,
            )
            .await
            .map_err(CoreError::api("update branch restriction"))?;
        Ok(desired)
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_branch_restriction(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str(ID_FIELD)?,
            )
            .await
            .map_err(CoreError::api("delete branch restriction"))
    }
}
