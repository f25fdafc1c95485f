// ── Resource reconciler ──
//
// Each resource family implements `Reconcile` with its raw remote calls.
// The verbs below compose them into the lifecycle the host runtime sees:
// every mutating verb ends with an independent read, delete treats
// absence as success, and import is decode-then-read.

mod branch_restriction;
mod default_reviewer;
mod deploy_key;
mod deployment;
mod deployment_variable;
mod group;
mod group_member;
mod group_permission;
mod pipeline_key_pair;
mod pipeline_variable;
mod project;
mod repository;
mod user_permission;
mod webhook;

pub(crate) use branch_restriction::BranchRestriction;
pub(crate) use default_reviewer::DefaultReviewer;
pub(crate) use deploy_key::DeployKey;
pub(crate) use deployment::Deployment;
pub(crate) use deployment_variable::DeploymentVariable;
pub(crate) use group::Group;
pub(crate) use group_member::GroupMember;
pub(crate) use group_permission::GroupPermission;
pub(crate) use pipeline_key_pair::PipelineKeyPair;
pub(crate) use pipeline_variable::PipelineVariable;
pub(crate) use project::Project;
pub(crate) use repository::Repository;
pub(crate) use user_permission::UserPermission;
pub(crate) use webhook::Webhook;

use bitforge_api::modern_types::{self, Variable, VariableWrite};
use bitforge_api::{LegacyClient, ModernClient, Permission};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{Descriptor, IdScheme};
use crate::store::InventoryCache;

// ── Resource kinds ───────────────────────────────────────────────────

/// Stable resource type names understood by the provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum ResourceKind {
    #[strum(serialize = "bitbucket_group")]
    Group,
    #[strum(serialize = "bitbucket_group_member")]
    GroupMember,
    #[strum(serialize = "bitbucket_group_permission")]
    GroupPermission,
    #[strum(serialize = "bitbucket_repository")]
    Repository,
    #[strum(serialize = "bitbucket_project")]
    Project,
    #[strum(serialize = "bitbucket_webhook")]
    Webhook,
    #[strum(serialize = "bitbucket_default_reviewer")]
    DefaultReviewer,
    #[strum(serialize = "bitbucket_deployment_variable")]
    DeploymentVariable,
    #[strum(serialize = "bitbucket_deployment")]
    Deployment,
    #[strum(serialize = "bitbucket_pipeline_variable")]
    PipelineVariable,
    #[strum(serialize = "bitbucket_pipeline_key_pair")]
    PipelineKeyPair,
    #[strum(serialize = "bitbucket_user_permission")]
    UserPermission,
    #[strum(serialize = "bitbucket_branch_restriction")]
    BranchRestriction,
    #[strum(serialize = "bitbucket_deploy_key")]
    DeployKey,
}

impl ResourceKind {
    /// Parse a resource type name, mapping failure to a core error.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        name.parse().map_err(|_| CoreError::UnknownResourceType {
            name: name.to_owned(),
        })
    }

    /// Key fields of this family's composite identifier.
    pub fn scheme(self) -> IdScheme {
        match self {
            Self::Group => Group::SCHEME,
            Self::GroupMember => GroupMember::SCHEME,
            Self::GroupPermission => GroupPermission::SCHEME,
            Self::Repository => Repository::SCHEME,
            Self::Project => Project::SCHEME,
            Self::Webhook => Webhook::SCHEME,
            Self::DefaultReviewer => DefaultReviewer::SCHEME,
            Self::DeploymentVariable => DeploymentVariable::SCHEME,
            Self::Deployment => Deployment::SCHEME,
            Self::PipelineVariable => PipelineVariable::SCHEME,
            Self::PipelineKeyPair => PipelineKeyPair::SCHEME,
            Self::UserPermission => UserPermission::SCHEME,
            Self::BranchRestriction => BranchRestriction::SCHEME,
            Self::DeployKey => DeployKey::SCHEME,
        }
    }

    /// Whether in-place update exists; otherwise every change is a replacement.
    pub fn supports_update(self) -> bool {
        !matches!(
            self,
            Self::GroupMember
                | Self::DefaultReviewer
                | Self::Deployment
                | Self::PipelineKeyPair
                | Self::DeployKey
        )
    }
}

// ── Read outcome ─────────────────────────────────────────────────────

/// Result of a read: the entity exists, or it is gone and must be recreated.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Present(Descriptor),
    /// The descriptor as supplied, with its stored identifier cleared.
    Absent(Descriptor),
}

impl ReadOutcome {
    pub(crate) fn absent(kind: ResourceKind, mut desired: Descriptor) -> Self {
        warn!(%kind, id = desired.id().unwrap_or_default(), "remote entity absent");
        desired.clear_id();
        Self::Absent(desired)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn descriptor(&self) -> &Descriptor {
        match self {
            Self::Present(d) | Self::Absent(d) => d,
        }
    }

    pub fn into_descriptor(self) -> Descriptor {
        match self {
            Self::Present(d) | Self::Absent(d) => d,
        }
    }
}

// ── Shared context ───────────────────────────────────────────────────

/// Clients and caches shared by every reconciliation in the process.
pub(crate) struct Context {
    pub(crate) legacy: LegacyClient,
    pub(crate) modern: ModernClient,
    pub(crate) repositories: InventoryCache<modern_types::Repository>,
}

// ── Per-family contract ──────────────────────────────────────────────

pub(crate) trait Reconcile {
    const KIND: ResourceKind;
    const SCHEME: IdScheme;

    /// Issue the remote create and record the remote key as the id.
    async fn create(ctx: &Context, desired: Descriptor) -> Result<Descriptor, CoreError>;

    /// Look the entity up and overwrite the descriptor with remote truth.
    async fn read(ctx: &Context, desired: Descriptor) -> Result<ReadOutcome, CoreError>;

    /// Send the complete desired state.
    async fn update(_ctx: &Context, _desired: Descriptor) -> Result<Descriptor, CoreError> {
        Err(CoreError::Unsupported {
            kind: Self::KIND.to_string(),
            operation: "update".into(),
        })
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError>;
}

// ── Verbs ────────────────────────────────────────────────────────────

pub(crate) async fn create<R: Reconcile>(
    ctx: &Context,
    desired: Descriptor,
) -> Result<Descriptor, CoreError> {
    let written = R::create(ctx, desired).await?;
    info!(kind = %R::KIND, id = written.id().unwrap_or_default(), "created");
    settle::<R>(ctx, written, "create").await
}

pub(crate) async fn read<R: Reconcile>(
    ctx: &Context,
    desired: Descriptor,
) -> Result<ReadOutcome, CoreError> {
    R::read(ctx, desired).await
}

pub(crate) async fn update<R: Reconcile>(
    ctx: &Context,
    desired: Descriptor,
) -> Result<Descriptor, CoreError> {
    let written = R::update(ctx, desired).await?;
    info!(kind = %R::KIND, id = written.id().unwrap_or_default(), "updated");
    settle::<R>(ctx, written, "update").await
}

pub(crate) async fn delete<R: Reconcile>(
    ctx: &Context,
    mut desired: Descriptor,
) -> Result<Descriptor, CoreError> {
    match R::delete(ctx, &desired).await {
        Ok(()) => info!(kind = %R::KIND, id = desired.id().unwrap_or_default(), "deleted"),
        Err(err) if err.is_not_found() => {
            debug!(kind = %R::KIND, "already absent, nothing to delete");
        }
        Err(err) => return Err(err),
    }
    desired.clear_id();
    Ok(desired)
}

pub(crate) async fn import<R: Reconcile>(ctx: &Context, raw: &str) -> Result<Descriptor, CoreError> {
    let seeded = R::SCHEME.seed(raw)?;
    match R::read(ctx, seeded).await? {
        ReadOutcome::Present(found) => Ok(found),
        ReadOutcome::Absent(_) => Err(CoreError::NotFoundDuringImport {
            kind: R::KIND.to_string(),
            id: raw.to_owned(),
        }),
    }
}

/// The descriptor returned by a mutating verb is always a fresh read.
async fn settle<R: Reconcile>(
    ctx: &Context,
    written: Descriptor,
    verb: &str,
) -> Result<Descriptor, CoreError> {
    match R::read(ctx, written).await? {
        ReadOutcome::Present(observed) => Ok(observed),
        ReadOutcome::Absent(observed) => {
            warn!(kind = %R::KIND, verb, "entity not readable right after write");
            Ok(observed)
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Turn remote absence into `None`, keeping every other failure.
pub(crate) fn found<T>(result: Result<T, bitforge_api::Error>) -> Result<Option<T>, bitforge_api::Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Owned copy of a required string field.
pub(crate) fn required(desired: &Descriptor, field: &str) -> Result<String, CoreError> {
    desired.require_str(field).map(str::to_owned)
}

/// A repository permission must actually grant something.
pub(crate) fn granted(desired: &Descriptor) -> Result<Permission, CoreError> {
    let raw = desired.require_str("permission")?;
    match raw.parse::<Permission>() {
        Ok(Permission::None) | Err(_) => Err(CoreError::InvalidField {
            field: "permission".into(),
            reason: format!("expected read, write or admin, got '{raw}'"),
        }),
        Ok(permission) => Ok(permission),
    }
}

/// Create/update body shared by pipeline and deployment variables.
pub(crate) fn variable_body(desired: &Descriptor) -> Result<VariableWrite, CoreError> {
    Ok(VariableWrite {
        key: required(desired, "key")?,
        value: desired.str_or("value", "")?.to_owned(),
        secured: desired.bool_or("secured", false)?,
    })
}

/// Write a remote variable back. Secured values are never returned, so
/// the desired value stays.
pub(crate) fn apply_variable(desired: &mut Descriptor, variable: Variable) {
    desired.set_id(variable.uuid);
    desired.set("key", variable.key);
    desired.set("secured", variable.secured);
    if let (false, Some(value)) = (variable.secured, variable.value) {
        desired.set("value", value);
    }
}
