// ── Provider ──
//
// The single entry point the host runtime talks to: five verbs, each
// keyed by resource type name. Owns both API clients and the repository
// inventory; nothing else in the process reaches them.

use std::sync::Arc;

use bitforge_api::{Credentials, LegacyClient, ModernClient};
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::error::CoreError;
use crate::model::Descriptor;
use crate::reconcile::{
    self, BranchRestriction, Context, DefaultReviewer, DeployKey, Deployment, DeploymentVariable,
    Group, GroupMember, GroupPermission, PipelineKeyPair, PipelineVariable, Project, ReadOutcome,
    Repository, ResourceKind, UserPermission, Webhook,
};
use crate::store::InventoryCache;

/// Route a verb to the reconciler of `$kind`.
macro_rules! dispatch {
    ($kind:expr, $verb:ident($ctx:expr, $arg:expr)) => {
        match $kind {
            ResourceKind::Group => reconcile::$verb::<Group>($ctx, $arg).await,
            ResourceKind::GroupMember => reconcile::$verb::<GroupMember>($ctx, $arg).await,
            ResourceKind::GroupPermission => reconcile::$verb::<GroupPermission>($ctx, $arg).await,
            ResourceKind::Repository => reconcile::$verb::<Repository>($ctx, $arg).await,
            ResourceKind::Project => reconcile::$verb::<Project>($ctx, $arg).await,
            ResourceKind::Webhook => reconcile::$verb::<Webhook>($ctx, $arg).await,
            ResourceKind::DefaultReviewer => reconcile::$verb::<DefaultReviewer>($ctx, $arg).await,
            ResourceKind::DeploymentVariable => {
                reconcile::$verb::<DeploymentVariable>($ctx, $arg).await
            }
            ResourceKind::Deployment => reconcile::$verb::<Deployment>($ctx, $arg).await,
            ResourceKind::PipelineVariable => {
                reconcile::$verb::<PipelineVariable>($ctx, $arg).await
            }
            ResourceKind::PipelineKeyPair => reconcile::$verb::<PipelineKeyPair>($ctx, $arg).await,
            ResourceKind::UserPermission => reconcile::$verb::<UserPermission>($ctx, $arg).await,
            ResourceKind::BranchRestriction => {
                reconcile::$verb::<BranchRestriction>($ctx, $arg).await
            }
            ResourceKind::DeployKey => reconcile::$verb::<DeployKey>($ctx, $arg).await,
        }
    };
}

/// Reconciles descriptors against Bitbucket Cloud.
///
/// Cheaply cloneable; clones share the clients and the repository
/// inventory, so concurrent reconciliations see each other's writes.
#[derive(Clone)]
pub struct Provider {
    inner: Arc<Context>,
}

impl Provider {
    /// Resolve credentials and build both API clients.
    ///
    /// With client-credentials auth this performs the one OAuth2 token
    /// exchange of the process. A rejected exchange is a credentials
    /// error; an unusable CA file or base URL is a client error.
    pub async fn connect(config: ProviderConfig) -> Result<Self, CoreError> {
        let transport = config.transport();
        let http = transport.build_client().map_err(client_error)?;

        let credentials = Credentials::resolve(&config.auth, &http, config.token_url.as_str())
            .await
            .map_err(|source| CoreError::Credentials { source })?;
        debug!(scheme = credentials.scheme(), "credentials resolved");
        let credentials = Arc::new(credentials);

        let legacy = LegacyClient::with_client(
            http.clone(),
            config.legacy_url.as_str(),
            Arc::clone(&credentials),
        )
        .map_err(client_error)?;
        let modern = ModernClient::with_client(http, config.api_url.as_str(), credentials)
            .map_err(client_error)?;

        info!(legacy = %legacy.base_url(), modern = %modern.base_url(), "provider ready");
        Ok(Self {
            inner: Arc::new(Context {
                legacy,
                modern,
                repositories: InventoryCache::new(),
            }),
        })
    }

    // ── Verbs ────────────────────────────────────────────────────────

    /// Create the entity, then return what an independent read observes.
    pub async fn create(
        &self,
        kind: ResourceKind,
        desired: Descriptor,
    ) -> Result<Descriptor, CoreError> {
        dispatch!(kind, create(&self.inner, desired))
    }

    /// Read remote truth. Absence is an outcome, not an error.
    pub async fn read(
        &self,
        kind: ResourceKind,
        desired: Descriptor,
    ) -> Result<ReadOutcome, CoreError> {
        dispatch!(kind, read(&self.inner, desired))
    }

    /// Send the complete desired state, then re-read.
    pub async fn update(
        &self,
        kind: ResourceKind,
        desired: Descriptor,
    ) -> Result<Descriptor, CoreError> {
        dispatch!(kind, update(&self.inner, desired))
    }

    /// Delete the entity; already-absent counts as success. The returned
    /// descriptor has its id cleared.
    pub async fn delete(
        &self,
        kind: ResourceKind,
        desired: Descriptor,
    ) -> Result<Descriptor, CoreError> {
        dispatch!(kind, delete(&self.inner, desired))
    }

    /// Resolve an operator-supplied import string into a full descriptor.
    pub async fn import(&self, kind: ResourceKind, raw: &str) -> Result<Descriptor, CoreError> {
        dispatch!(kind, import(&self.inner, raw))
    }
}

fn client_error(source: bitforge_api::Error) -> CoreError {
    CoreError::Client { source }
}
