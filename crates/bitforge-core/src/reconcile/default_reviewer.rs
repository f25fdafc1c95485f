// Default reviewers (modern surface). Replacement-only.

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, IdScheme};

pub(crate) struct DefaultReviewer;

struct Keys {
    workspace: String,
    repository: String,
    user: String,
}

impl Keys {
    fn of(desired: &Descriptor) -> Result<Self, CoreError> {
        Ok(Self {
            workspace: required(desired, "workspace")?,
            repository: required(desired, "repository")?,
            user: required(desired, "user")?,
        })
    }

    fn stored_id(&self) -> String {
        DefaultReviewer::SCHEME.stored_id(&[
            self.workspace.as_str(),
            self.repository.as_str(),
            self.user.as_str(),
        ])
    }
}

impl Reconcile for DefaultReviewer {
    const KIND: ResourceKind = ResourceKind::DefaultReviewer;
    const SCHEME: IdScheme = IdScheme::new(
        "bitbucket_default_reviewer",
        &["workspace", "repository", "user"],
    );

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let keys = Keys::of(&desired)?;
        ctx.modern
            .add_default_reviewer(&keys.workspace, &keys.repository, &keys.user)
            .await
            .map_err(CoreError::api("add default reviewer"))?;

        desired.set_id(keys.stored_id());
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let keys = Keys::of(&desired)?;
        let reviewer = found(
            ctx.modern
                .get_default_reviewer(&keys.workspace, &keys.repository, &keys.user)
                .await,
        )
        .map_err(CoreError::api("read default reviewer"))?;

        if reviewer.is_none() {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        }
        desired.set_id(keys.stored_id());
        Ok(ReadOutcome::Present(desired))
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        let keys = Keys::of(desired)?;
        ctx.modern
            .remove_default_reviewer(&keys.workspace, &keys.repository, &keys.user)
            .await
            .map_err(CoreError::api("remove default reviewer"))
    }
}
