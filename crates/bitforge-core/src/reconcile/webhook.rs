// Repository webhooks (modern surface).
//
// The descriptor's `name` maps to the remote `description`. Stored id
// is the webhook UUID, which is also the last import segment.

use bitforge_api::modern_types::WebhookWrite;

use super::{Context, ReadOutcome, Reconcile, ResourceKind, found, required};
use crate::error::CoreError;
use crate::model::{Descriptor, ID_FIELD, IdScheme};

pub(crate) struct Webhook;

fn write_body(desired: &Descriptor) -> Result<WebhookWrite, CoreError> {
    let events = desired.string_list("events")?;
    if events.is_empty() {
        return Err(CoreError::InvalidField {
            field: "events".into(),
            reason: "at least one event is required".into(),
        });
    }

    Ok(WebhookWrite {
        description: desired.str_or("name", "")?.to_owned(),
        url: required(desired, "url")?,
        active: desired.bool_or("is_active", false)?,
        events,
    })
}

impl Reconcile for Webhook {
    const KIND: ResourceKind = ResourceKind::Webhook;
    const SCHEME: IdScheme =
        IdScheme::new("bitbucket_webhook", &["workspace", "repository", ID_FIELD]);

    async fn create(ctx: &Context, mut desired: Descriptor) -> Result<Descriptor, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let body = write_body(&desired)?;

        let hook = ctx
            .modern
            .create_webhook(&workspace, &repository, &body)
            .await
            .map_err(CoreError::api("create webhook"))?;

        desired.set_id(hook.uuid);
        Ok(desired)
    }

    async fn read(ctx: &Context, mut desired: Descriptor) -> Result<ReadOutcome, CoreError> {
        let workspace = required(&desired, "workspace")?;
        let repository = required(&desired, "repository")?;
        let uuid = required(&desired, ID_FIELD)?;

        let Some(hook) = found(ctx.modern.get_webhook(&workspace, &repository, &uuid).await)
            .map_err(CoreError::api("read webhook"))?
        else {
            return Ok(ReadOutcome::absent(Self::KIND, desired));
        };

        desired.set_id(hook.uuid);
        desired.set("name", hook.description);
        desired.set("url", hook.url);
        desired.set("is_active", hook.active);
        desired.set("events", hook.events);
        Ok(ReadOutcome::Present(desired))
    }

    async fn update(ctx: &Context, desired: Descriptor) -> Result<Descriptor, CoreError> {
        let body = write_body(&desired)?;
        ctx.modern
            .update_webhook(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str(ID_FIELD)?,
                &body,
            )
            .await
            .map_err(CoreError::api("update webhook"))?;
        Ok(desired)
    }

    async fn delete(ctx: &Context, desired: &Descriptor) -> Result<(), CoreError> {
        ctx.modern
            .delete_webhook(
                desired.require_str("workspace")?,
                desired.require_str("repository")?,
                desired.require_str(ID_FIELD)?,
            )
            .await
            .map_err(CoreError::api("delete webhook"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_required() {
        let d = Descriptor::new().with("url", "https://ci.example.com");
        assert!(matches!(
            write_body(&d),
            Err(CoreError::InvalidField { field, .. }) if field == "events"
        ));
    }
}
