//! Reconciliation verb handlers.

use std::io;

use serde_json::{Map, Value, json};
use strum::IntoEnumIterator;

use bitforge_core::{Descriptor, Provider, ReadOutcome, ResourceKind};

use super::Session;
use crate::cli::{DescriptorArgs, ImportArgs};
use crate::error::CliError;
use crate::output;

// ── Descriptor input ────────────────────────────────────────────────

/// Assemble the descriptor from `--descriptor` / `--from-file`, then
/// apply `--set` assignments on top.
pub fn load_descriptor(args: &DescriptorArgs) -> Result<Descriptor, CliError> {
    let base: Value = match (&args.descriptor, &args.from_file) {
        (Some(inline), _) => serde_json::from_str(inline)?,
        (None, Some(path)) if path.as_os_str() == "-" => {
            serde_json::from_reader(io::stdin().lock())?
        }
        (None, Some(path)) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        (None, None) => Value::Object(Map::new()),
    };

    let mut descriptor = Descriptor::try_from(base)?;
    for (field, raw) in &args.set {
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
        descriptor.set(field, value);
    }
    Ok(descriptor)
}

fn emit(session: Session, descriptor: &Descriptor) -> Result<(), CliError> {
    let rendered = output::render(session.format, descriptor)?;
    output::print_output(&rendered, session.quiet);
    Ok(())
}

// ── Verbs ───────────────────────────────────────────────────────────

pub async fn create(
    provider: &Provider,
    args: &DescriptorArgs,
    session: Session,
) -> Result<(), CliError> {
    let desired = load_descriptor(args)?;
    let observed = provider.create(args.kind, desired).await?;
    if let Ok(import_id) = args.kind.scheme().import_id(&observed) {
        output::print_note(&format!("import ID: {import_id}"), session.quiet);
    }
    emit(session, &observed)
}

pub async fn read(
    provider: &Provider,
    args: &DescriptorArgs,
    session: Session,
) -> Result<(), CliError> {
    let desired = load_descriptor(args)?;
    match provider.read(args.kind, desired).await? {
        ReadOutcome::Present(observed) => emit(session, &observed),
        ReadOutcome::Absent(cleared) => {
            output::print_note(
                &format!("{} is absent remotely; it would be recreated", args.kind),
                session.quiet,
            );
            emit(session, &cleared)
        }
    }
}

pub async fn update(
    provider: &Provider,
    args: &DescriptorArgs,
    session: Session,
) -> Result<(), CliError> {
    let desired = load_descriptor(args)?;
    let observed = provider.update(args.kind, desired).await?;
    emit(session, &observed)
}

pub async fn delete(
    provider: &Provider,
    args: &DescriptorArgs,
    session: Session,
) -> Result<(), CliError> {
    let desired = load_descriptor(args)?;
    let cleared = provider.delete(args.kind, desired).await?;
    output::print_note(&format!("{} deleted", args.kind), session.quiet);
    emit(session, &cleared)
}

pub async fn import(
    provider: &Provider,
    args: &ImportArgs,
    session: Session,
) -> Result<(), CliError> {
    let observed = provider.import(args.kind, &args.id).await?;
    emit(session, &observed)
}

// ── Resource catalogue ──────────────────────────────────────────────

/// List every resource type with its import ID format.
pub fn list_kinds(session: Session) -> Result<(), CliError> {
    let kinds: Vec<Value> = ResourceKind::iter()
        .map(|kind| {
            json!({
                "type": kind.to_string(),
                "import_id": kind.scheme().format(),
                "update": kind.supports_update(),
            })
        })
        .collect();
    let rendered = output::render(session.format, &kinds)?;
    output::print_output(&rendered, session.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(descriptor: Option<&str>, set: &[(&str, &str)]) -> DescriptorArgs {
        DescriptorArgs {
            kind: ResourceKind::Repository,
            descriptor: descriptor.map(str::to_owned),
            from_file: None,
            set: set
                .iter()
                .map(|(f, v)| ((*f).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    #[test]
    fn set_overrides_inline_descriptor() {
        let d = load_descriptor(&args(
            Some(r#"{"workspace":"acme","name":"app","is_private":true}"#),
            &[("is_private", "false"), ("description", "hello world")],
        ))
        .unwrap();
        assert_eq!(d.get("is_private"), Some(&Value::Bool(false)));
        assert_eq!(d.get_str("description"), Some("hello world"));
        assert_eq!(d.get_str("workspace"), Some("acme"));
    }

    #[test]
    fn descriptor_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group.json");
        std::fs::write(&path, r#"{"workspace":"W","slug":"g1"}"#).unwrap();

        let mut a = args(None, &[]);
        a.from_file = Some(path);
        let d = load_descriptor(&a).unwrap();
        assert_eq!(d.get_str("slug"), Some("g1"));
    }

    #[test]
    fn non_object_descriptor_is_rejected() {
        let err = load_descriptor(&args(Some("[1,2]"), &[])).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
