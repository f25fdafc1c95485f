// ── Identifier codec ──
//
// Every resource family fixes an ordered tuple of key fields. The tuple
// is written two ways: `/`-joined as the operator-facing import string
// (decoded back on import), and `-`-joined as the stored identifier for
// families without a remote UUID. Stored identifiers are never decoded,
// since slugs may legitimately contain `-`.

use crate::error::CoreError;
use crate::model::Descriptor;

pub const IMPORT_DELIMITER: char = '/';
pub const STORED_DELIMITER: &str = "-";

/// Field count and order of one family's composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdScheme {
    kind: &'static str,
    fields: &'static [&'static str],
}

impl IdScheme {
    pub const fn new(kind: &'static str, fields: &'static [&'static str]) -> Self {
        Self { kind, fields }
    }

    /// Human-readable import format, e.g. `<workspace>/<repository>/<group>`.
    pub fn format(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("<{f}>"))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Join keys into an import string, rejecting keys the decoder could
    /// not split back apart.
    pub fn encode(&self, keys: &[&str]) -> Result<String, CoreError> {
        self.check_arity(keys.len(), &keys.join("/"))?;
        for (field, key) in self.fields.iter().zip(keys) {
            validate_component(field, key)?;
        }
        Ok(keys.join("/"))
    }

    /// Import string that would bring `descriptor` back under management.
    pub fn import_id(&self, descriptor: &Descriptor) -> Result<String, CoreError> {
        let keys = self
            .fields
            .iter()
            .map(|field| descriptor.require_str(field))
            .collect::<Result<Vec<_>, _>>()?;
        self.encode(&keys)
    }

    /// Split an operator-supplied import string into exactly as many
    /// non-empty segments as this scheme has fields.
    pub fn decode(&self, raw: &str) -> Result<Vec<String>, CoreError> {
        let segments: Vec<&str> = raw.split(IMPORT_DELIMITER).collect();
        self.check_arity(segments.len(), raw)?;
        if segments.iter().any(|s| s.is_empty()) {
            return Err(self.invalid_import(raw));
        }
        Ok(segments.into_iter().map(str::to_owned).collect())
    }

    /// Decode `raw` and seed a descriptor with one field per segment.
    pub fn seed(&self, raw: &str) -> Result<Descriptor, CoreError> {
        let keys = self.decode(raw)?;
        Ok(self
            .fields
            .iter()
            .zip(keys)
            .fold(Descriptor::new(), |d, (field, key)| d.with(field, key)))
    }

    /// Stored identifier for families keyed by their ancestors.
    pub fn stored_id(&self, keys: &[&str]) -> String {
        debug_assert_eq!(keys.len(), self.fields.len(), "{} key arity", self.kind);
        keys.join(STORED_DELIMITER)
    }

    fn check_arity(&self, got: usize, raw: &str) -> Result<(), CoreError> {
        if got == self.fields.len() {
            Ok(())
        } else {
            Err(self.invalid_import(raw))
        }
    }

    fn invalid_import(&self, raw: &str) -> CoreError {
        CoreError::InvalidImportId {
            kind: self.kind.to_owned(),
            raw: raw.to_owned(),
            expected: self.format(),
        }
    }
}

fn validate_component(field: &str, value: &str) -> Result<(), CoreError> {
    let reason = if value.is_empty() {
        "must not be empty"
    } else if value.contains(IMPORT_DELIMITER) {
        "must not contain '/'"
    } else {
        return Ok(());
    };
    Err(CoreError::InvalidIdentifier {
        field: field.to_owned(),
        value: value.to_owned(),
        reason: reason.to_owned(),
    })
}
