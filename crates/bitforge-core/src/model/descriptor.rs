// ── Resource descriptor ──
//
// The desired state of one managed entity: a flat map from field name to
// JSON value. The caller supplies it; reconcilers only mutate it while
// writing back remote truth. The stored identifier lives under `id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Field holding the stored identifier.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(Map<String, Value>);

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of `field`; empty strings count as unset.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn require_str(&self, field: &str) -> Result<&str, CoreError> {
        match self.0.get(field) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s),
            None | Some(Value::Null | Value::String(_)) => Err(CoreError::MissingField {
                field: field.to_owned(),
            }),
            Some(other) => Err(CoreError::InvalidField {
                field: field.to_owned(),
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    /// String value of `field`, or `default` when unset.
    pub fn str_or<'a>(&'a self, field: &str, default: &'a str) -> Result<&'a str, CoreError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(CoreError::InvalidField {
                field: field.to_owned(),
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    /// Boolean value of `field`, or `default` when unset.
    pub fn bool_or(&self, field: &str, default: bool) -> Result<bool, CoreError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(CoreError::InvalidField {
                field: field.to_owned(),
                reason: format!("expected a boolean, got {other}"),
            }),
        }
    }

    /// Non-negative integer value of `field`, or `default` when unset.
    pub fn u64_or(&self, field: &str, default: u64) -> Result<u64, CoreError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(default),
            Some(other) => other.as_u64().ok_or_else(|| CoreError::InvalidField {
                field: field.to_owned(),
                reason: format!("expected a non-negative integer, got {other}"),
            }),
        }
    }

    /// List-of-strings value of `field`; unset is an empty list.
    pub fn string_list(&self, field: &str) -> Result<Vec<String>, CoreError> {
        let invalid = |reason: String| CoreError::InvalidField {
            field: field.to_owned(),
            reason,
        };
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_owned)
                        .ok_or_else(|| invalid(format!("expected strings, got {item}")))
                })
                .collect(),
            Some(other) => Err(invalid(format!("expected a list, got {other}"))),
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.0.insert(field.to_owned(), value.into());
    }

    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str(ID_FIELD)
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.set(ID_FIELD, id.into());
    }

    pub fn clear_id(&mut self) {
        self.clear(ID_FIELD);
    }
}

impl From<Map<String, Value>> for Descriptor {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Descriptor {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::InvalidField {
                field: "descriptor".into(),
                reason: format!("expected a JSON object, got {other}"),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_string_is_missing() {
        let d = Descriptor::new().with("workspace", "");
        assert!(matches!(
            d.require_str("workspace"),
            Err(CoreError::MissingField { .. })
        ));
        assert_eq!(d.get_str("workspace"), None);
    }

    #[test]
    fn wrong_type_is_invalid_not_missing() {
        let d = Descriptor::new().with("workspace", 7).with("is_private", "yes");
        assert!(matches!(
            d.require_str("workspace"),
            Err(CoreError::InvalidField { .. })
        ));
        assert!(d.bool_or("is_private", true).is_err());
        assert!(d.bool_or("has_wiki", false).is_ok_and(|b| !b));
    }

    #[test]
    fn integers_reject_negatives_and_strings() {
        let d = Descriptor::new().with("value", 2).with("bad", -1).with("text", "2");
        assert_eq!(d.u64_or("value", 0).ok(), Some(2));
        assert_eq!(d.u64_or("unset", 0).ok(), Some(0));
        assert!(d.u64_or("bad", 0).is_err());
        assert!(d.u64_or("text", 0).is_err());
    }

    #[test]
    fn id_lifecycle() {
        let mut d = Descriptor::new();
        assert_eq!(d.id(), None);
        d.set_id("{abc}");
        assert_eq!(d.id(), Some("{abc}"));
        d.clear_id();
        assert_eq!(d.id(), None);
    }

    #[test]
    fn serializes_as_plain_object() {
        let d: Descriptor = json!({ "workspace": "acme", "events": ["repo:push"] })
            .try_into()
            .unwrap();
        assert_eq!(d.string_list("events").unwrap(), vec!["repo:push".to_string()]);
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({ "workspace": "acme", "events": ["repo:push"] })
        );
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(Descriptor::try_from(json!([1, 2])).is_err());
    }
}
