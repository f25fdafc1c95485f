// Legacy API response types
//
// Models for the 1.0 group endpoints. Optional fields use
// `#[serde(default)]` because the API omits them freely; the group
// permission gets an explicit sentinel instead of an empty string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Permission ───────────────────────────────────────────────────────

/// Workspace-wide permission a group grants over all repositories.
///
/// `None` is the explicit "unset" sentinel: an absent, `null`, or empty
/// permission in a response decodes to it, so it can never be confused
/// with a real value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Permission {
    #[default]
    None,
    Read,
    Write,
    Admin,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPermission(pub String);

impl fmt::Display for UnknownPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown permission '{}' (expected none, read, write or admin)",
            self.0
        )
    }
}

impl std::error::Error for UnknownPermission {}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownPermission(s.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.as_deref()
            .map_or(Ok(Self::None), str::parse)
            .map_err(serde::de::Error::custom)
    }
}

/// Writes always carry the explicit word, `"none"` included; only
/// responses use `null` for "unset".
impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ── Group ────────────────────────────────────────────────────────────

/// Owner reference nested in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOwner {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A workspace group from `groups/{workspace}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub auto_add: bool,
    #[serde(default)]
    pub permission: Permission,
    #[serde(default)]
    pub owner: Option<GroupOwner>,
}

impl Group {
    /// The owning workspace UUID, when the response carried one.
    pub fn owner_uuid(&self) -> Option<&str> {
        self.owner.as_ref().and_then(|o| o.uuid.as_deref())
    }
}

/// Full desired state sent on group update.
#[derive(Debug, Clone, Serialize)]
pub struct GroupUpdate<'a> {
    pub name: &'a str,
    pub auto_add: bool,
    pub permission: Permission,
}

// ── Group member ─────────────────────────────────────────────────────

/// A member listed under `groups/{workspace}/{slug}/members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_permission_decodes_to_none() {
        let group: Group = serde_json::from_str(r#"{"name":"g1","slug":"g1"}"#).unwrap();
        assert_eq!(group.permission, Permission::None);
        assert_eq!(group.permission.as_str(), "none");
    }

    #[test]
    fn null_and_empty_permission_decode_to_none() {
        let null: Group =
            serde_json::from_str(r#"{"name":"g","slug":"g","permission":null}"#).unwrap();
        let empty: Group =
            serde_json::from_str(r#"{"name":"g","slug":"g","permission":""}"#).unwrap();
        assert_eq!(null.permission, Permission::None);
        assert_eq!(empty.permission, Permission::None);
    }

    #[test]
    fn known_permission_decodes() {
        let group: Group =
            serde_json::from_str(r#"{"name":"g","slug":"g","permission":"write"}"#).unwrap();
        assert_eq!(group.permission, Permission::Write);
    }

    #[test]
    fn unknown_permission_is_a_decode_error() {
        let result = serde_json::from_str::<Group>(r#"{"name":"g","slug":"g","permission":"owner"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn none_is_sent_as_the_word_none() {
        let body = GroupUpdate {
            name: "g1",
            auto_add: false,
            permission: Permission::None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["permission"], "none");

        let body = GroupUpdate {
            permission: Permission::Admin,
            ..body
        };
        assert_eq!(serde_json::to_value(&body).unwrap()["permission"], "admin");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("READ".parse::<Permission>().unwrap(), Permission::Read);
        assert!("owner".parse::<Permission>().is_err());
    }
}
