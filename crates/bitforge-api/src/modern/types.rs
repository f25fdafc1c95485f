// Modern API request/response types
//
// Only the fields the reconciler reads back are modelled. Everything
// else in a response is ignored by serde.

use serde::{Deserialize, Serialize};

// ── Pagination ───────────────────────────────────────────────────────

/// One page of a 2.0 listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

// ── Repositories ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub uuid: String,
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub has_wiki: bool,
    #[serde(default)]
    pub fork_policy: String,
    #[serde(default)]
    pub project: Option<ProjectRef>,
}

/// Body for repository create and update.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryWrite {
    pub scm: &'static str,
    pub description: String,
    pub is_private: bool,
    pub has_wiki: bool,
    pub fork_policy: String,
    pub project: ProjectRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelinesConfig {
    #[serde(default)]
    pub enabled: bool,
}

// ── Projects ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub uuid: String,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectWrite {
    pub name: String,
    pub key: String,
    pub description: String,
    pub is_private: bool,
}

// ── Webhooks ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Webhook {
    pub uuid: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookWrite {
    pub description: String,
    pub url: String,
    pub active: bool,
    pub events: Vec<String>,
}

// ── Users and permissions ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub uuid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupRef {
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A repository-level permission granted to a workspace group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupPermission {
    pub permission: String,
    pub group: GroupRef,
}

/// A repository-level permission granted to a single user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserPermission {
    pub permission: String,
    pub user: User,
}

// ── Variables ────────────────────────────────────────────────────────

/// A pipeline or deployment variable. Secured values come back as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variable {
    pub uuid: String,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub secured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableWrite {
    pub key: String,
    pub value: String,
    pub secured: bool,
}

// ── Deployment environments ──────────────────────────────────────────

/// Deployment environment category. The remote orders them by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentType {
    Test,
    Staging,
    Production,
}

impl EnvironmentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "Test",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }

    pub fn rank(self) -> u32 {
        match self {
            Self::Test => 0,
            Self::Staging => 1,
            Self::Production => 2,
        }
    }

    pub fn from_rank(rank: u32) -> Option<Self> {
        match rank {
            0 => Some(Self::Test),
            1 => Some(Self::Staging),
            2 => Some(Self::Production),
            _ => None,
        }
    }

    /// Case-sensitive, matching the names the remote reports.
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Test, Self::Staging, Self::Production]
            .into_iter()
            .find(|t| t.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvironmentTypeRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rank: Option<u32>,
}

/// A deployment environment (the `deployment` of a deployment variable).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Environment {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub environment_type: Option<EnvironmentTypeRef>,
}

impl Environment {
    /// Category from the top-level rank, else the nested type's rank.
    pub fn category(&self) -> Option<EnvironmentType> {
        self.rank
            .or_else(|| self.environment_type.as_ref().and_then(|t| t.rank))
            .and_then(EnvironmentType::from_rank)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentTypeWrite {
    #[serde(rename = "type")]
    pub object: &'static str,
    pub name: &'static str,
    pub rank: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentWrite {
    pub name: String,
    pub environment_type: EnvironmentTypeWrite,
    pub rank: u32,
}

impl EnvironmentWrite {
    pub fn new(name: impl Into<String>, category: EnvironmentType) -> Self {
        Self {
            name: name.into(),
            environment_type: EnvironmentTypeWrite {
                object: "deployment_environment_type",
                name: category.as_str(),
                rank: category.rank(),
            },
            rank: category.rank(),
        }
    }
}

// ── Branch restrictions ──────────────────────────────────────────────

/// A user exempted from a restriction, by UUID or by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UserRef {
    Uuid { uuid: String },
    Username { username: String },
}

impl UserRef {
    /// `{…}`-wrapped values are UUIDs; anything else is a username.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with('{') && raw.ends_with('}') {
            Self::Uuid {
                uuid: raw.to_owned(),
            }
        } else {
            Self::Username {
                username: raw.to_owned(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSlug {
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchRestriction {
    pub id: u64,
    pub kind: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub value: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchRestrictionWrite {
    pub kind: String,
    pub branch_match_kind: &'static str,
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
    pub users: Vec<UserRef>,
    pub groups: Vec<GroupSlug>,
}

// ── Keys ─────────────────────────────────────────────────────────────

/// A repository deploy key. The remote splits the trailing comment off
/// the public key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeployKey {
    pub id: u64,
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl DeployKey {
    /// Public key as originally submitted, comment included.
    pub fn full_key(&self) -> String {
        match self.comment.as_deref() {
            Some(comment) if !comment.is_empty() => format!("{} {comment}", self.key),
            _ => self.key.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeployKeyWrite {
    pub key: String,
    pub label: String,
}

/// The pipelines SSH key pair. Only the public half is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineKeyPair {
    #[serde(default)]
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineKeyPairWrite {
    pub private_key: String,
    pub public_key: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn page_without_next_is_last() {
        let page: Page<Repository> = serde_json::from_str(
            r#"{"values":[{"uuid":"{r1}","slug":"app","is_private":true,"project":{"key":"OPS"}}],"pagelen":10}"#,
        )
        .unwrap();
        assert!(page.next.is_none());
        assert_eq!(page.values[0].project.as_ref().unwrap().key, "OPS");
        assert!(page.values[0].description.is_empty());
    }

    #[test]
    fn secured_variable_has_no_value() {
        let var: Variable =
            serde_json::from_str(r#"{"uuid":"{v}","key":"TOKEN","secured":true}"#).unwrap();
        assert!(var.secured);
        assert!(var.value.is_none());
    }

    #[test]
    fn environment_category_prefers_top_level_rank() {
        let env: Environment = serde_json::from_str(
            r#"{"uuid":"{e}","name":"prod","rank":2,"environment_type":{"name":"Production","rank":2}}"#,
        )
        .unwrap();
        assert_eq!(env.category(), Some(EnvironmentType::Production));

        let nested: Environment = serde_json::from_str(
            r#"{"uuid":"{e}","name":"qa","environment_type":{"name":"Staging","rank":1}}"#,
        )
        .unwrap();
        assert_eq!(nested.category(), Some(EnvironmentType::Staging));
    }

    #[test]
    fn environment_write_body_shape() {
        let body = serde_json::to_value(EnvironmentWrite::new("qa", EnvironmentType::Staging)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "name": "qa",
                "environment_type": { "type": "deployment_environment_type", "name": "Staging", "rank": 1 },
                "rank": 1
            })
        );
    }

    #[test]
    fn user_refs_split_on_braces() {
        assert_eq!(
            serde_json::to_value(UserRef::parse("{u-1}")).unwrap(),
            serde_json::json!({ "uuid": "{u-1}" })
        );
        assert_eq!(
            serde_json::to_value(UserRef::parse("ada")).unwrap(),
            serde_json::json!({ "username": "ada" })
        );
    }

    #[test]
    fn deploy_key_rejoins_comment() {
        let key: DeployKey =
            serde_json::from_str(r#"{"id":7,"key":"ssh-ed25519 AAAA","label":"ci","comment":"ci@host"}"#)
                .unwrap();
        assert_eq!(key.full_key(), "ssh-ed25519 AAAA ci@host");
    }
}
