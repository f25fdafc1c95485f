//! Configuration for bitforge.
//!
//! TOML profiles layered with environment overrides, credential
//! resolution, and translation to `bitforge_core::ProviderConfig`. The
//! core never touches files or the environment; everything it needs is
//! assembled here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use bitforge_api::{AuthConfig, TlsMode};
use bitforge_core::ProviderConfig;

/// Environment variables consulted during credential resolution. They
/// take precedence over anything stored in a profile.
pub const ENV_AUTH_METHOD: &str = "BITBUCKET_AUTH_METHOD";
pub const ENV_USERNAME: &str = "BITBUCKET_USERNAME";
pub const ENV_PASSWORD: &str = "BITBUCKET_PASSWORD";
pub const ENV_OAUTH_CLIENT_ID: &str = "BITBUCKET_OAUTH_CLIENT_ID";
pub const ENV_OAUTH_CLIENT_SECRET: &str = "BITBUCKET_OAUTH_CLIENT_SECRET";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {method} credentials configured for profile '{profile}' (missing {missing})")]
    NoCredentials {
        profile: String,
        method: String,
        missing: String,
    },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is requested explicitly.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Output format for descriptors: "json" or "yaml".
    #[serde(default = "default_output")]
    pub output: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "json".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named Bitbucket account profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// "basic" (default) or "oauth".
    pub auth_method: Option<String>,

    /// Username for basic auth.
    pub username: Option<String>,

    /// Password or app password (plaintext; prefer the environment).
    pub password: Option<String>,

    /// OAuth consumer key.
    pub oauth_client_id: Option<String>,

    /// OAuth consumer secret (plaintext; prefer the environment).
    pub oauth_client_secret: Option<String>,

    /// Override for the modern (2.0) API root.
    pub api_url: Option<String>,

    /// Override for the legacy (1.0) API root.
    pub legacy_url: Option<String>,

    /// Override for the OAuth2 token endpoint.
    pub token_url: Option<String>,

    /// Path to an additional CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Override timeout in seconds.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "bitforge", "bitforge").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bitforge");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, layered over defaults and under
/// `BITFORGE_*` environment overrides (`__` separates nested keys, e.g.
/// `BITFORGE_DEFAULTS__TIMEOUT`). A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BITFORGE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile selection ───────────────────────────────────────────────

impl Config {
    /// Pick the requested profile, or the default one.
    ///
    /// An explicitly requested profile must exist. When the default
    /// profile is missing an empty one is returned, so a setup driven
    /// purely by environment variables works without a config file.
    pub fn profile(&self, requested: Option<&str>) -> Result<(String, Profile), ConfigError> {
        if let Some(name) = requested {
            return self
                .profiles
                .get(name)
                .cloned()
                .map(|p| (name.to_owned(), p))
                .ok_or_else(|| ConfigError::Validation {
                    field: "profile".into(),
                    reason: format!("no profile named '{name}'"),
                });
        }

        let name = self.default_profile.as_deref().unwrap_or("default");
        let profile = self.profiles.get(name).cloned().unwrap_or_default();
        Ok((name.to_owned(), profile))
    }

    /// Resolve the selected profile into a provider configuration.
    pub fn provider_config(&self, requested: Option<&str>) -> Result<ProviderConfig, ConfigError> {
        let (name, profile) = self.profile(requested)?;
        profile_to_provider_config(&profile, &name, &self.defaults, |key| {
            std::env::var(key).ok()
        })
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an `AuthConfig` from the environment, then the profile.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthConfig, ConfigError> {
    resolve_auth_with(profile, profile_name, |key| std::env::var(key).ok())
}

/// Like [`resolve_auth`], with an explicit environment lookup.
pub fn resolve_auth_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AuthConfig, ConfigError> {
    let pick = |var: &str, fallback: Option<&String>| {
        env(var).filter(|v| !v.is_empty()).or_else(|| fallback.cloned())
    };
    let missing = |method: &str, field: &str| ConfigError::NoCredentials {
        profile: profile_name.into(),
        method: method.into(),
        missing: field.into(),
    };

    let method =
        pick(ENV_AUTH_METHOD, profile.auth_method.as_ref()).unwrap_or_else(|| "basic".into());
    match method.to_ascii_lowercase().as_str() {
        "basic" => {
            let username = pick(ENV_USERNAME, profile.username.as_ref())
                .ok_or_else(|| missing("basic", "username"))?;
            let password = pick(ENV_PASSWORD, profile.password.as_ref())
                .ok_or_else(|| missing("basic", "password"))?;
            Ok(AuthConfig::Basic {
                username,
                password: SecretString::from(password),
            })
        }
        "oauth" => {
            let client_id = pick(ENV_OAUTH_CLIENT_ID, profile.oauth_client_id.as_ref())
                .ok_or_else(|| missing("oauth", "client id"))?;
            let client_secret = pick(ENV_OAUTH_CLIENT_SECRET, profile.oauth_client_secret.as_ref())
                .ok_or_else(|| missing("oauth", "client secret"))?;
            Ok(AuthConfig::OAuthClientCredentials {
                client_id,
                client_secret: SecretString::from(client_secret),
            })
        }
        other => Err(ConfigError::Validation {
            field: "auth_method".into(),
            reason: format!("expected 'basic' or 'oauth', got '{other}'"),
        }),
    }
}

/// Build a `ProviderConfig` from a profile and the global defaults.
pub fn profile_to_provider_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ProviderConfig, ConfigError> {
    let auth = resolve_auth_with(profile, profile_name, env)?;
    let mut config = ProviderConfig::new(auth).map_err(|e| ConfigError::Validation {
        field: "provider".into(),
        reason: e.to_string(),
    })?;

    if let Some(raw) = &profile.api_url {
        config.api_url = parse_url("api_url", raw)?;
    }
    if let Some(raw) = &profile.legacy_url {
        config.legacy_url = parse_url("legacy_url", raw)?;
    }
    if let Some(raw) = &profile.token_url {
        config.token_url = parse_url("token_url", raw)?;
    }
    if let Some(path) = &profile.ca_cert {
        config.tls = TlsMode::CustomCa(path.clone());
    }
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(config)
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}
