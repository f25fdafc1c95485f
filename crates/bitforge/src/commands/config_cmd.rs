//! Config subcommand handlers.

use std::path::{Path, PathBuf};

use bitforge_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

/// Config file in effect: `--config` if given, else the platform default.
pub fn active_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config::config_path)
}

/// Load the active config file layered with environment overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(config::load_config_from(&active_path(global))?)
}

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let plain = [
            ("auth_method", &p.auth_method),
            ("username", &p.username),
            ("oauth_client_id", &p.oauth_client_id),
            ("api_url", &p.api_url),
            ("legacy_url", &p.legacy_url),
            ("token_url", &p.token_url),
        ];
        for (key, value) in plain {
            if let Some(v) = value {
                let _ = writeln!(out, "{key} = \"{v}\"");
            }
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if p.oauth_client_secret.is_some() {
            let _ = writeln!(out, "oauth_client_secret = \"****\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

fn use_profile(mut cfg: Config, name: String, path: &Path) -> Result<(), CliError> {
    if !cfg.profiles.contains_key(&name) {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::Validation {
            field: "profile".into(),
            reason: format!(
                "no profile named '{name}' (available: {})",
                if available.is_empty() {
                    "none".to_owned()
                } else {
                    available.join(", ")
                }
            ),
        });
    }
    eprintln!("Default profile set to '{name}'");
    cfg.default_profile = Some(name);
    config::save_config_to(&cfg, path)?;
    Ok(())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = load(global)?;
            print!("{}", format_config_redacted(&cfg));
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", active_path(global).display());
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = load(global)?;
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Edit: {}", active_path(global).display());
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => use_profile(load(global)?, name, &active_path(global)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bitforge_config::Profile;

    use super::*;

    #[test]
    fn secrets_are_masked() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "work".into(),
            Profile {
                username: Some("alice".into()),
                password: Some("s3cret".into()),
                ..Profile::default()
            },
        );
        let shown = format_config_redacted(&cfg);
        assert!(shown.contains("username = \"alice\""));
        assert!(shown.contains("password = \"****\""));
        assert!(!shown.contains("s3cret"));
    }

    #[test]
    fn use_unknown_profile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = use_profile(Config::default(), "nope".into(), &dir.path().join("c.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("no profile named 'nope'"));
    }
}
