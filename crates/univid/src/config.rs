//! CLI configuration: thin wrapper around `univid_config`.
//!
//! Adds the flag-aware resolution step: `--nvr`, `--api-key` and friends
//! override whatever the selected profile says.

use std::time::Duration;

use secrecy::SecretString;

use univid_config::{Profile, session_config_with_auth};
use univid_core::{AuthCredentials, SessionConfig, parse_gmt_offset};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use univid_config::{Config, config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Credentials given directly on the command line (or via their env vars).
fn flag_auth(global: &GlobalOpts) -> Option<AuthCredentials> {
    if let Some(ref key) = global.api_key {
        return Some(AuthCredentials::ApiKey(SecretString::from(key.clone())));
    }
    match (&global.username, &global.password) {
        (Some(username), Some(password)) => Some(AuthCredentials::Credentials {
            username: username.clone(),
            password: SecretString::from(password.clone()),
        }),
        _ => None,
    }
}

/// Build a `SessionConfig` from the config file, the selected profile, and
/// CLI overrides. Flags win over profile values.
pub fn build_session_config(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<SessionConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
                path: config_path().display().to_string(),
            });
        }
        None => {
            if global.nvr.is_none() {
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            }
            Profile {
                schema: "http".into(),
                ..Profile::default()
            }
        }
    };

    if let Some(ref nvr) = global.nvr {
        profile.address.clone_from(nvr);
    }
    if let Some(ref schema) = global.schema {
        profile.schema.clone_from(schema);
    }
    if global.port.is_some() {
        profile.port = global.port;
    }

    let mut session = match flag_auth(global) {
        Some(auth) => session_config_with_auth(&profile, &profile_name, &cfg.defaults, auth)?,
        None => univid_config::profile_to_session_config(&profile, &profile_name, &cfg.defaults)?,
    };

    if global.insecure {
        session.verify_certificate = false;
    }
    if global.skip_version_check {
        session.check_server_version = false;
    }
    if let Some(secs) = global.timeout {
        session.timeout = Duration::from_secs(secs);
    }
    if let Some(ref offset) = global.utc_offset {
        session.utc_offset_secs = Some(parse_gmt_offset(offset)?);
    }
    Ok(session)
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
