//! Profile configuration for univid.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `univid_core::SessionConfig`. The CLI layers its flag
//! overrides on top of what this crate produces.

use std::collections::BTreeMap;
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

use univid_core::{AuthCredentials, Schema, SessionConfig, parse_gmt_offset};

/// Keyring service name; entries are `{profile}/api-key` and
/// `{profile}/password`.
pub const KEYRING_SERVICE: &str = "univid";

/// Prefix for environment overrides, e.g. `UNIVID_DEFAULTS__TIMEOUT=60`.
pub const ENV_PREFIX: &str = "UNIVID_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

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
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named NVR profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name, p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_true")]
    pub check_server_version: bool,

    /// Recordings fetched at connect. 0 means all of them.
    #[serde(default = "default_recording_limit")]
    pub recording_limit: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            check_server_version: true,
            recording_limit: default_recording_limit(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_recording_limit() -> u32 {
    100
}

/// A named NVR profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// NVR host name or IP address.
    pub address: String,

    /// "http" or "https".
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Defaults to 7080 for http and 7443 for https.
    pub port: Option<u16>,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext; prefer keyring).
    pub password: Option<String>,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Accept any certificate under https.
    pub insecure: Option<bool>,

    pub timeout: Option<u64>,

    pub check_server_version: Option<bool>,

    /// NVR offset as `GMT+hh:mm`, overriding what the server reports.
    pub utc_offset: Option<String>,

    pub recording_limit: Option<u32>,
}

fn default_schema() -> String {
    "http".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "univid", "univid").map_or_else(
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
    p.push("univid");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still layering the environment on top.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
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

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}")).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Look for an API key: profile's env var, `UNIVID_API_KEY`, keyring,
/// then plaintext. `None` when no source has one.
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    if let Some(val) = profile
        .api_key_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Some(SecretString::from(val));
    }
    if let Ok(val) = std::env::var("UNIVID_API_KEY") {
        return Some(SecretString::from(val));
    }
    if let Some(secret) = keyring_secret(profile_name, "api-key") {
        return Some(secret);
    }
    profile.api_key.clone().map(SecretString::from)
}

/// Resolve username + password: `UNIVID_PASSWORD`, keyring, then
/// plaintext. The username comes from the profile or `UNIVID_USERNAME`.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let no_credentials = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };

    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("UNIVID_USERNAME").ok())
        .ok_or_else(no_credentials)?;

    if let Ok(pw) = std::env::var("UNIVID_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }
    if let Some(pw) = keyring_secret(profile_name, "password") {
        return Ok((username, pw));
    }
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(no_credentials())
}

/// An API key from any source wins; otherwise username/password.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    if let Some(key) = resolve_api_key(profile, profile_name) {
        return Ok(AuthCredentials::ApiKey(key));
    }
    let (username, password) = resolve_credentials(profile, profile_name)?;
    Ok(AuthCredentials::Credentials { username, password })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `SessionConfig` from a profile and the global defaults,
/// resolving credentials through the usual chain.
pub fn profile_to_session_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<SessionConfig, ConfigError> {
    let auth = resolve_auth(profile, profile_name)?;
    session_config_with_auth(profile, profile_name, defaults, auth)
}

/// Same as [`profile_to_session_config`] with credentials already in hand.
pub fn session_config_with_auth(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    auth: AuthCredentials,
) -> Result<SessionConfig, ConfigError> {
    if profile.address.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "address".into(),
            reason: format!("profile '{profile_name}' has no NVR address"),
        });
    }

    let schema: Schema = profile
        .schema
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "schema".into(),
            reason: format!("expected 'http' or 'https', got '{}'", profile.schema),
        })?;

    let utc_offset_secs = profile
        .utc_offset
        .as_deref()
        .map(parse_gmt_offset)
        .transpose()
        .map_err(|e| ConfigError::Validation {
            field: "utc_offset".into(),
            reason: e.to_string(),
        })?;

    let mut config = SessionConfig::new(profile.address.trim(), schema, auth);
    if let Some(port) = profile.port {
        config.port = port;
    }
    config.verify_certificate = !profile.insecure.unwrap_or(defaults.insecure);
    config.ca_cert.clone_from(&profile.ca_cert);
    config.check_server_version = profile
        .check_server_version
        .unwrap_or(defaults.check_server_version);
    config.utc_offset_secs = utc_offset_secs;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let limit = profile.recording_limit.unwrap_or(defaults.recording_limit);
    config.initial_recording_limit = (limit > 0).then_some(limit);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn profile() -> Profile {
        Profile {
            address: "nvr.lan".into(),
            schema: "https".into(),
            username: Some("viewer".into()),
            password: Some("pw".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "home"

[defaults]
timeout = 10

[profiles.home]
address = "192.168.1.20"
schema = "https"
utc_offset = "GMT+02:00"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        let (name, home) = cfg.profile(None).unwrap();
        assert_eq!(name, "home");
        assert_eq!(home.address, "192.168.1.20");
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.output, "table");
        assert!(matches!(
            cfg.profile(Some("office")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile());

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["default"].address, "nvr.lan");
        assert_eq!(loaded.profiles["default"].username.as_deref(), Some("viewer"));
    }

    #[test]
    fn profile_translates_to_session_config() {
        let mut p = profile();
        p.insecure = Some(true);
        p.utc_offset = Some("GMT-05:00".into());
        p.recording_limit = Some(0);

        let cfg = profile_to_session_config(&p, "default", &Defaults::default()).unwrap();
        assert_eq!(cfg.address, "nvr.lan");
        assert_eq!(cfg.schema, Schema::Https);
        assert_eq!(cfg.port, 7443);
        assert!(!cfg.verify_certificate);
        assert_eq!(cfg.utc_offset_secs, Some(-18_000));
        assert_eq!(cfg.initial_recording_limit, None);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn plaintext_api_key_beats_credentials() {
        let mut p = profile();
        p.api_key = Some("k3y".into());
        match resolve_auth(&p, "test-plaintext-key").unwrap() {
            AuthCredentials::ApiKey(key) => assert_eq!(key.expose_secret(), "k3y"),
            AuthCredentials::Credentials { .. } => panic!("expected API key auth"),
        }
    }

    #[test]
    fn bad_schema_and_offset_are_rejected() {
        let mut p = profile();
        p.schema = "ftp".into();
        assert!(matches!(
            profile_to_session_config(&p, "default", &Defaults::default()),
            Err(ConfigError::Validation { ref field, .. }) if field == "schema"
        ));

        let mut p = profile();
        p.utc_offset = Some("Europe/Paris".into());
        assert!(matches!(
            profile_to_session_config(&p, "default", &Defaults::default()),
            Err(ConfigError::Validation { ref field, .. }) if field == "utc_offset"
        ));
    }

    #[test]
    fn empty_address_is_rejected() {
        let mut p = profile();
        p.address = "  ".into();
        assert!(matches!(
            profile_to_session_config(&p, "default", &Defaults::default()),
            Err(ConfigError::Validation { ref field, .. }) if field == "address"
        ));
    }
}
