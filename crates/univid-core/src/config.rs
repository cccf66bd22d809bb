// ── Runtime session configuration ──
//
// These types describe *how* to reach one NVR. They carry credential data
// and connection tuning but never touch disk; the CLI (or any embedding
// application) builds a `SessionConfig` and hands it to `NvrSession`.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use strum::{Display, EnumString};
use url::Url;

use univid_api::{Credentials, SessionClient, TlsMode, TransportConfig};

use crate::error::CoreError;

/// How to authenticate with the NVR.
///
/// Carries the credential data; `univid_api::AuthStrategy` is the
/// zero-data marker counterpart.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// API key appended to every request.
    ApiKey(SecretString),
    /// Username/password exchanged for a session cookie.
    Credentials {
        username: String,
        password: SecretString,
    },
}

impl AuthCredentials {
    /// Pick the auth mode from optional parts.
    ///
    /// An API key wins when both forms are present. Fails when neither an
    /// API key nor a complete username/password pair is given.
    pub fn from_parts(
        api_key: Option<SecretString>,
        username: Option<String>,
        password: Option<SecretString>,
    ) -> Result<Self, CoreError> {
        match (api_key, username, password) {
            (Some(key), _, _) => Ok(Self::ApiKey(key)),
            (None, Some(username), Some(password)) => Ok(Self::Credentials { username, password }),
            _ => Err(CoreError::Configuration {
                message: "either an API key or a username and password is required".into(),
            }),
        }
    }

    pub(crate) fn to_api(&self) -> Credentials {
        match self {
            Self::ApiKey(key) => Credentials::ApiKey { key: key.clone() },
            Self::Credentials { username, password } => Credentials::Session {
                username: username.clone(),
                password: password.clone(),
            },
        }
    }
}

/// URL scheme used to reach the NVR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Schema {
    #[default]
    Http,
    Https,
}

impl Schema {
    /// The NVR's stock port for this scheme.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Http => 7080,
            Self::Https => 7443,
        }
    }
}

/// Configuration for one NVR session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Host name or IP address.
    pub address: String,
    pub port: u16,
    pub schema: Schema,
    pub auth: AuthCredentials,
    /// When false under https, any certificate is accepted.
    pub verify_certificate: bool,
    /// Extra CA certificate to trust (PEM).
    pub ca_cert: Option<PathBuf>,
    /// When false, an unsupported server version is only recorded.
    pub check_server_version: bool,
    /// Caller-supplied UTC offset in seconds. Overrides all inference.
    pub utc_offset_secs: Option<i32>,
    pub timeout: Duration,
    /// How many recordings the initial sync fetches. `None` = unlimited.
    pub initial_recording_limit: Option<u32>,
}

impl SessionConfig {
    /// A config with stock defaults for the given address and auth.
    pub fn new(address: impl Into<String>, schema: Schema, auth: AuthCredentials) -> Self {
        Self {
            address: address.into(),
            port: schema.default_port(),
            schema,
            auth,
            verify_certificate: true,
            ca_cert: None,
            check_server_version: true,
            utc_offset_secs: None,
            timeout: Duration::from_secs(30),
            initial_recording_limit: Some(100),
        }
    }

    /// `schema://address:port/api/2.0/`
    pub fn base_url(&self) -> Result<Url, CoreError> {
        Ok(SessionClient::base_url_for(
            &self.schema.to_string(),
            &self.address,
            self.port,
        )?)
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match (&self.ca_cert, self.schema, self.verify_certificate) {
            (_, Schema::Https, false) => TlsMode::DangerAcceptInvalid,
            (Some(path), _, _) => TlsMode::CustomCa(path.clone()),
            _ => TlsMode::System,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
