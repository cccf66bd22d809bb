//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use univid_config::ConfigError;
use univid_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to NVR at {url}")]
    #[diagnostic(
        code(univid::connection_failed),
        help(
            "Check that the NVR is running and reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(univid::timeout),
        help("Increase the timeout with --timeout or check NVR load.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(univid::auth_failed),
        help(
            "Verify the API key (NVR user settings > API access) or the\n\
             username and password for this profile."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(univid::no_credentials),
        help("Set api_key or username/password in the profile, or export UNIVID_API_KEY.")
    )]
    NoCredentials { profile: String },

    // ── Server ───────────────────────────────────────────────────────
    #[error("Unsupported NVR version {version}")]
    #[diagnostic(
        code(univid::unsupported_version),
        help("Pass --skip-version-check to try anyway.")
    )]
    UnsupportedVersion { version: String },

    #[error("NVR rejected the request: {message}")]
    #[diagnostic(code(univid::server))]
    Server { message: String },

    #[error("API error: {message}")]
    #[diagnostic(code(univid::api_error))]
    Api { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(univid::not_found),
        help("Run: univid {resource_type}s list")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("'{operation}' is not supported")]
    #[diagnostic(code(univid::unsupported))]
    Unsupported { operation: String },

    #[error("The NVR returned no data{}", status_suffix(.status))]
    #[diagnostic(code(univid::no_data))]
    NoData { status: u16 },

    // ── Input / Configuration ────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(univid::validation))]
    Validation { field: String, reason: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(univid::profile_not_found),
        help("Available profiles: {available}\nConfig file: {path}")
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error("No NVR configured")]
    #[diagnostic(
        code(univid::no_config),
        help(
            "Pass --nvr with --api-key (or --username/--password),\n\
             or add a profile to {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(univid::config))]
    Config(Box<ConfigError>),

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(univid::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn status_suffix(status: &u16) -> String {
    if *status == 0 {
        String::new()
    } else {
        format!(" (HTTP {status})")
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Unsupported { .. } | Self::UnsupportedVersion { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration { message } => Self::Validation {
                field: "configuration".into(),
                reason: message,
            },
            CoreError::Version { version } => Self::UnsupportedVersion {
                version: version.unwrap_or_else(|| "<unknown>".into()),
            },
            CoreError::ModelCompatibility { camera_id, model } => Self::Unsupported {
                operation: format!("camera {camera_id} (model {model})"),
            },
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::Timeout => Self::Timeout,
            CoreError::Server { message, caused_by } => Self::Server {
                message: match caused_by {
                    Some(cause) => format!("{message} (caused by {cause})"),
                    None => message,
                },
            },
            CoreError::Format { input, reason } => Self::Validation {
                field: format!("'{input}'"),
                reason,
            },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                resource_type: entity_type,
                identifier,
            },
            CoreError::Unsupported { operation } => Self::Unsupported { operation },
            CoreError::Api { message } => Self::Api { message },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (CoreError::Timeout, exit_code::TIMEOUT),
            (
                CoreError::AuthenticationFailed {
                    message: "no".into(),
                },
                exit_code::AUTH,
            ),
            (CoreError::Version { version: None }, exit_code::UNSUPPORTED),
            (
                CoreError::NotFound {
                    entity_type: "camera".into(),
                    identifier: "x".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Format {
                    input: "x".into(),
                    reason: "bad".into(),
                },
                exit_code::USAGE,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn no_data_message_hides_synthetic_status() {
        assert_eq!(
            CliError::NoData { status: 0 }.to_string(),
            "The NVR returned no data"
        );
        assert_eq!(
            CliError::NoData { status: 404 }.to_string(),
            "The NVR returned no data (HTTP 404)"
        );
    }
}
