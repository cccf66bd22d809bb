// ── Core error types ──
//
// User-facing errors from univid-core. Consumers never see reqwest or
// serde errors directly; the `From<univid_api::Error>` impl translates
// transport-layer failures into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Construction errors ──────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unsupported NVR version: {}", version_label(.version.as_deref()))]
    Version { version: Option<String> },

    #[error("Camera {camera_id} has unsupported model {model:?}")]
    ModelCompatibility { camera_id: String, model: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to NVR at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("NVR request timed out")]
    Timeout,

    // ── Server errors ────────────────────────────────────────────────
    #[error("NVR rejected the request: {message}{}", cause_suffix(.caused_by.as_deref()))]
    Server {
        message: String,
        caused_by: Option<String>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Cannot parse {input:?}: {reason}")]
    Format { input: String, reason: String },

    #[error("Entity not found: {entity_type} matching {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

fn version_label(version: Option<&str>) -> &str {
    version.unwrap_or("<unknown>")
}

fn cause_suffix(caused_by: Option<&str>) -> String {
    caused_by.map(|c| format!(" ({c})")).unwrap_or_default()
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<univid_api::Error> for CoreError {
    fn from(err: univid_api::Error) -> Self {
        match err {
            univid_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            univid_api::Error::WrongAuthStrategy { expected, got } => {
                CoreError::AuthenticationFailed {
                    message: format!("Wrong auth strategy: expected {expected}, got {got}"),
                }
            }
            univid_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| format!("{}://{}", u.scheme(), u.authority()))
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                    }
                }
            }
            univid_api::Error::InvalidUrl(e) => CoreError::Configuration {
                message: format!("Invalid URL: {e}"),
            },
            univid_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            univid_api::Error::Server { message, caused_by } => {
                CoreError::Server { message, caused_by }
            }
            univid_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response: {message}"),
            },
            univid_api::Error::Io(e) => CoreError::Internal(format!("I/O error: {e}")),
        }
    }
}

impl CoreError {
    pub(crate) fn format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn camera_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "camera".into(),
            identifier: identifier.into(),
        }
    }

    pub(crate) fn recording_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "recording".into(),
            identifier: identifier.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_mentions_cause() {
        let err = CoreError::Server {
            message: "Invalid".into(),
            caused_by: Some("bad tag".into()),
        };
        assert_eq!(err.to_string(), "NVR rejected the request: Invalid (bad tag)");
    }

    #[test]
    fn version_error_without_version() {
        let err = CoreError::Version { version: None };
        assert_eq!(err.to_string(), "Unsupported NVR version: <unknown>");
    }

    #[test]
    fn api_auth_error_maps_to_authentication_failed() {
        let err: CoreError = univid_api::Error::Authentication {
            message: "nope".into(),
        }
        .into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }
}
