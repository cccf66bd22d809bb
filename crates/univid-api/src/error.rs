use thiserror::Error;

/// Top-level error type for the `univid-api` crate.
///
/// Covers every failure mode of the request pipeline that must be
/// *raised*: authentication, transport, the NVR's structured 400 envelope,
/// and local file I/O when saving media. Plain non-2xx responses are not
/// errors; they surface as [`ApiResponse::NoData`](crate::ApiResponse::NoData).
/// `univid-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The server answered 401 and no re-login could fix it.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Wrong credential type for the requested operation.
    #[error("Wrong auth strategy: expected {expected}, got {got}")]
    WrongAuthStrategy { expected: String, got: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── NVR ─────────────────────────────────────────────────────────
    /// HTTP 400 carrying the `{rc: "error", message, causedBy}` envelope.
    #[error("NVR rejected the request: {message}")]
    Server {
        message: String,
        caused_by: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Writing downloaded media to disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
