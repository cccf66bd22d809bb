// univid-api: Async Rust client for the UniFi Video NVR API

pub mod auth;
pub mod bootstrap;
pub mod cameras;
pub mod client;
pub mod error;
mod login;
pub mod recordings;
pub mod response;
pub mod transport;

pub use auth::{AuthStrategy, Credentials};
pub use client::{API_KEY_PARAM, SESSION_COOKIE, SessionClient};
pub use error::Error;
pub use recordings::RecordingQuery;
pub use response::{ApiResponse, RawOutput};
pub use transport::{TlsMode, TransportConfig};
