//! Domain layer between `univid-api` and the CLI.
//!
//! - **[`NvrSession`]**: the facade. [`connect()`](NvrSession::connect)
//!   authenticates, gates on the server version, mirrors cameras and
//!   recordings, then settles the NVR's UTC offset. Every later call is a
//!   single awaited request.
//!
//! - **[`Store`]**: keyed [`EntityCollection`]s of cameras (all, active,
//!   managed) and recordings, reconciled on each camera refresh.
//!
//! - **Domain model** ([`model`]): [`Camera`] and [`Recording`] snapshots
//!   over the raw NVR documents, plus the per-model image-setting table.
//!
//! - **Time helpers** ([`time`]): `GMT+hh:mm` parsing and local-time to
//!   epoch-millisecond resolution used for clip export.

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod time;
pub mod version;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AuthCredentials, Schema, SessionConfig};
pub use error::CoreError;
pub use session::NvrSession;
pub use store::{Entity, EntityCollection, EntityRef, Store};
pub use time::{DateTimeInput, consensus_offset, parse_gmt_offset, resolve_to_epoch_millis};
pub use version::{VersionGate, compare_versions};

pub use model::{
    Camera, EntityId, FULL_TIME_RECORDING, IspRange, IspSetting, KNOWN_MODELS, MacAddress,
    ModelCapabilities, Recording, RecordingSettingsUpdate, ServerInfo, model_capabilities,
};

// Wire-level types callers need without depending on the API crate.
pub use univid_api::{ApiResponse, RawOutput, RecordingQuery};
