// ── Domain model ──
//
// Cameras and recordings are immutable snapshots of server documents,
// keyed by an opaque `EntityId`.

pub mod camera;
pub(crate) mod document;
pub mod entity_id;
pub mod isp;
pub mod recording;
pub mod server;

pub use camera::{Camera, RecordingSettingsUpdate};
pub use entity_id::{EntityId, MacAddress};
pub use isp::{IspRange, IspSetting, KNOWN_MODELS, ModelCapabilities, model_capabilities};
pub use recording::{FULL_TIME_RECORDING, Recording};
pub use server::ServerInfo;
