// ── NVR session facade ──
//
// Owns the HTTP client and the collections mirrored from the server.
// `connect()` runs the whole startup sequence; afterwards every operation
// is a single awaited exchange (plus at most one re-login).

mod cameras;
mod recordings;

use serde_json::Value;
use tracing::{debug, info, warn};

use univid_api::{ApiResponse, RecordingQuery, SessionClient};

use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::model::{Camera, Recording, ServerInfo};
use crate::store::{EntityCollection, Store};
use crate::time::{consensus_offset, parse_gmt_offset};
use crate::version::VersionGate;

/// A live session against one NVR.
///
/// Every server call takes `&mut self`, so concurrent use needs an
/// external lock.
pub struct NvrSession {
    client: SessionClient,
    server: ServerInfo,
    store: Store,
    utc_offset: Option<i32>,
}

impl NvrSession {
    /// Connect with the default supported-version gate.
    pub async fn connect(config: SessionConfig) -> Result<Self, CoreError> {
        Self::connect_with_gate(config, &VersionGate::default()).await
    }

    /// Authenticate, check the server version, load cameras and
    /// recordings, then settle the session's UTC offset.
    pub async fn connect_with_gate(
        config: SessionConfig,
        gate: &VersionGate,
    ) -> Result<Self, CoreError> {
        let client = SessionClient::new(
            config.base_url()?,
            config.auth.to_api(),
            &config.transport(),
        )?;
        debug!(
            url = %client.base_url(),
            auth = %client.strategy(),
            "connecting to NVR"
        );

        let mut session = Self {
            client,
            server: ServerInfo::default(),
            store: Store::default(),
            utc_offset: None,
        };

        // ── Identity and version gate ──
        let bootstrap = session.client.bootstrap().await?;
        let mut server = bootstrap
            .json()
            .map(ServerInfo::from_bootstrap)
            .unwrap_or_default();
        server.is_supported_version = gate.is_supported(server.version.as_deref());

        if !server.is_supported_version {
            if config.check_server_version {
                return Err(CoreError::Version {
                    version: server.version,
                });
            }
            warn!(
                version = server.version.as_deref().unwrap_or("<unknown>"),
                "unsupported NVR version, continuing"
            );
        }
        session.server = server;

        // ── Initial sync ──
        session.refresh_cameras().await?;
        let query = config
            .initial_recording_limit
            .map_or_else(RecordingQuery::default, RecordingQuery::with_limit);
        session.get_recordings(&query).await?;

        session.utc_offset = session.resolve_utc_offset(config.utc_offset_secs);

        info!(
            name = session.server.name.as_deref().unwrap_or("<unnamed>"),
            version = session.server.version.as_deref().unwrap_or("<unknown>"),
            cameras = session.store.cameras().len(),
            recordings = session.store.recordings().len(),
            utc_offset = ?session.utc_offset,
            "connected"
        );
        Ok(session)
    }

    /// Explicit offset, then the bootstrap's `gmtOffset`, then unanimous
    /// agreement among active cameras.
    fn resolve_utc_offset(&self, explicit: Option<i32>) -> Option<i32> {
        if explicit.is_some() {
            return explicit;
        }
        if let Some(raw) = self.server.gmt_offset.as_deref() {
            match parse_gmt_offset(raw) {
                Ok(offset) => return Some(offset),
                Err(e) => warn!(error = %e, "ignoring bootstrap gmtOffset"),
            }
        }
        consensus_offset(self.store.active_cameras().iter().map(|c| c.utc_offset))
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn server_info(&self) -> &ServerInfo {
        &self.server
    }

    /// Session-wide UTC offset in seconds, if known.
    pub fn utc_offset(&self) -> Option<i32> {
        self.utc_offset
    }

    pub fn cameras(&self) -> &EntityCollection<Camera> {
        self.store.cameras()
    }

    pub fn active_cameras(&self) -> &EntityCollection<Camera> {
        self.store.active_cameras()
    }

    pub fn managed_cameras(&self) -> &EntityCollection<Camera> {
        self.store.managed_cameras()
    }

    pub fn recordings(&self) -> &EntityCollection<Recording> {
        self.store.recordings()
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    // ── Camera sync ──────────────────────────────────────────────────

    /// Re-read the camera listing and reconcile all three camera
    /// collections.
    ///
    /// A listing that is not a `{ "data": [...] }` document (including a
    /// non-2xx answer) leaves the collections untouched.
    pub async fn refresh_cameras(&mut self) -> Result<(), CoreError> {
        let resp = self.client.list_cameras().await?;
        let Some(documents) = resp.into_data() else {
            debug!("camera listing unusable, keeping current state");
            return Ok(());
        };
        self.store.apply_camera_batch(documents)
    }
}

/// Unwrap a JSON answer, turning the no-data sentinel into an error for
/// operations that cannot proceed without a document.
fn require_json(resp: ApiResponse, what: &str) -> Result<Value, CoreError> {
    match resp {
        ApiResponse::Json(v) => Ok(v),
        ApiResponse::NoData { status } => Err(CoreError::Api {
            message: format!("{what}: NVR returned no data (HTTP {status})"),
        }),
        _ => Err(CoreError::Api {
            message: format!("{what}: NVR returned a non-JSON body"),
        }),
    }
}
