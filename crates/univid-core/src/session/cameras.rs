// ── Camera operations ──
//
// Edits read the cached document, patch it, PUT the whole thing back, and
// re-cache whatever the NVR answers with.

use serde_json::Value;
use tracing::{debug, info};

use univid_api::{ApiResponse, RawOutput};

use super::{NvrSession, require_json};
use crate::error::CoreError;
use crate::model::document::single_document;
use crate::model::{Camera, EntityId, IspSetting, RecordingSettingsUpdate};
use crate::time::{DEFAULT_RESOLUTION_MS, DateTimeInput, resolve_to_epoch_millis};

impl NvrSession {
    /// Find a camera by id, name, or on-screen text. Names and overlay
    /// text match case-insensitively.
    ///
    /// When several cameras match, the one with the smallest id wins.
    pub fn get_camera(&self, search: &str) -> Option<&Camera> {
        let needle = search.to_lowercase();
        let mut hits: Vec<&Camera> = self
            .store
            .cameras()
            .iter()
            .filter(|c| {
                c.id.as_str() == search
                    || c.name.to_lowercase() == needle
                    || c.overlay_text.to_lowercase() == needle
            })
            .collect();
        hits.sort_by(|a, b| a.id.cmp(&b.id));
        hits.first().copied()
    }

    /// Like [`get_camera`](Self::get_camera) but a miss is an error.
    pub fn find_camera(&self, search: &str) -> Result<&Camera, CoreError> {
        self.get_camera(search)
            .ok_or_else(|| CoreError::camera_not_found(search))
    }

    fn cached_camera(&self, id: &EntityId) -> Result<&Camera, CoreError> {
        self.store
            .cameras()
            .get(id)
            .ok_or_else(|| CoreError::camera_not_found(id.as_str()))
    }

    /// Re-read one camera from the NVR and update every collection.
    pub async fn refresh_camera(&mut self, id: &EntityId) -> Result<Camera, CoreError> {
        let resp = self.client.get_camera(id.as_str()).await?;
        let doc = require_json(resp, "camera lookup")?;
        let camera = camera_from_response(doc, id)?;
        self.store.replace_camera(camera.clone());
        Ok(camera)
    }

    /// PUT an edited camera document and cache the result.
    async fn save_camera(&mut self, id: &EntityId, document: Value) -> Result<Camera, CoreError> {
        let resp = self.client.save_camera(id.as_str(), &document).await?;
        let answer = require_json(resp, "camera update")?;
        let camera = match camera_from_response(answer, id) {
            Ok(camera) => camera,
            // Some releases answer with a bare acknowledgement.
            Err(_) => Camera::from_json(document)?,
        };
        self.store.replace_camera(camera.clone());
        Ok(camera)
    }

    // ── On-screen display ────────────────────────────────────────────

    /// Set the overlay text. The NVR is told to show custom text rather
    /// than the camera name.
    pub async fn set_onscreen_text(
        &mut self,
        id: &EntityId,
        text: &str,
    ) -> Result<Camera, CoreError> {
        let doc = self.cached_camera(id)?.with_overlay_text(text);
        let camera = self.save_camera(id, doc).await?;
        info!(camera_id = %id, text = camera.overlay_text, "overlay text set");
        Ok(camera)
    }

    pub async fn enable_onscreen_timestamp(
        &mut self,
        id: &EntityId,
        enabled: bool,
    ) -> Result<Camera, CoreError> {
        let doc = self.cached_camera(id)?.with_timestamp_overlay(enabled);
        self.save_camera(id, doc).await
    }

    pub async fn enable_onscreen_watermark(
        &mut self,
        id: &EntityId,
        enabled: bool,
    ) -> Result<Camera, CoreError> {
        let doc = self.cached_camera(id)?.with_watermark(enabled);
        self.save_camera(id, doc).await
    }

    /// Change recording mode and pre/post padding. Unset fields keep their
    /// current values.
    pub async fn set_recording_settings(
        &mut self,
        id: &EntityId,
        update: &RecordingSettingsUpdate,
    ) -> Result<Camera, CoreError> {
        if update.is_empty() {
            return self.cached_camera(id).cloned();
        }
        let doc = self.cached_camera(id)?.with_recording_settings(update);
        self.save_camera(id, doc).await
    }

    // ── Image settings ───────────────────────────────────────────────

    /// Current value of an image setting.
    pub fn get_isp(&self, id: &EntityId, setting: IspSetting) -> Result<Option<i64>, CoreError> {
        let camera = self.cached_camera(id)?;
        ensure_supported(camera, setting)?;
        Ok(camera.isp_value(setting))
    }

    /// Write an image setting, clamped to its allowed range. Returns the
    /// value actually sent.
    pub async fn set_isp(
        &mut self,
        id: &EntityId,
        setting: IspSetting,
        value: i64,
    ) -> Result<i64, CoreError> {
        let camera = self.cached_camera(id)?;
        ensure_supported(camera, setting)?;

        let applied = setting.clamp(value);
        if applied != value {
            debug!(%setting, requested = value, applied, "ISP value clamped");
        }
        let doc = camera.with_isp(setting, applied);
        self.save_camera(id, doc).await?;
        Ok(applied)
    }

    // ── Media ────────────────────────────────────────────────────────

    /// Take a live snapshot. Without an explicit output the image is saved
    /// as `snapshot-{id}-{unix time}.jpg` in the working directory.
    pub async fn snapshot(
        &mut self,
        id: &EntityId,
        width: Option<u32>,
        output: Option<RawOutput>,
    ) -> Result<ApiResponse, CoreError> {
        let output = output.unwrap_or_else(|| {
            RawOutput::File(
                format!("snapshot-{id}-{}.jpg", chrono::Utc::now().timestamp()).into(),
            )
        });
        Ok(self
            .client
            .camera_snapshot(id.as_str(), width, &output)
            .await?)
    }

    /// Export footage between `start` and `end`.
    ///
    /// Naive times and strings are read as NVR-local under the session
    /// offset (UTC when unknown), then floored to the minute.
    pub async fn export_clip(
        &mut self,
        id: &EntityId,
        start: impl Into<DateTimeInput>,
        end: impl Into<DateTimeInput>,
        output: Option<RawOutput>,
    ) -> Result<ApiResponse, CoreError> {
        let offset = self.utc_offset.unwrap_or(0);
        let start_ms = resolve_to_epoch_millis(start, offset, DEFAULT_RESOLUTION_MS)?;
        let end_ms = resolve_to_epoch_millis(end, offset, DEFAULT_RESOLUTION_MS)?;
        if end_ms <= start_ms {
            return Err(CoreError::format(
                format!("{start_ms}..{end_ms}"),
                "clip end must be after its start",
            ));
        }

        let output = output.unwrap_or_else(|| {
            RawOutput::File(format!("clip-{id}-{start_ms}-{end_ms}.mp4").into())
        });
        Ok(self
            .client
            .export_video(id.as_str(), start_ms, end_ms, &output)
            .await?)
    }
}

fn camera_from_response(resp: Value, id: &EntityId) -> Result<Camera, CoreError> {
    let doc = single_document(resp, id.as_str()).ok_or_else(|| CoreError::Api {
        message: format!("response carries no document for camera {id}"),
    })?;
    Camera::from_json(doc)
}

fn ensure_supported(camera: &Camera, setting: IspSetting) -> Result<(), CoreError> {
    if camera.supports(setting) {
        Ok(())
    } else {
        Err(CoreError::Unsupported {
            operation: format!("{setting} on {}", camera.model),
        })
    }
}
