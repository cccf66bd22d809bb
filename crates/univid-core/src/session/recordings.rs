// ── Recording operations ──

use serde_json::Value;
use tracing::{debug, info};

use univid_api::{ApiResponse, RawOutput, RecordingQuery};

use super::{NvrSession, require_json};
use crate::error::CoreError;
use crate::model::document::single_document;
use crate::model::{EntityId, Recording};

const DEFAULT_THUMBNAIL_WIDTH: u32 = 600;

impl NvrSession {
    /// List recordings matching `query`, caching each one.
    ///
    /// With `ids_only` the listing carries bare ids and every recording
    /// is then fetched on its own. A listing the NVR refuses yields an
    /// empty result.
    pub async fn get_recordings(
        &mut self,
        query: &RecordingQuery,
    ) -> Result<Vec<Recording>, CoreError> {
        let Some(items) = self.client.list_recordings(query).await?.into_data() else {
            debug!("recording listing unusable, nothing applied");
            return Ok(Vec::new());
        };

        let documents = if query.ids_only {
            let mut documents = Vec::with_capacity(items.len());
            for id in items.iter().filter_map(listed_id) {
                let resp = self.client.get_recording(id).await?;
                if let Some(doc) = resp.into_json().and_then(|v| single_document(v, id)) {
                    documents.push(doc);
                }
            }
            documents
        } else {
            items
        };

        let ids = self.store.apply_recording_batch(documents)?;
        Ok(ids
            .iter()
            .filter_map(|id| self.store.recordings().get(id).cloned())
            .collect())
    }

    /// Fetch the newest `limit` recordings (all when `None`).
    pub async fn refresh_recordings(&mut self, limit: Option<u32>) -> Result<(), CoreError> {
        let query = limit.map_or_else(RecordingQuery::default, RecordingQuery::with_limit);
        self.get_recordings(&query).await.map(|_| ())
    }

    /// Cached recording, fetched from the NVR on a miss.
    pub async fn get_recording(&mut self, id: &EntityId) -> Result<Recording, CoreError> {
        if let Some(rec) = self.store.recordings().get(id) {
            return Ok(rec.clone());
        }
        self.refresh_recording(id).await
    }

    pub async fn refresh_recording(&mut self, id: &EntityId) -> Result<Recording, CoreError> {
        let resp = self.client.get_recording(id.as_str()).await?;
        if resp.is_no_data() {
            return Err(CoreError::recording_not_found(id.as_str()));
        }
        let rec = recording_from_response(require_json(resp, "recording lookup")?, id)?;
        self.store.replace_recording(rec.clone());
        Ok(rec)
    }

    // ── Media ────────────────────────────────────────────────────────

    /// Download the video. Defaults to `recording-{id}-{start}.mp4`.
    pub async fn download_recording(
        &mut self,
        id: &EntityId,
        output: Option<RawOutput>,
    ) -> Result<ApiResponse, CoreError> {
        let rec = self.get_recording(id).await?;
        let output = output
            .unwrap_or_else(|| RawOutput::File(rec.default_filename("mp4", self.utc_offset).into()));
        Ok(self.client.download_recording(id.as_str(), &output).await?)
    }

    /// Download the motion map. Full-time recordings have none; for them
    /// no request is made and `NoData { status: 0 }` comes back.
    pub async fn recording_motion(
        &mut self,
        id: &EntityId,
        output: Option<RawOutput>,
    ) -> Result<ApiResponse, CoreError> {
        let rec = self.get_recording(id).await?;
        if rec.is_full_time() {
            debug!(recording_id = %id, "full-time recording has no motion map");
            return Ok(ApiResponse::NoData { status: 0 });
        }
        let output = output.unwrap_or_else(|| RawOutput::File(format!("motion-{id}.png").into()));
        Ok(self.client.recording_motion(id.as_str(), &output).await?)
    }

    /// Download a thumbnail, 600 px wide unless `width` says otherwise.
    pub async fn recording_thumbnail(
        &mut self,
        id: &EntityId,
        width: Option<u32>,
        output: Option<RawOutput>,
    ) -> Result<ApiResponse, CoreError> {
        let rec = self.get_recording(id).await?;
        let camera_id = rec.primary_camera().ok_or_else(|| CoreError::NotFound {
            entity_type: "camera".into(),
            identifier: format!("of recording {id}"),
        })?;
        let day = rec.day_path(self.utc_offset);
        let output = output
            .unwrap_or_else(|| RawOutput::File(rec.default_filename("jpg", self.utc_offset).into()));

        Ok(self
            .client
            .recording_thumbnail(
                camera_id.as_str(),
                &day,
                id.as_str(),
                width.unwrap_or(DEFAULT_THUMBNAIL_WIDTH),
                &output,
            )
            .await?)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Protect a recording from automatic cleanup.
    pub async fn lock_recording(&mut self, id: &EntityId) -> Result<Recording, CoreError> {
        self.set_locked(id, true).await
    }

    pub async fn unlock_recording(&mut self, id: &EntityId) -> Result<Recording, CoreError> {
        self.set_locked(id, false).await
    }

    async fn set_locked(&mut self, id: &EntityId, locked: bool) -> Result<Recording, CoreError> {
        let document = self.get_recording(id).await?.with_locked(locked);
        let resp = self.client.save_recording(id.as_str(), &document).await?;
        let answer = require_json(resp, "recording update")?;
        let rec = match recording_from_response(answer, id) {
            Ok(rec) => rec,
            Err(_) => Recording::from_json(document)?,
        };
        self.store.replace_recording(rec.clone());
        info!(recording_id = %id, locked, "recording lock changed");
        Ok(rec)
    }

    /// Delete one recording. Returns `false` when the NVR answered without
    /// data, in which case the cache is left alone.
    pub async fn delete_recording(&mut self, id: &EntityId) -> Result<bool, CoreError> {
        let resp = self.client.delete_recording(id.as_str()).await?;
        if resp.is_no_data() {
            return Ok(false);
        }
        self.store.recordings.remove(id);
        info!(recording_id = %id, "recording deleted");
        Ok(true)
    }

    /// Delete every recording on the NVR.
    pub async fn delete_all_recordings(&mut self) -> Result<bool, CoreError> {
        let resp = self.client.delete_all_recordings().await?;
        if resp.is_no_data() {
            return Ok(false);
        }
        let dropped = self.store.recordings().len();
        self.store.recordings.clear();
        info!(dropped, "all recordings deleted");
        Ok(true)
    }
}

/// An `idsOnly` listing entry: either a bare id string or `{ "_id": .. }`.
fn listed_id(item: &Value) -> Option<&str> {
    item.as_str()
        .or_else(|| item.get("_id").and_then(Value::as_str))
}

fn recording_from_response(resp: Value, id: &EntityId) -> Result<Recording, CoreError> {
    let doc = single_document(resp, id.as_str()).ok_or_else(|| CoreError::Api {
        message: format!("response carries no document for recording {id}"),
    })?;
    Recording::from_json(doc)
}
