// ── Recording domain type ──

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use super::document::{bool_field, i64_field, str_field};
use super::entity_id::EntityId;
use crate::error::CoreError;

/// `eventType` of continuous recordings, which carry no motion map.
pub const FULL_TIME_RECORDING: &str = "fullTimeRecording";

/// Snapshot of one recording as last reported by the NVR.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recording {
    pub id: EntityId,
    /// `motionRecording` or `fullTimeRecording`.
    pub event_type: Option<String>,
    pub locked: Option<bool>,
    pub in_progress: Option<bool>,
    pub marked_for_deletion: Option<bool>,
    pub cameras: Vec<EntityId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip)]
    document: Value,
}

impl Recording {
    pub fn from_json(document: Value) -> Result<Self, CoreError> {
        let id = str_field(&document, &["_id"]).ok_or_else(|| CoreError::Api {
            message: "recording document has no _id".into(),
        })?;
        let millis = |key: &str| {
            DateTime::from_timestamp_millis(i64_field(&document, &[key]).unwrap_or(0))
                .unwrap_or_default()
        };
        let cameras = document
            .get("cameras")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(EntityId::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: EntityId::from(id),
            event_type: str_field(&document, &["eventType"]),
            locked: bool_field(&document, &["locked"]),
            in_progress: bool_field(&document, &["inProgress"]),
            marked_for_deletion: bool_field(&document, &["markedForDeletion"]),
            cameras,
            start_time: millis("startTime"),
            end_time: millis("endTime"),
            document,
        })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn is_full_time(&self) -> bool {
        self.event_type.as_deref() == Some(FULL_TIME_RECORDING)
    }

    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }

    /// The camera that produced this recording.
    pub fn primary_camera(&self) -> Option<&EntityId> {
        self.cameras.first()
    }

    /// Start time as NVR wall-clock under `utc_offset_secs`.
    fn local_start(&self, utc_offset_secs: Option<i32>) -> DateTime<Utc> {
        self.start_time + Duration::seconds(i64::from(utc_offset_secs.unwrap_or(0)))
    }

    /// `YYYY/MM/DD` of the start date, as used in thumbnail paths.
    pub fn day_path(&self, utc_offset_secs: Option<i32>) -> String {
        self.local_start(utc_offset_secs)
            .format("%Y/%m/%d")
            .to_string()
    }

    /// `recording-{id}-{start}.{ext}` default download name.
    pub fn default_filename(&self, ext: &str, utc_offset_secs: Option<i32>) -> String {
        format!(
            "recording-{}-{}.{ext}",
            self.id,
            self.local_start(utc_offset_secs).format("%Y-%m-%dT%H:%M:%S")
        )
    }

    pub(crate) fn with_locked(&self, locked: bool) -> Value {
        let mut doc = self.document.clone();
        if let Value::Object(map) = &mut doc {
            map.insert("locked".into(), json!(locked));
        }
        doc
    }
}
