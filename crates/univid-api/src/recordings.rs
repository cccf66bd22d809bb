// Recording endpoints
//
// Listing with filters, single-recording read/write/delete, and the three
// media downloads (video, motion map, thumbnail).

use serde_json::Value;
use tracing::debug;

use crate::client::SessionClient;
use crate::error::Error;
use crate::response::{ApiResponse, RawOutput};

/// Filters for `GET recording`.
///
/// Every field is optional; an empty query lists all recordings, newest
/// first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingQuery {
    /// Maximum number of recordings. `None` means unlimited.
    pub limit: Option<u32>,
    /// Event types, e.g. `motionRecording` or `fullTimeRecording`.
    pub types: Vec<String>,
    /// Camera ids to restrict the listing to.
    pub cameras: Vec<String>,
    /// Lower bound on start time, epoch milliseconds.
    pub start_ms: Option<i64>,
    /// Upper bound on end time, epoch milliseconds.
    pub end_ms: Option<i64>,
    /// Ask for ids only; details are then fetched one recording at a time.
    pub ids_only: bool,
}

impl RecordingQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Render the relative request path with its query string.
    pub fn to_path(&self) -> String {
        let mut path = format!(
            "recording?idsOnly={}&sortBy=startTime&sort=desc",
            self.ids_only
        );
        if let Some(limit) = self.limit {
            path.push_str(&format!("&limit={limit}"));
        }
        for t in &self.types {
            path.push_str(&format!("&type[]={t}"));
        }
        for c in &self.cameras {
            path.push_str(&format!("&cameras[]={c}"));
        }
        if let Some(start) = self.start_ms {
            path.push_str(&format!("&startTime={start}"));
        }
        if let Some(end) = self.end_ms {
            path.push_str(&format!("&endTime={end}"));
        }
        path
    }
}

pub(crate) fn recording_path(id: &str) -> String {
    format!("recording/{id}")
}

pub(crate) fn delete_path(id: &str) -> String {
    format!("recording?recordings[]={id}&confirmed=true")
}

pub(crate) const DELETE_ALL_PATH: &str = "recording?deleteRecordings&confirmed=true";

/// `snapshot/recording/{camera}/{YYYY/MM/DD}/{id}?width=W`
pub(crate) fn thumbnail_path(camera_id: &str, day: &str, id: &str, width: u32) -> String {
    format!("snapshot/recording/{camera_id}/{day}/{id}?width={width}")
}

impl SessionClient {
    /// `GET recording?...`
    pub async fn list_recordings(&mut self, query: &RecordingQuery) -> Result<ApiResponse, Error> {
        debug!(limit = ?query.limit, ids_only = query.ids_only, "listing recordings");
        self.get(&query.to_path()).await
    }

    /// `GET recording/{id}`
    pub async fn get_recording(&mut self, id: &str) -> Result<ApiResponse, Error> {
        debug!(recording_id = id, "fetching recording");
        self.get(&recording_path(id)).await
    }

    /// Push a full recording document (used for lock/unlock).
    ///
    /// `PUT recording/{id}`
    pub async fn save_recording(
        &mut self,
        id: &str,
        document: &Value,
    ) -> Result<ApiResponse, Error> {
        debug!(recording_id = id, "saving recording");
        self.put(&recording_path(id), document).await
    }

    /// `DELETE recording?recordings[]={id}&confirmed=true`
    pub async fn delete_recording(&mut self, id: &str) -> Result<ApiResponse, Error> {
        debug!(recording_id = id, "deleting recording");
        self.delete(&delete_path(id)).await
    }

    /// Delete every recording on the NVR.
    ///
    /// `DELETE recording?deleteRecordings&confirmed=true`
    pub async fn delete_all_recordings(&mut self) -> Result<ApiResponse, Error> {
        debug!("deleting all recordings");
        self.delete(DELETE_ALL_PATH).await
    }

    /// `GET recording/{id}/download`
    pub async fn download_recording(
        &mut self,
        id: &str,
        output: &RawOutput,
    ) -> Result<ApiResponse, Error> {
        debug!(recording_id = id, "downloading recording");
        self.get_raw(&format!("recording/{id}/download"), output)
            .await
    }

    /// `GET recording/{id}/motion?alpha=true`
    pub async fn recording_motion(
        &mut self,
        id: &str,
        output: &RawOutput,
    ) -> Result<ApiResponse, Error> {
        debug!(recording_id = id, "downloading motion map");
        self.get_raw(&format!("recording/{id}/motion?alpha=true"), output)
            .await
    }

    /// Fetch a recording thumbnail. `day` is the recording's start date as
    /// `YYYY/MM/DD`.
    pub async fn recording_thumbnail(
        &mut self,
        camera_id: &str,
        day: &str,
        id: &str,
        width: u32,
        output: &RawOutput,
    ) -> Result<ApiResponse, Error> {
        debug!(recording_id = id, width, "downloading thumbnail");
        self.get_raw(&thumbnail_path(camera_id, day, id, width), output)
            .await
    }
}
