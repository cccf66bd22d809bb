// Camera endpoints
//
// Listing, single-camera read/write, live snapshots, and clip export.

use serde_json::Value;
use tracing::debug;

use crate::client::SessionClient;
use crate::error::Error;
use crate::response::{ApiResponse, RawOutput};

pub(crate) fn camera_path(id: &str) -> String {
    format!("camera/{id}")
}

pub(crate) fn snapshot_path(id: &str, width: Option<u32>) -> String {
    match width {
        Some(w) => format!("snapshot/camera/{id}?force=true&width={w}"),
        None => format!("snapshot/camera/{id}?force=true"),
    }
}

pub(crate) fn export_path(camera_id: &str, start_ms: i64, end_ms: i64) -> String {
    format!("video/camera?startTime={start_ms}&endTime={end_ms}&cameras[]={camera_id}")
}

impl SessionClient {
    /// List every camera known to the NVR.
    ///
    /// `GET camera`
    pub async fn list_cameras(&mut self) -> Result<ApiResponse, Error> {
        debug!("listing cameras");
        self.get("camera").await
    }

    /// `GET camera/{id}`
    pub async fn get_camera(&mut self, id: &str) -> Result<ApiResponse, Error> {
        debug!(camera_id = id, "fetching camera");
        self.get(&camera_path(id)).await
    }

    /// Push a full camera document.
    ///
    /// `PUT camera/{id}`
    pub async fn save_camera(&mut self, id: &str, document: &Value) -> Result<ApiResponse, Error> {
        debug!(camera_id = id, "saving camera");
        self.put(&camera_path(id), document).await
    }

    /// Grab a fresh still from a camera.
    ///
    /// `GET snapshot/camera/{id}?force=true[&width=W]`
    pub async fn camera_snapshot(
        &mut self,
        id: &str,
        width: Option<u32>,
        output: &RawOutput,
    ) -> Result<ApiResponse, Error> {
        debug!(camera_id = id, ?width, "taking snapshot");
        self.get_raw(&snapshot_path(id, width), output).await
    }

    /// Export an arbitrary time range from one camera.
    ///
    /// `GET video/camera?startTime=..&endTime=..&cameras[]=id`
    pub async fn export_video(
        &mut self,
        camera_id: &str,
        start_ms: i64,
        end_ms: i64,
        output: &RawOutput,
    ) -> Result<ApiResponse, Error> {
        debug!(camera_id, start_ms, end_ms, "exporting clip");
        self.get_raw(&export_path(camera_id, start_ms, end_ms), output)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_path_with_and_without_width() {
        assert_eq!(snapshot_path("c1", None), "snapshot/camera/c1?force=true");
        assert_eq!(
            snapshot_path("c1", Some(480)),
            "snapshot/camera/c1?force=true&width=480"
        );
    }

    #[test]
    fn export_path_carries_range_and_camera() {
        assert_eq!(
            export_path("c1", 1000, 2000),
            "video/camera?startTime=1000&endTime=2000&cameras[]=c1"
        );
    }
}
