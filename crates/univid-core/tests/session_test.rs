#![allow(clippy::unwrap_used)]
// Integration tests for `NvrSession` against a wiremock NVR.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use univid_core::{
    ApiResponse, AuthCredentials, CoreError, EntityId, IspSetting, NvrSession, RawOutput,
    RecordingQuery, Schema, SessionConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn api_path(suffix: &str) -> String {
    format!("/api/2.0/{suffix}")
}

fn config(server: &MockServer) -> SessionConfig {
    let mut config = SessionConfig::new(
        "127.0.0.1",
        Schema::Http,
        AuthCredentials::ApiKey(SecretString::from("k3y")),
    );
    config.port = server.address().port();
    config
}

fn bootstrap(version: &str, gmt_offset: Option<&str>) -> Value {
    json!({
        "data": [{
            "nvrName": "basement",
            "systemInfo": { "version": version },
            "settings": { "systemSettings": { "gmtOffset": gmt_offset } },
        }]
    })
}

fn camera(id: &str, managed: bool, state: &str, timezone: &str) -> Value {
    json!({
        "_id": id,
        "name": format!("cam {id}"),
        "model": "UVC G3",
        "managed": managed,
        "state": state,
        "mac": "FCECDAD81CD1",
        "osdSettings": { "tag": format!("tag {id}"), "overrideMessage": false },
        "deviceSettings": { "timezone": timezone },
        "ispSettings": { "brightness": 50, "wdr": 1 },
    })
}

fn recording(id: &str, camera: &str, event: &str) -> Value {
    json!({
        "_id": id,
        "eventType": event,
        "locked": false,
        "cameras": [camera],
        "startTime": 1_543_183_200_000_i64,
        "endTime": 1_543_183_260_000_i64,
    })
}

async fn mount_bootstrap(server: &MockServer, doc: Value) {
    Mock::given(method("GET"))
        .and(path(api_path("bootstrap")))
        .respond_with(ResponseTemplate::new(200).set_body_json(doc))
        .mount(server)
        .await;
}

async fn mount_cameras(server: &MockServer, cameras: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(api_path("camera")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": cameras })))
        .mount(server)
        .await;
}

async fn mount_recordings(server: &MockServer, recordings: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(api_path("recording")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": recordings })))
        .mount(server)
        .await;
}

/// A supported NVR with one active camera and one recording.
async fn setup() -> (MockServer, NvrSession) {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.10.13", Some("GMT+02:00"))).await;
    mount_cameras(&server, vec![camera("a", true, "CONNECTED", "GMT+2")]).await;
    mount_recordings(&server, vec![recording("r1", "a", "motionRecording")]).await;
    let session = NvrSession::connect(config(&server)).await.unwrap();
    (server, session)
}

fn sorted_ids<'a>(ids: impl Iterator<Item = &'a EntityId>) -> Vec<&'a str> {
    let mut v: Vec<&str> = ids.map(EntityId::as_str).collect();
    v.sort_unstable();
    v
}

// ── Startup ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_mirrors_server_state() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.10.13", Some("GMT+02:00"))).await;
    mount_cameras(
        &server,
        vec![
            camera("a", true, "CONNECTED", "GMT+2"),
            camera("b", true, "DISCONNECTED", "GMT+2"),
            camera("c", false, "CONNECTED", "GMT+2"),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path(api_path("recording")))
        .and(query_param("limit", "100"))
        .and(query_param("sortBy", "startTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                recording("r1", "a", "motionRecording"),
                recording("r2", "b", "fullTimeRecording"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = NvrSession::connect(config(&server)).await.unwrap();

    let info = session.server_info();
    assert_eq!(info.name.as_deref(), Some("basement"));
    assert_eq!(info.version.as_deref(), Some("3.10.13"));
    assert!(info.is_supported_version);

    assert_eq!(
        sorted_ids(session.cameras().iter().map(|c| &c.id)),
        ["a", "b", "c"]
    );
    assert_eq!(
        sorted_ids(session.active_cameras().iter().map(|c| &c.id)),
        ["a"]
    );
    assert_eq!(
        sorted_ids(session.managed_cameras().iter().map(|c| &c.id)),
        ["a", "b"]
    );
    assert_eq!(session.recordings().len(), 2);
    assert_eq!(session.utc_offset(), Some(7200));
}

#[tokio::test]
async fn test_unsupported_version_is_fatal_when_checked() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.8.0", None)).await;
    Mock::given(method("GET"))
        .and(path(api_path("camera")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let err = NvrSession::connect(config(&server)).await.err().unwrap();
    match err {
        CoreError::Version { version } => assert_eq!(version.as_deref(), Some("3.8.0")),
        other => panic!("expected Version, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsupported_version_is_recorded_when_unchecked() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.8.0", None)).await;
    mount_cameras(&server, vec![]).await;
    mount_recordings(&server, vec![]).await;

    let mut cfg = config(&server);
    cfg.check_server_version = false;
    let session = NvrSession::connect(cfg).await.unwrap();
    assert!(!session.server_info().is_supported_version);
}

#[tokio::test]
async fn test_unknown_model_fails_connect() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.10.13", None)).await;
    let mut odd = camera("x", true, "CONNECTED", "GMT+2");
    odd["model"] = json!("UVC G9 Hologram");
    mount_cameras(&server, vec![camera("a", true, "CONNECTED", "GMT+2"), odd]).await;

    let err = NvrSession::connect(config(&server)).await.err().unwrap();
    assert!(matches!(
        err,
        CoreError::ModelCompatibility { ref model, .. } if model == "UVC G9 Hologram"
    ));
}

// ── UTC offset resolution ───────────────────────────────────────────

async fn offset_for(timezones: &[&str], explicit: Option<i32>) -> Option<i32> {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.10.13", None)).await;
    let cameras = timezones
        .iter()
        .enumerate()
        .map(|(i, tz)| camera(&format!("c{i}"), true, "CONNECTED", tz))
        .collect();
    mount_cameras(&server, cameras).await;
    mount_recordings(&server, vec![]).await;

    let mut cfg = config(&server);
    cfg.utc_offset_secs = explicit;
    NvrSession::connect(cfg).await.unwrap().utc_offset()
}

#[tokio::test]
async fn test_offset_needs_unanimous_cameras() {
    assert_eq!(offset_for(&["GMT+1", "GMT+2", "GMT+3"], None).await, None);
    assert_eq!(offset_for(&["GMT+5", "GMT+5", "GMT+5"], None).await, Some(18_000));
    assert_eq!(offset_for(&[], None).await, None);
}

#[tokio::test]
async fn test_explicit_offset_wins() {
    assert_eq!(offset_for(&["GMT+5"], Some(12_345)).await, Some(12_345));
}

#[tokio::test]
async fn test_bootstrap_offset_beats_cameras() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.10.13", Some("GMT-03:30"))).await;
    mount_cameras(&server, vec![camera("a", true, "CONNECTED", "GMT+5")]).await;
    mount_recordings(&server, vec![]).await;

    let session = NvrSession::connect(config(&server)).await.unwrap();
    assert_eq!(session.utc_offset(), Some(-12_600));
}

// ── Camera refresh ──────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_reconciles_and_survives_bad_listing() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.10.13", None)).await;
    mount_recordings(&server, vec![]).await;

    // Startup listing, then a changed listing, then an outage.
    Mock::given(method("GET"))
        .and(path(api_path("camera")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [
            camera("a", true, "CONNECTED", "GMT+2"),
            camera("b", true, "CONNECTED", "GMT+2"),
        ]})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("camera")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [
            camera("b", true, "DISCONNECTED", "GMT+2"),
            camera("d", true, "CONNECTED", "GMT+2"),
        ]})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("camera")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = NvrSession::connect(config(&server)).await.unwrap();
    assert_eq!(
        sorted_ids(session.active_cameras().iter().map(|c| &c.id)),
        ["a", "b"]
    );

    session.refresh_cameras().await.unwrap();
    assert_eq!(
        sorted_ids(session.cameras().iter().map(|c| &c.id)),
        ["b", "d"]
    );
    assert_eq!(
        sorted_ids(session.active_cameras().iter().map(|c| &c.id)),
        ["d"]
    );

    session.refresh_cameras().await.unwrap();
    assert_eq!(
        sorted_ids(session.cameras().iter().map(|c| &c.id)),
        ["b", "d"]
    );
    assert_eq!(
        sorted_ids(session.managed_cameras().iter().map(|c| &c.id)),
        ["b", "d"]
    );
}

#[tokio::test]
async fn test_camera_lookup_by_name_or_overlay() {
    let (_server, session) = setup().await;
    assert_eq!(session.get_camera("a").unwrap().id.as_str(), "a");
    assert_eq!(session.get_camera("CAM A").unwrap().id.as_str(), "a");
    assert_eq!(session.get_camera("Tag A").unwrap().id.as_str(), "a");
    assert!(session.get_camera("nope").is_none());
    assert!(matches!(
        session.find_camera("nope"),
        Err(CoreError::NotFound { .. })
    ));
}

// ── Camera edits ────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_isp_clamps_and_caches() {
    let (server, mut session) = setup().await;

    let mut updated = camera("a", true, "CONNECTED", "GMT+2");
    updated["ispSettings"]["brightness"] = json!(100);
    Mock::given(method("PUT"))
        .and(path(api_path("camera/a")))
        .and(body_partial_json(json!({ "ispSettings": { "brightness": 100 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [updated] })))
        .expect(1)
        .mount(&server)
        .await;

    let id = EntityId::from("a");
    let applied = session
        .set_isp(&id, IspSetting::Brightness, 250)
        .await
        .unwrap();
    assert_eq!(applied, 100);
    assert_eq!(
        session.get_isp(&id, IspSetting::Brightness).unwrap(),
        Some(100)
    );
}

#[tokio::test]
async fn test_isp_setting_outside_model_is_unsupported() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.10.13", None)).await;
    let mut micro = camera("m", true, "CONNECTED", "GMT+2");
    micro["model"] = json!("UVC Micro");
    mount_cameras(&server, vec![micro]).await;
    mount_recordings(&server, vec![]).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = NvrSession::connect(config(&server)).await.unwrap();
    let err = session
        .set_isp(&EntityId::from("m"), IspSetting::Wdr, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Unsupported { .. }));
}

#[tokio::test]
async fn test_overlay_text_update() {
    let (server, mut session) = setup().await;

    let mut updated = camera("a", true, "CONNECTED", "GMT+2");
    updated["osdSettings"] = json!({ "tag": "Driveway", "overrideMessage": true });
    Mock::given(method("PUT"))
        .and(path(api_path("camera/a")))
        .and(body_partial_json(json!({
            "osdSettings": { "tag": "Driveway", "overrideMessage": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    let cam = session
        .set_onscreen_text(&EntityId::from("a"), "  Driveway ")
        .await
        .unwrap();
    assert_eq!(cam.overlay_text, "Driveway");
    assert_eq!(session.get_camera("driveway").unwrap().id.as_str(), "a");
}

#[tokio::test]
async fn test_export_clip_uses_session_offset() {
    let (server, mut session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("video/camera")))
        .and(query_param("startTime", "1543190400000"))
        .and(query_param("endTime", "1543190700000"))
        .and(query_param("cameras[]", "a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"mp4".to_vec())
                .insert_header("content-type", "video/mp4"),
        )
        .expect(1)
        .mount(&server)
        .await;

    // NVR-local 02:00 and 02:05:59 at GMT+2 are 00:00Z and 00:05Z.
    let resp = session
        .export_clip(
            &EntityId::from("a"),
            "2018-11-26 02:00",
            "2018-11-26T02:05:59",
            Some(RawOutput::Bytes),
        )
        .await
        .unwrap();
    assert!(matches!(resp, ApiResponse::Binary(ref body) if body.as_ref() == b"mp4"));
}

// ── Recordings ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_lock_recording_updates_cache() {
    let (server, mut session) = setup().await;

    let mut locked = recording("r1", "a", "motionRecording");
    locked["locked"] = json!(true);
    Mock::given(method("PUT"))
        .and(path(api_path("recording/r1")))
        .and(body_partial_json(json!({ "locked": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [locked] })))
        .expect(1)
        .mount(&server)
        .await;

    let id = EntityId::from("r1");
    let rec = session.lock_recording(&id).await.unwrap();
    assert!(rec.is_locked());
    assert!(session.recordings().get(&id).unwrap().is_locked());
}

#[tokio::test]
async fn test_delete_recording_drops_from_cache() {
    let (server, mut session) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api_path("recording")))
        .and(query_param("recordings[]", "r1"))
        .and(query_param("confirmed", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let id = EntityId::from("r1");
    assert!(session.delete_recording(&id).await.unwrap());
    assert!(!session.recordings().contains(&id));
}

#[tokio::test]
async fn test_failed_delete_keeps_cache() {
    let (server, mut session) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(api_path("recording")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let id = EntityId::from("r1");
    assert!(!session.delete_recording(&id).await.unwrap());
    assert!(session.recordings().contains(&id));
}

#[tokio::test]
async fn test_ids_only_listing_fetches_each_recording() {
    let (server, mut session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("recording")))
        .and(query_param("idsOnly", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": ["r7", "r8"] })))
        // Outranks the plain listing mounted by setup().
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    for id in ["r7", "r8"] {
        Mock::given(method("GET"))
            .and(path(api_path(&format!("recording/{id}"))))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(recording(id, "a", "motionRecording")),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let query = RecordingQuery {
        ids_only: true,
        ..RecordingQuery::default()
    };
    let recs = session.get_recordings(&query).await.unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(session.recordings().len(), 3);
}

#[tokio::test]
async fn test_full_time_recording_has_no_motion_map() {
    let server = MockServer::start().await;
    mount_bootstrap(&server, bootstrap("3.10.13", None)).await;
    mount_cameras(&server, vec![camera("a", true, "CONNECTED", "GMT+2")]).await;
    mount_recordings(&server, vec![recording("f1", "a", "fullTimeRecording")]).await;
    Mock::given(method("GET"))
        .and(path(api_path("recording/f1/motion")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = NvrSession::connect(config(&server)).await.unwrap();
    let resp = session
        .recording_motion(&EntityId::from("f1"), Some(RawOutput::Bytes))
        .await
        .unwrap();
    assert!(resp.is_no_data());
}

#[tokio::test]
async fn test_thumbnail_path_uses_local_day() {
    let (server, mut session) = setup().await;

    // 2018-11-26T00:00Z is 02:00 on the same day at GMT+2.
    Mock::given(method("GET"))
        .and(path(api_path("snapshot/recording/a/2018/11/26/r1")))
        .and(query_param("width", "600"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"jpg".to_vec())
                .insert_header("content-type", "image/jpeg"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("thumb.jpg");
    let resp = session
        .recording_thumbnail(
            &EntityId::from("r1"),
            None,
            Some(RawOutput::File(target.clone())),
        )
        .await
        .unwrap();
    assert_eq!(resp, ApiResponse::Saved(target.clone()));
    assert_eq!(std::fs::read(target).unwrap(), b"jpg");
}
