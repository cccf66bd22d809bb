// ── Camera domain type ──

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::document::{bool_field, str_field};
use super::entity_id::{EntityId, MacAddress};
use super::isp::{IspSetting, ModelCapabilities, model_capabilities};
use crate::error::CoreError;
use crate::time::parse_gmt_offset;

/// Snapshot of one camera as last reported by the NVR.
///
/// Replaced wholesale on every refresh; edits go through
/// [`NvrSession`](crate::NvrSession) and come back as a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub id: EntityId,
    pub name: String,
    pub model: String,
    pub platform: Option<String>,
    /// On-screen overlay text (`osdSettings.tag`).
    pub overlay_text: String,
    pub mac: MacAddress,
    pub state: Option<String>,
    /// Adopted by this NVR.
    pub managed: bool,
    /// `state == "CONNECTED"`.
    pub connected: bool,
    /// Parsed from `deviceSettings.timezone`; `None` when absent or garbled.
    pub utc_offset: Option<i32>,
    #[serde(skip)]
    document: Value,
}

impl Camera {
    /// Build a camera from its NVR document.
    ///
    /// Fails with [`CoreError::ModelCompatibility`] for models outside the
    /// known-models table.
    pub fn from_json(document: Value) -> Result<Self, CoreError> {
        let id = str_field(&document, &["_id"]).ok_or_else(|| CoreError::Api {
            message: "camera document has no _id".into(),
        })?;
        let model = str_field(&document, &["model"]).unwrap_or_default();
        if model_capabilities(&model).is_none() {
            return Err(CoreError::ModelCompatibility {
                camera_id: id,
                model,
            });
        }

        let state = str_field(&document, &["state"]);
        Ok(Self {
            id: EntityId::from(id),
            name: str_field(&document, &["name"]).unwrap_or_default(),
            platform: str_field(&document, &["platform"]),
            overlay_text: str_field(&document, &["osdSettings", "tag"]).unwrap_or_default(),
            mac: MacAddress::from_nvr(&str_field(&document, &["mac"]).unwrap_or_default()),
            managed: bool_field(&document, &["managed"]).unwrap_or(false),
            connected: state.as_deref() == Some("CONNECTED"),
            utc_offset: str_field(&document, &["deviceSettings", "timezone"])
                .and_then(|tz| parse_gmt_offset(&tz).ok()),
            state,
            model,
            document,
        })
    }

    /// Managed and currently connected.
    pub fn is_active(&self) -> bool {
        self.managed && self.connected
    }

    /// The raw document as last received.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn capabilities(&self) -> Option<&'static ModelCapabilities> {
        model_capabilities(&self.model)
    }

    pub fn supports(&self, setting: IspSetting) -> bool {
        self.capabilities().is_some_and(|c| c.supports(setting))
    }

    /// Current value of an ISP setting, if the camera reports it.
    pub fn isp_value(&self, setting: IspSetting) -> Option<i64> {
        self.document
            .get("ispSettings")?
            .get(setting.range().key)?
            .as_i64()
    }

    // ── Edited documents ─────────────────────────────────────────────

    /// Copy of the document with `section` patched by `edit`.
    fn edited(&self, section: &str, edit: impl FnOnce(&mut Map<String, Value>)) -> Value {
        let mut doc = self.document.clone();
        if let Value::Object(root) = &mut doc {
            let entry = root
                .entry(section.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(map) = entry {
                edit(map);
            }
        }
        doc
    }

    pub(crate) fn with_overlay_text(&self, text: &str) -> Value {
        self.edited("osdSettings", |osd| {
            osd.insert("overrideMessage".into(), json!(true));
            osd.insert("tag".into(), json!(text.trim()));
        })
    }

    pub(crate) fn with_timestamp_overlay(&self, enabled: bool) -> Value {
        self.edited("osdSettings", |osd| {
            osd.insert("enableDate".into(), json!(i32::from(enabled)));
        })
    }

    pub(crate) fn with_watermark(&self, enabled: bool) -> Value {
        self.edited("osdSettings", |osd| {
            osd.insert("enableLogo".into(), json!(i32::from(enabled)));
        })
    }

    pub(crate) fn with_recording_settings(&self, update: &RecordingSettingsUpdate) -> Value {
        self.edited("recordingSettings", |rec| {
            if let Some(v) = update.full_time_record_enabled {
                rec.insert("fullTimeRecordEnabled".into(), json!(v));
            }
            if let Some(v) = update.motion_record_enabled {
                rec.insert("motionRecordEnabled".into(), json!(v));
            }
            if let Some(v) = update.pre_padding_secs {
                rec.insert("prePaddingSecs".into(), json!(v));
            }
            if let Some(v) = update.post_padding_secs {
                rec.insert("postPaddingSecs".into(), json!(v));
            }
        })
    }

    pub(crate) fn with_isp(&self, setting: IspSetting, value: i64) -> Value {
        self.edited("ispSettings", |isp| {
            isp.insert(setting.range().key.into(), json!(value));
        })
    }
}

/// Partial update of a camera's recording settings. `None` leaves the
/// field unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingSettingsUpdate {
    pub full_time_record_enabled: Option<bool>,
    pub motion_record_enabled: Option<bool>,
    pub pre_padding_secs: Option<u32>,
    pub post_padding_secs: Option<u32>,
}

impl RecordingSettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
