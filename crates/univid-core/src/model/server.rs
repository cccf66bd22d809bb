// ── NVR identity from the bootstrap document ──

use serde::Serialize;
use serde_json::Value;

use super::document::str_field;

/// Name, version, and zone of the NVR, read once at session start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Raw `settings.systemSettings.gmtOffset`, present on newer releases.
    pub gmt_offset: Option<String>,
    /// Whether `version` passed the compatibility gate.
    pub is_supported_version: bool,
}

impl ServerInfo {
    /// Read the first entry of a `{ "data": [ ... ] }` bootstrap document.
    ///
    /// Missing fields stay `None`; a malformed document yields an empty
    /// `ServerInfo`.
    pub fn from_bootstrap(document: &Value) -> Self {
        let Some(entry) = document
            .get("data")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
        else {
            return Self::default();
        };

        Self {
            name: str_field(entry, &["nvrName"]),
            version: str_field(entry, &["systemInfo", "version"]),
            gmt_offset: str_field(entry, &["settings", "systemSettings", "gmtOffset"]),
            is_supported_version: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_identity_fields() {
        let info = ServerInfo::from_bootstrap(&json!({
            "data": [{
                "nvrName": "Home NVR",
                "systemInfo": { "version": "3.10.11" },
                "settings": { "systemSettings": { "gmtOffset": "GMT+2" } }
            }]
        }));
        assert_eq!(info.name.as_deref(), Some("Home NVR"));
        assert_eq!(info.version.as_deref(), Some("3.10.11"));
        assert_eq!(info.gmt_offset.as_deref(), Some("GMT+2"));
    }

    #[test]
    fn older_releases_have_no_offset() {
        let info = ServerInfo::from_bootstrap(&json!({
            "data": [{ "nvrName": "Old", "systemInfo": { "version": "3.9.12" } }]
        }));
        assert_eq!(info.gmt_offset, None);
    }

    #[test]
    fn malformed_document_is_empty() {
        assert_eq!(ServerInfo::from_bootstrap(&json!({ "data": {} })), ServerInfo::default());
        assert_eq!(ServerInfo::from_bootstrap(&json!([])), ServerInfo::default());
    }
}
