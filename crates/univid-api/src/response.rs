// Decoded response bodies and the caller's choice of raw output mode.

use std::path::PathBuf;

use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;

/// How to hand back a successful response that is not JSON.
///
/// JSON bodies are always parsed regardless of this setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawOutput {
    /// Decode the body as UTF-8 text, falling back to raw bytes.
    #[default]
    Text,
    /// Return the body untouched.
    Bytes,
    /// Stream the body into the named file.
    File(PathBuf),
}

/// The outcome of one logical request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// A 2xx response with a JSON content type.
    Json(Value),
    /// A 2xx non-JSON response decoded as text.
    Text(String),
    /// A 2xx non-JSON response returned as bytes.
    Binary(Bytes),
    /// A 2xx non-JSON response written to disk.
    Saved(PathBuf),
    /// Any non-2xx status other than 401 or a structured 400. Polling
    /// callers treat this as "no data this round".
    NoData { status: u16 },
}

impl ApiResponse {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    pub fn json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Extract the `data` array from a `{ "data": [...] }` document.
    ///
    /// Returns `None` for anything that is not a well-formed collection
    /// document.
    pub fn into_data(self) -> Option<Vec<Value>> {
        match self {
            Self::Json(Value::Object(mut map)) => match map.remove("data") {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Body of an HTTP 400 carrying the NVR's error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct VendorError {
    pub rc: String,
    pub message: Option<String>,
    #[serde(rename = "causedBy")]
    pub caused_by: Option<Value>,
}

impl VendorError {
    pub(crate) fn cause_text(&self) -> Option<String> {
        match self.caused_by.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
