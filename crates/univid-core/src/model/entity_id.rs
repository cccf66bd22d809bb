// ── Core identity types ──
//
// EntityId and MacAddress are shared by every domain type. NVR ids are
// MongoDB ObjectId hex strings, kept opaque.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

// ── EntityId ────────────────────────────────────────────────────────

/// Server-assigned identifier for a camera or recording.
///
/// Compared as an opaque token; never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ── MacAddress ──────────────────────────────────────────────────────

/// Camera MAC address in lowercase colon-separated form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Placeholder for cameras reporting a malformed MAC.
    pub const UNKNOWN: &'static str = "ff:ff:ff:ff:ff:ff";

    /// Format the NVR's bare 12-hex-digit MAC (`FCECDAD81CD1`).
    ///
    /// Anything that is not exactly twelve hex digits becomes
    /// [`MacAddress::UNKNOWN`].
    pub fn from_nvr(raw: &str) -> Self {
        if raw.len() != 12 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self(Self::UNKNOWN.to_owned());
        }
        let lower = raw.to_ascii_lowercase();
        let pairs: Vec<&str> = (0..6).filter_map(|i| lower.get(i * 2..i * 2 + 2)).collect();
        Self(pairs.join(":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_is_opaque() {
        let id: EntityId = "5bfb35230f12f177788ec2ac".parse().unwrap();
        assert_eq!(id.as_str(), "5bfb35230f12f177788ec2ac");
        assert_eq!(id.to_string(), "5bfb35230f12f177788ec2ac");
        assert_eq!(id, EntityId::from("5bfb35230f12f177788ec2ac"));
    }

    #[test]
    fn entity_id_serializes_as_plain_string() {
        let id = EntityId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
    }

    #[test]
    fn mac_from_bare_hex() {
        assert_eq!(
            MacAddress::from_nvr("FCECDAD81CD1").as_str(),
            "fc:ec:da:d8:1c:d1"
        );
    }

    #[test]
    fn malformed_mac_is_placeholder() {
        for raw in ["", "FCECDAD81CD", "FCECDAD81CD1AA", "ZZECDAD81CD1"] {
            assert_eq!(MacAddress::from_nvr(raw).as_str(), MacAddress::UNKNOWN);
        }
    }
}
