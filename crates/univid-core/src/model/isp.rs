// ── Image signal processor settings ──
//
// Every tunable is a clamped integer under the camera's `ispSettings`
// object. Which ones a camera accepts depends on its model.

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A tunable image setting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum IspSetting {
    Brightness,
    Contrast,
    Saturation,
    Hue,
    Denoise,
    Sharpness,
    Wdr,
    IrLedLevel,
}

/// Where a setting lives in the camera document and its accepted bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IspRange {
    /// Key under `ispSettings`.
    pub key: &'static str,
    pub floor: i64,
    pub ceiling: i64,
}

impl IspSetting {
    pub fn range(self) -> IspRange {
        let (key, floor, ceiling) = match self {
            Self::Brightness => ("brightness", 0, 100),
            Self::Contrast => ("contrast", 0, 100),
            Self::Saturation => ("saturation", 0, 100),
            Self::Hue => ("hue", 0, 100),
            Self::Denoise => ("denoise", 0, 100),
            Self::Sharpness => ("sharpness", 0, 100),
            Self::Wdr => ("wdr", 0, 3),
            Self::IrLedLevel => ("irLedLevel", 0, 215),
        };
        IspRange { key, floor, ceiling }
    }

    pub fn clamp(self, value: i64) -> i64 {
        let r = self.range();
        value.clamp(r.floor, r.ceiling)
    }
}

// ── Model capabilities ──────────────────────────────────────────────

/// What a camera model can do beyond the common picture controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCapabilities {
    pub name: &'static str,
    pub wdr: bool,
    pub ir_leds: bool,
}

const fn model(name: &'static str, wdr: bool, ir_leds: bool) -> ModelCapabilities {
    ModelCapabilities { name, wdr, ir_leds }
}

/// Camera models this library knows how to drive.
pub const KNOWN_MODELS: &[ModelCapabilities] = &[
    model("airCam", false, true),
    model("airCam Dome", false, true),
    model("airCam Mini", false, false),
    model("UVC", false, true),
    model("UVC Dome", false, true),
    model("UVC Micro", false, false),
    model("UVC Pro", false, true),
    model("UVC G3", true, true),
    model("UVC G3 Dome", true, true),
    model("UVC G3 Flex", true, true),
    model("UVC G3 Micro", true, false),
    model("UVC G3 Pro", true, true),
    model("UVC G4 Bullet", true, true),
    model("UVC G4 Dome", true, true),
    model("UVC G4 Pro", true, true),
    model("UVC G4 PTZ", true, true),
];

pub fn model_capabilities(name: &str) -> Option<&'static ModelCapabilities> {
    KNOWN_MODELS.iter().find(|m| m.name == name)
}

impl ModelCapabilities {
    pub fn supports(&self, setting: IspSetting) -> bool {
        match setting {
            IspSetting::Wdr => self.wdr,
            IspSetting::IrLedLevel => self.ir_leds,
            _ => true,
        }
    }

    pub fn supported_settings(&self) -> Vec<IspSetting> {
        IspSetting::iter().filter(|s| self.supports(*s)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_table_bounds() {
        assert_eq!(IspSetting::Brightness.clamp(150), 100);
        assert_eq!(IspSetting::Brightness.clamp(-4), 0);
        assert_eq!(IspSetting::Wdr.clamp(7), 3);
        assert_eq!(IspSetting::IrLedLevel.clamp(200), 200);
        assert_eq!(IspSetting::IrLedLevel.clamp(300), 215);
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!("ir-led-level".parse::<IspSetting>().unwrap(), IspSetting::IrLedLevel);
        assert_eq!("WDR".parse::<IspSetting>().unwrap(), IspSetting::Wdr);
        assert_eq!(IspSetting::IrLedLevel.range().key, "irLedLevel");
    }

    #[test]
    fn model_support() {
        let micro = model_capabilities("UVC G3 Micro").unwrap();
        assert!(micro.supports(IspSetting::Wdr));
        assert!(!micro.supports(IspSetting::IrLedLevel));

        let aircam = model_capabilities("airCam").unwrap();
        assert!(!aircam.supports(IspSetting::Wdr));
        assert_eq!(aircam.supported_settings().len(), 7);

        assert!(model_capabilities("Some unknown model").is_none());
    }
}
