// Valetudo v2 API response types
//
// The v2 status endpoint returns a heterogeneous array of attribute
// records discriminated by `__class`. Only the classes the canonical state
// needs are modelled; every other class decodes to `Other` and is skipped.

use serde::{Deserialize, Serialize};

// ── State attributes ─────────────────────────────────────────────────

/// One record from `GET /api/v2/robot/state/attributes`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__class")]
pub enum StateAttribute {
    /// Robot state (`value`) plus the active cleaning mode (`flag`).
    StatusStateAttribute {
        value: String,
        #[serde(default)]
        flag: Option<String>,
    },
    /// Fan power label on firmware that still reports intensity directly.
    IntensityStateAttribute { value: String },
    /// Preset selection; `type = "fan_speed"` carries the fan power label.
    PresetSelectionStateAttribute {
        #[serde(rename = "type")]
        kind: String,
        value: String,
    },
    /// Battery percentage plus charge flag.
    BatteryStateAttribute {
        level: u8,
        #[serde(default)]
        flag: Option<String>,
    },
    #[serde(other)]
    Other,
}

impl StateAttribute {
    /// Fan power label if this record carries one.
    pub fn fan_speed(&self) -> Option<&str> {
        match self {
            Self::IntensityStateAttribute { value } => Some(value.as_str()),
            Self::PresetSelectionStateAttribute { kind, value } if kind == "fan_speed" => {
                Some(value.as_str())
            }
            _ => None,
        }
    }
}

// ── Version ──────────────────────────────────────────────────────────

/// Response from `GET /api/v2/valetudo/version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValetudoVersion {
    pub release: String,
    #[serde(default)]
    pub commit: Option<String>,
}
