// Legacy API response types
//
// Models for the flat JSON API served by older Valetudo / Valetudo RE
// firmware. The status object is already close to canonical; fields beyond
// the ones modelled here vary by firmware build and land in `extra`.

use serde::{Deserialize, Serialize};

// ── Status ───────────────────────────────────────────────────────────

/// Status object from `GET /api/current_status`.
///
/// `state` is the numeric miio state code (5 = cleaning, 8 = charging, ...).
/// `state` and `battery` are present on every firmware build; everything
/// else is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyStatus {
    pub state: i64,
    pub battery: u8,
    /// Raw fan power, 0-105 (105 = mop / fan off).
    #[serde(default)]
    pub fan_power: Option<u8>,
    #[serde(default)]
    pub error_code: Option<i64>,
    /// Seconds spent in the current or last cleaning run.
    #[serde(default)]
    pub clean_time: Option<u64>,
    /// Area cleaned in mm².
    #[serde(default)]
    pub clean_area: Option<u64>,
    #[serde(default)]
    pub human_state: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Firmware ─────────────────────────────────────────────────────────

/// Firmware info from `GET /api/get_fw_version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyFirmware {
    pub version: String,
    #[serde(default)]
    pub build: Option<String>,
}
