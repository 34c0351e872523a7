// ── Canonical status types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Robot state, a superset of what both dialects report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CleanerState {
    Idle,
    Docked,
    Cleaning,
    SpotCleaning,
    Returning,
    Paused,
    ManualControl,
    Moving,
    Error,
    Charging,
    Unknown,
}

impl CleanerState {
    /// States in which the device is parked and slow polling is enough.
    pub fn is_resting(self) -> bool {
        matches!(self, Self::Idle | Self::Docked | Self::Charging)
    }
}

/// Active cleaning mode. Only the modern dialect reports it directly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CleaningMode {
    #[default]
    None,
    Zone,
    Section,
    Spot,
    Target,
    Resumable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BatteryChargeState {
    Charging,
    Discharging,
    Charged,
    NotChargeable,
    Unknown,
}

/// Dialect-specific fan power.
///
/// Values are only ever compared against presets produced by the same
/// dialect, so a `Legacy(60)` never equals a `Modern("medium")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FanPower {
    /// Raw fan power 0-105.
    Legacy(u8),
    /// Preset label (`low`, `medium`, `high`, `max`, `off`, ...).
    Modern(String),
}

impl std::fmt::Display for FanPower {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy(v) => write!(f, "{v}"),
            Self::Modern(label) => f.write_str(label),
        }
    }
}

/// A fully populated snapshot from one successful parse.
///
/// There is no `Default`: a status either comes out of `Protocol::parse_status`
/// complete or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalStatus {
    pub state: CleanerState,
    pub cleaning_mode: CleaningMode,
    /// Percentage, clamped to 0-100.
    pub battery_level: u8,
    pub battery_charge_state: BatteryChargeState,
    pub fan_power: Option<FanPower>,
}

impl CanonicalStatus {
    pub fn is_cleaning(&self) -> bool {
        self.state == CleanerState::Cleaning
    }

    /// Spot cleaning either as its own state (legacy) or as the cleaning
    /// mode flag (modern). The flag alone counts, so a paused spot run is
    /// still a spot run.
    pub fn is_spot_cleaning(&self) -> bool {
        self.state == CleanerState::SpotCleaning || self.cleaning_mode == CleaningMode::Spot
    }

    pub fn is_going_home(&self) -> bool {
        self.state == CleanerState::Returning
    }

    pub fn is_charging(&self) -> bool {
        self.battery_charge_state == BatteryChargeState::Charging
    }
}
