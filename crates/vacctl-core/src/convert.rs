// ── Wire-to-canonical conversions ──
//
// Bridges raw `vacctl_api` wire models into `CanonicalStatus`. Unmapped
// wire values become `Unknown` / `None`; only a missing required record is
// an error.

use vacctl_api::legacy::models::LegacyStatus;
use vacctl_api::modern::models::StateAttribute;

use crate::error::CoreError;
use crate::model::{BatteryChargeState, CanonicalStatus, CleanerState, CleaningMode, FanPower};

// ── Legacy ─────────────────────────────────────────────────────────

/// Map the legacy numeric state code to `(state, mode)`.
///
/// Known codes: 1=starting, 2=charger disconnected, 3=idle, 4=remote
/// control, 5=cleaning, 6=returning, 7=manual, 8=charging, 9=charging
/// problem, 10=paused, 11=spot, 12=error, 13=shutting down, 14=updating,
/// 15=docking, 16=going to target, 17=zone cleaning, 18=room cleaning.
fn map_legacy_state(code: i64) -> (CleanerState, CleaningMode) {
    match code {
        3 => (CleanerState::Idle, CleaningMode::None),
        4 | 7 => (CleanerState::ManualControl, CleaningMode::None),
        5 => (CleanerState::Cleaning, CleaningMode::None),
        6 | 15 => (CleanerState::Returning, CleaningMode::None),
        8 => (CleanerState::Charging, CleaningMode::None),
        10 => (CleanerState::Paused, CleaningMode::None),
        11 => (CleanerState::SpotCleaning, CleaningMode::Spot),
        12 => (CleanerState::Error, CleaningMode::None),
        16 => (CleanerState::Moving, CleaningMode::None),
        17 => (CleanerState::Cleaning, CleaningMode::Zone),
        18 => (CleanerState::Cleaning, CleaningMode::Section),
        _ => (CleanerState::Unknown, CleaningMode::None),
    }
}

/// Legacy firmware has no charge flag; derive it from the state code.
///
/// Only an off-dock or faulted charger reads as discharging. Every other
/// code reports `Charged`, as legacy bridges have always done.
fn legacy_charge_state(code: i64) -> BatteryChargeState {
    match code {
        8 => BatteryChargeState::Charging,
        2 | 9 => BatteryChargeState::Discharging,
        _ => BatteryChargeState::Charged,
    }
}

impl From<LegacyStatus> for CanonicalStatus {
    fn from(raw: LegacyStatus) -> Self {
        let (state, cleaning_mode) = map_legacy_state(raw.state);
        CanonicalStatus {
            state,
            cleaning_mode,
            battery_level: raw.battery.min(100),
            battery_charge_state: legacy_charge_state(raw.state),
            fan_power: raw.fan_power.map(FanPower::Legacy),
        }
    }
}

// ── Modern ─────────────────────────────────────────────────────────

fn map_modern_state(value: &str) -> CleanerState {
    match value {
        "error" => CleanerState::Error,
        "docked" => CleanerState::Docked,
        "idle" => CleanerState::Idle,
        "returning" => CleanerState::Returning,
        "cleaning" => CleanerState::Cleaning,
        "paused" => CleanerState::Paused,
        "manual_control" => CleanerState::ManualControl,
        "moving" => CleanerState::Moving,
        _ => CleanerState::Unknown,
    }
}

fn map_modern_mode(flag: Option<&str>) -> CleaningMode {
    match flag {
        Some("zone") => CleaningMode::Zone,
        Some("section") => CleaningMode::Section,
        Some("spot") => CleaningMode::Spot,
        Some("target") => CleaningMode::Target,
        Some("resumable") => CleaningMode::Resumable,
        _ => CleaningMode::None,
    }
}

fn map_battery_flag(flag: Option<&str>) -> BatteryChargeState {
    match flag {
        Some("charging") => BatteryChargeState::Charging,
        Some("discharging") => BatteryChargeState::Discharging,
        Some("charged" | "max") => BatteryChargeState::Charged,
        Some("none") => BatteryChargeState::NotChargeable,
        _ => BatteryChargeState::Unknown,
    }
}

/// Scan a v2 attribute array for the status, battery, and fan-speed
/// records. The first record of each kind wins; everything else is skipped.
pub(crate) fn status_from_attributes(
    attrs: &[StateAttribute],
) -> Result<CanonicalStatus, CoreError> {
    let mut state = None;
    let mut battery = None;
    let mut fan_power = None;

    for attr in attrs {
        match attr {
            StateAttribute::StatusStateAttribute { value, flag } if state.is_none() => {
                state = Some((map_modern_state(value), map_modern_mode(flag.as_deref())));
            }
            StateAttribute::BatteryStateAttribute { level, flag } if battery.is_none() => {
                battery = Some(((*level).min(100), map_battery_flag(flag.as_deref())));
            }
            other => {
                if fan_power.is_none() {
                    fan_power = other.fan_speed().map(|s| FanPower::Modern(s.to_owned()));
                }
            }
        }
    }

    let (state, cleaning_mode) = state.ok_or_else(|| CoreError::Parse {
        message: "status attributes carry no StatusStateAttribute".into(),
    })?;
    let (battery_level, battery_charge_state) = battery.ok_or_else(|| CoreError::Parse {
        message: "status attributes carry no BatteryStateAttribute".into(),
    })?;

    Ok(CanonicalStatus {
        state,
        cleaning_mode,
        battery_level,
        battery_charge_state,
        fan_power,
    })
}
