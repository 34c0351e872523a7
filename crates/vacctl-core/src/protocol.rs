// ── Dialect dispatch ──
//
// One enum, chosen once per session, that knows how to phrase every
// canonical action in the selected firmware's wire dialect and how to
// read its status back. Everything dialect-specific above `vacctl-api`
// goes through here.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use vacctl_api::{ApiRequest, legacy, modern};

use crate::convert::status_from_attributes;
use crate::error::CoreError;
use crate::model::{CanonicalStatus, CleanerState, FanPower};

/// Symbolic device actions, independent of dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Pause,
    Spot,
    Home,
    Locate,
    SetFanSpeed(FanPower),
}

impl Action {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Pause => "pause",
            Self::Spot => "spot",
            Self::Home => "home",
            Self::Locate => "locate",
            Self::SetFanSpeed(_) => "set_fan_speed",
        }
    }
}

/// Firmware API dialect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Protocol {
    /// Flat JSON API of older Valetudo / Valetudo RE builds.
    Legacy,
    /// Valetudo v2 attribute/capability API.
    #[default]
    Modern,
}

impl Protocol {
    pub fn from_legacy_flag(legacy_mode: bool) -> Self {
        if legacy_mode {
            Self::Legacy
        } else {
            Self::Modern
        }
    }

    // ── Status ───────────────────────────────────────────────────

    pub fn status_request(self) -> ApiRequest {
        match self {
            Self::Legacy => legacy::status_request(),
            Self::Modern => modern::attributes_request(),
        }
    }

    /// Parse a status body into a complete canonical snapshot.
    pub fn parse_status(self, body: &[u8]) -> Result<CanonicalStatus, CoreError> {
        match self {
            Self::Legacy => Ok(legacy::decode_status(body)?.into()),
            Self::Modern => status_from_attributes(&modern::decode_attributes(body)?),
        }
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Build the request for a device action.
    ///
    /// Fails only when `SetFanSpeed` carries a value from the other dialect.
    pub fn command_request(self, action: &Action) -> Result<ApiRequest, CoreError> {
        let req = match (self, action) {
            (Self::Legacy, Action::Start) => legacy::action_request(legacy::paths::START),
            (Self::Legacy, Action::Stop) => legacy::action_request(legacy::paths::STOP),
            (Self::Legacy, Action::Pause) => legacy::action_request(legacy::paths::PAUSE),
            (Self::Legacy, Action::Home) => legacy::action_request(legacy::paths::HOME),
            (Self::Legacy, Action::Locate) => legacy::locate_request(),
            // v2 firmware keeps spot cleaning on the old endpoint.
            (_, Action::Spot) => legacy::action_request(legacy::paths::SPOT),
            (Self::Legacy, Action::SetFanSpeed(FanPower::Legacy(speed))) => {
                legacy::fan_speed_request(*speed)
            }

            (Self::Modern, Action::Start) => modern::basic_control_request("start"),
            (Self::Modern, Action::Stop) => modern::basic_control_request("stop"),
            (Self::Modern, Action::Pause) => modern::basic_control_request("pause"),
            (Self::Modern, Action::Home) => modern::basic_control_request("home"),
            (Self::Modern, Action::Locate) => modern::locate_request(),
            (Self::Modern, Action::SetFanSpeed(FanPower::Modern(label))) => {
                modern::fan_speed_preset_request(label)
            }

            (_, Action::SetFanSpeed(other)) => {
                return Err(CoreError::Internal(format!(
                    "fan power {other} does not belong to the {self} dialect"
                )));
            }
        };
        Ok(req)
    }

    // ── Version ──────────────────────────────────────────────────

    pub fn version_request(self) -> ApiRequest {
        match self {
            Self::Legacy => legacy::firmware_request(),
            Self::Modern => modern::version_request(),
        }
    }

    pub fn parse_version(self, body: &[u8]) -> Result<String, CoreError> {
        match self {
            Self::Legacy => Ok(legacy::decode_firmware(body)?.version),
            Self::Modern => Ok(modern::decode_version(body)?.release),
        }
    }

    // ── Presets ──────────────────────────────────────────────────

    /// Resolve a symbolic speed preset to this dialect's fan power.
    pub fn speed_preset(self, name: &str) -> Result<FanPower, CoreError> {
        let name = name.trim().to_ascii_lowercase();
        let value = match self {
            Self::Legacy => match name.as_str() {
                "quiet" => Some(FanPower::Legacy(38)),
                "balanced" => Some(FanPower::Legacy(60)),
                "turbo" => Some(FanPower::Legacy(75)),
                "max" => Some(FanPower::Legacy(100)),
                "mop" => Some(FanPower::Legacy(105)),
                _ => None,
            },
            Self::Modern => {
                let label = match name.as_str() {
                    "off" | "mop" => Some("off"),
                    "min" | "quiet" | "low" => Some("low"),
                    "medium" | "balanced" => Some("medium"),
                    "max" => Some("high"),
                    "turbo" => Some("max"),
                    _ => None,
                };
                label.map(|l| FanPower::Modern(l.to_owned()))
            }
        };
        value.ok_or_else(|| CoreError::InvalidPreset {
            name,
            dialect: self.label(),
        })
    }

    // ── Guards ───────────────────────────────────────────────────

    /// States in which stop / pause is refused.
    pub fn stop_disallowed(self, state: CleanerState) -> bool {
        match self {
            Self::Legacy => matches!(
                state,
                CleanerState::Idle
                    | CleanerState::Returning
                    | CleanerState::Charging
                    | CleanerState::Paused
                    | CleanerState::SpotCleaning
                    | CleanerState::Moving
            ),
            Self::Modern => matches!(
                state,
                CleanerState::Error
                    | CleanerState::Docked
                    | CleanerState::Idle
                    | CleanerState::Returning
                    | CleanerState::ManualControl
                    | CleanerState::Moving
            ),
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Modern => "modern",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn status_paths_per_dialect() {
        assert_eq!(
            Protocol::Legacy.status_request().path,
            "api/current_status"
        );
        assert_eq!(
            Protocol::Modern.status_request().path,
            "api/v2/robot/state/attributes"
        );
    }

    #[test]
    fn modern_commands_share_capability_endpoint() {
        let stop = Protocol::Modern.command_request(&Action::Stop).unwrap();
        assert_eq!(stop.method.as_str(), "PUT");
        assert_eq!(stop.path, "api/v2/robot/capabilities/BasicControlCapability");
        assert_eq!(stop.body, Some(json!({ "action": "stop" })));

        let locate = Protocol::Modern.command_request(&Action::Locate).unwrap();
        assert_eq!(locate.path, "api/v2/robot/capabilities/LocateCapability");
        assert_eq!(locate.body, Some(json!({ "action": "locate" })));
    }

    #[test]
    fn legacy_commands_use_one_endpoint_each() {
        let home = Protocol::Legacy.command_request(&Action::Home).unwrap();
        assert_eq!(home.path, "api/drive_home");
        assert_eq!(home.body, None);

        let locate = Protocol::Legacy.command_request(&Action::Locate).unwrap();
        assert_eq!(locate.path, "api/find_robot");
        assert_eq!(locate.body, Some(json!({ "action": "locate" })));

        let fan = Protocol::Legacy
            .command_request(&Action::SetFanSpeed(FanPower::Legacy(75)))
            .unwrap();
        assert_eq!(fan.path, "api/fanspeed");
        assert_eq!(fan.body, Some(json!({ "speed": 75 })));
    }

    #[test]
    fn spot_uses_legacy_endpoint_in_both_dialects() {
        for protocol in [Protocol::Legacy, Protocol::Modern] {
            let spot = protocol.command_request(&Action::Spot).unwrap();
            assert_eq!(spot.path, "api/spot_clean");
            assert_eq!(spot.body, None);
        }
    }

    #[test]
    fn cross_dialect_fan_power_is_rejected() {
        let err = Protocol::Legacy
            .command_request(&Action::SetFanSpeed(FanPower::Modern("max".into())))
            .unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[test]
    fn preset_tables() {
        assert_eq!(
            Protocol::Legacy.speed_preset("balanced").unwrap(),
            FanPower::Legacy(60)
        );
        assert_eq!(
            Protocol::Legacy.speed_preset("MOP").unwrap(),
            FanPower::Legacy(105)
        );
        assert_eq!(
            Protocol::Modern.speed_preset("max").unwrap(),
            FanPower::Modern("high".into())
        );
        assert_eq!(
            Protocol::Modern.speed_preset("turbo").unwrap(),
            FanPower::Modern("max".into())
        );
        assert_eq!(
            Protocol::Modern.speed_preset("quiet").unwrap(),
            FanPower::Modern("low".into())
        );
    }

    #[test]
    fn unknown_presets_fail() {
        assert!(matches!(
            Protocol::Modern.speed_preset("bogus"),
            Err(CoreError::InvalidPreset { .. })
        ));
        // No legacy integer for the label-only presets.
        assert!(matches!(
            Protocol::Legacy.speed_preset("medium"),
            Err(CoreError::InvalidPreset { .. })
        ));
    }

    #[test]
    fn stop_guard_sets_differ_by_dialect() {
        assert!(Protocol::Modern.stop_disallowed(CleanerState::Docked));
        assert!(!Protocol::Modern.stop_disallowed(CleanerState::Paused));
        assert!(Protocol::Legacy.stop_disallowed(CleanerState::Paused));
        assert!(!Protocol::Legacy.stop_disallowed(CleanerState::Cleaning));
        assert!(!Protocol::Modern.stop_disallowed(CleanerState::Cleaning));
    }

    #[test]
    fn version_fields_per_dialect() {
        assert_eq!(
            Protocol::Legacy
                .parse_version(br#"{"version":"0.10.9"}"#)
                .unwrap(),
            "0.10.9"
        );
        assert_eq!(
            Protocol::Modern
                .parse_version(br#"{"release":"2024.02.0","commit":"deadbeef"}"#)
                .unwrap(),
            "2024.02.0"
        );
    }
}
