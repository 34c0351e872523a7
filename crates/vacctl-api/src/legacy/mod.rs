// Legacy API
//
// One endpoint per action, flat JSON status object. Paths are relative to
// the device root.

pub mod models;

use serde_json::json;

use crate::error::Error;
use crate::transport::ApiRequest;
use models::{LegacyFirmware, LegacyStatus};

/// Endpoint paths for the legacy API.
pub mod paths {
    pub const STATUS: &str = "api/current_status";
    pub const START: &str = "api/start_cleaning";
    pub const STOP: &str = "api/stop_cleaning";
    pub const PAUSE: &str = "api/pause_cleaning";
    pub const SPOT: &str = "api/spot_clean";
    pub const HOME: &str = "api/drive_home";
    pub const FIND: &str = "api/find_robot";
    pub const FAN_SPEED: &str = "api/fanspeed";
    pub const FIRMWARE: &str = "api/get_fw_version";
}

// ── Requests ─────────────────────────────────────────────────────────

/// `GET /api/current_status`
pub fn status_request() -> ApiRequest {
    ApiRequest::get(paths::STATUS)
}

/// Body-less `PUT` to one of the per-action endpoints in [`paths`].
pub fn action_request(path: &str) -> ApiRequest {
    ApiRequest::put(path)
}

/// `PUT /api/find_robot` with `{"action": "locate"}`. Some builds ignore
/// a body-less locate.
pub fn locate_request() -> ApiRequest {
    ApiRequest::put(paths::FIND).with_body(json!({ "action": "locate" }))
}

/// `PUT /api/fanspeed` with `{"speed": n}`
pub fn fan_speed_request(speed: u8) -> ApiRequest {
    ApiRequest::put(paths::FAN_SPEED).with_body(json!({ "speed": speed }))
}

/// `GET /api/get_fw_version`
pub fn firmware_request() -> ApiRequest {
    ApiRequest::get(paths::FIRMWARE)
}

// ── Decoding ─────────────────────────────────────────────────────────

/// Decode a `current_status` body. Anything that is not a JSON object with
/// at least `state` and `battery` is rejected.
pub fn decode_status(body: &[u8]) -> Result<LegacyStatus, Error> {
    serde_json::from_slice(body).map_err(|e| Error::decode(&e, body))
}

/// Decode a `get_fw_version` body.
pub fn decode_firmware(body: &[u8]) -> Result<LegacyFirmware, Error> {
    serde_json::from_slice(body).map_err(|e| Error::decode(&e, body))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn minimal_status_decodes() {
        let status = decode_status(br#"{"state":5,"battery":80}"#).unwrap();
        assert_eq!(status.state, 5);
        assert_eq!(status.battery, 80);
        assert_eq!(status.fan_power, None);
        assert!(status.extra.is_empty());
    }

    #[test]
    fn unknown_fields_land_in_extra() {
        let body = br#"{"state":8,"battery":100,"fan_power":60,"dnd_enabled":0,"in_cleaning":0}"#;
        let status = decode_status(body).unwrap();
        assert_eq!(status.fan_power, Some(60));
        assert_eq!(status.extra.len(), 2);
        assert!(status.extra.contains_key("dnd_enabled"));
    }

    #[test]
    fn array_body_is_rejected() {
        let err = decode_status(br#"[{"state":5,"battery":80}]"#).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn missing_battery_is_rejected() {
        let err = decode_status(br#"{"state":5}"#).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn fan_speed_request_carries_integer_body() {
        let req = fan_speed_request(105);
        assert_eq!(req.method, reqwest::Method::PUT);
        assert_eq!(req.path, "api/fanspeed");
        assert_eq!(req.body, Some(json!({ "speed": 105 })));
    }

    #[test]
    fn locate_request_names_the_action() {
        let req = locate_request();
        assert_eq!(req.method, reqwest::Method::PUT);
        assert_eq!(req.path, "api/find_robot");
        assert_eq!(req.body, Some(json!({ "action": "locate" })));
    }

    #[test]
    fn firmware_version_decodes() {
        let fw = decode_firmware(br#"{"version":"0.10.9","build":"1"}"#).unwrap();
        assert_eq!(fw.version, "0.10.9");
    }
}
