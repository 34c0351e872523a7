// Valetudo v2 API
//
// A single capability endpoint per feature, driven by an `action` field,
// and a tagged-attribute array for state.

pub mod models;

use serde_json::json;

use crate::error::Error;
use crate::transport::ApiRequest;
use models::{StateAttribute, ValetudoVersion};

/// Endpoint paths for the v2 API.
pub mod paths {
    pub const STATE_ATTRIBUTES: &str = "api/v2/robot/state/attributes";
    pub const BASIC_CONTROL: &str = "api/v2/robot/capabilities/BasicControlCapability";
    pub const LOCATE: &str = "api/v2/robot/capabilities/LocateCapability";
    pub const FAN_SPEED_PRESET: &str =
        "api/v2/robot/capabilities/FanSpeedControlCapability/preset";
    pub const VERSION: &str = "api/v2/valetudo/version";
}

// ── Requests ─────────────────────────────────────────────────────────

/// `GET /api/v2/robot/state/attributes`
pub fn attributes_request() -> ApiRequest {
    ApiRequest::get(paths::STATE_ATTRIBUTES)
}

/// `PUT .../BasicControlCapability` with `{"action": action}`
/// (`start`, `stop`, `pause`, `home`).
pub fn basic_control_request(action: &str) -> ApiRequest {
    ApiRequest::put(paths::BASIC_CONTROL).with_body(json!({ "action": action }))
}

/// `PUT .../LocateCapability` with `{"action": "locate"}`
pub fn locate_request() -> ApiRequest {
    ApiRequest::put(paths::LOCATE).with_body(json!({ "action": "locate" }))
}

/// `PUT .../FanSpeedControlCapability/preset` with `{"name": preset}`
pub fn fan_speed_preset_request(preset: &str) -> ApiRequest {
    ApiRequest::put(paths::FAN_SPEED_PRESET).with_body(json!({ "name": preset }))
}

/// `GET /api/v2/valetudo/version`
pub fn version_request() -> ApiRequest {
    ApiRequest::get(paths::VERSION)
}

// ── Decoding ─────────────────────────────────────────────────────────

/// Decode the attribute array. A body that is valid JSON but not an array
/// is rejected; unknown `__class` values are kept as [`StateAttribute::Other`].
pub fn decode_attributes(body: &[u8]) -> Result<Vec<StateAttribute>, Error> {
    serde_json::from_slice(body).map_err(|e| Error::decode(&e, body))
}

/// Decode the Valetudo version document.
pub fn decode_version(body: &[u8]) -> Result<ValetudoVersion, Error> {
    serde_json::from_slice(body).map_err(|e| Error::decode(&e, body))
}
