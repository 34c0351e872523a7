// ── Runtime device configuration ──
//
// Describes *which* vacuum to talk to and how to pace polling and
// commands. Carries credential data but never touches disk; the CLI (or
// any other host) builds a `VacuumConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use vacctl_api::TransportConfig;

use crate::protocol::Protocol;

/// Named presets used by the high-speed and mop toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerControl {
    /// Preset restored when high-speed or mop mode is switched off.
    pub default_speed: String,
    /// Preset applied when high-speed mode is switched on.
    pub high_speed: String,
    pub mop_enabled: bool,
}

impl Default for PowerControl {
    fn default() -> Self {
        Self {
            default_speed: "balanced".into(),
            high_speed: "max".into(),
            mop_enabled: false,
        }
    }
}

/// Adaptive polling intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Any state where something is happening.
    pub busy: Duration,
    /// Idle, docked, or charging.
    pub idle: Duration,
    /// Before the first successful fetch.
    pub bootstrap: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            busy: Duration::from_secs(10),
            idle: Duration::from_secs(120),
            bootstrap: Duration::from_secs(10),
        }
    }
}

/// Configuration for one vacuum session.
#[derive(Debug, Clone)]
pub struct VacuumConfig {
    /// Device address: IP, `ip:port`, or full URL.
    pub host: String,
    pub protocol: Protocol,
    pub power_control: PowerControl,
    pub intervals: PollIntervals,
    /// Wait between a command and the follow-up refresh.
    pub settle_delay: Duration,
    /// Refuse stop / pause outright when the state disallows it instead of
    /// reporting the violation after issuing the command anyway.
    pub strict_state_guard: bool,
    pub timeout: Duration,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl VacuumConfig {
    pub fn new(host: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            host: host.into(),
            protocol,
            power_control: PowerControl::default(),
            intervals: PollIntervals::default(),
            settle_delay: Duration::from_millis(2000),
            strict_state_guard: false,
            timeout: Duration::from_secs(10),
            username: None,
            password: None,
        }
    }

    /// Transport settings derived from this config. Basic auth is only
    /// attached when both halves of the credential pair are present.
    pub fn transport(&self) -> TransportConfig {
        let transport = TransportConfig {
            timeout: self.timeout,
            ..TransportConfig::default()
        };
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => transport.with_basic_auth(user.clone(), pass.clone()),
            _ => transport,
        }
    }
}
