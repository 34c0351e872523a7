// ── Core error types ──
//
// User-facing errors from vacctl-core. Consumers never see reqwest errors
// or serde failures directly; the `From<vacctl_api::Error>` impl folds
// transport-layer errors into this taxonomy.
//
// `Clone` is required: a single failed fetch is delivered to every caller
// queued behind it.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Fetch errors ─────────────────────────────────────────────────
    /// Connection, timeout, or non-success HTTP response.
    #[error("Network error: {message}")]
    Network { message: String, transient: bool },

    /// The request exceeded the configured timeout.
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// The device answered, but the body was not the expected shape.
    #[error("Unexpected response from device: {message}")]
    Parse { message: String },

    /// Version query could not reach the device.
    #[error("Device unreachable: {message}")]
    DeviceUnreachable { message: String },

    // ── Command errors ───────────────────────────────────────────────
    /// The command is not valid in the device's current state.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// A fan-speed preset name is not known to the selected dialect.
    #[error("Unknown speed preset '{name}' for {dialect} firmware")]
    InvalidPreset { name: String, dialect: &'static str },

    /// The feature is disabled by configuration.
    #[error("Operation not supported: {operation} (requires {required})")]
    Unsupported { operation: String, required: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised before or instead of any device I/O.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidState { .. } | Self::InvalidPreset { .. } | Self::Unsupported { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vacctl_api::Error> for CoreError {
    fn from(err: vacctl_api::Error) -> Self {
        let transient = err.is_transient();
        match err {
            vacctl_api::Error::Deserialization { message, .. } => CoreError::Parse { message },
            vacctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid device URL: {e}"),
            },
            vacctl_api::Error::ClientBuild(message) => CoreError::Config { message },
            vacctl_api::Error::Http { status, body } => CoreError::Network {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
                transient,
            },
            vacctl_api::Error::Transport(e) if e.is_timeout() => CoreError::Timeout {
                message: e.to_string(),
            },
            vacctl_api::Error::Transport(e) => CoreError::Network {
                message: e.to_string(),
                transient,
            },
        }
    }
}
