//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use vacctl_config::ConfigError;
use vacctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const INVALID_STATE: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the vacuum: {message}")]
    #[diagnostic(
        code(vacctl::connection_failed),
        help(
            "Check that the robot is powered on and reachable on the network.\n\
             Try: vacctl status --ip <address> -v"
        )
    )]
    ConnectionFailed { message: String },

    #[error("Request timed out: {message}")]
    #[diagnostic(
        code(vacctl::timeout),
        help("Increase the timeout with --timeout or check the robot's Wi-Fi signal.")
    )]
    Timeout { message: String },

    #[error("Unexpected response from the vacuum: {message}")]
    #[diagnostic(
        code(vacctl::bad_response),
        help("Is the firmware dialect right? Legacy firmware needs --legacy.")
    )]
    BadResponse { message: String },

    // ── Device state ─────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(vacctl::invalid_state))]
    InvalidState { message: String },

    #[error("Operation '{operation}' is not enabled")]
    #[diagnostic(
        code(vacctl::unsupported),
        help("This command requires {required}.")
    )]
    Unsupported { operation: String, required: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vacctl::validation))]
    Validation { field: String, reason: String },

    #[error("Unknown speed preset '{name}' for {dialect} firmware")]
    #[diagnostic(
        code(vacctl::invalid_preset),
        help(
            "Legacy presets: quiet, balanced, turbo, max, mop.\n\
             Modern presets: off, mop, min, quiet, low, medium, balanced, max, turbo."
        )
    )]
    InvalidPreset { name: String, dialect: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vacctl::profile_not_found),
        help(
            "Add a [profiles.{name}] section to {path}\n\
             or pass the device address with --ip."
        )
    )]
    ProfileNotFound { name: String, path: String },

    #[error("No device configured")]
    #[diagnostic(
        code(vacctl::no_config),
        help(
            "Pass the device address with --ip, or create a profile in:\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error("No password configured for user '{username}' in profile '{profile}'")]
    #[diagnostic(
        code(vacctl::no_credentials),
        help(
            "Set VACCTL_PASSWORD, add `password-env` to the profile,\n\
             or store it in the system keyring under service 'vacctl', entry '{profile}/password'."
        )
    )]
    NoCredentials { profile: String, username: String },

    #[error("{0}")]
    #[diagnostic(code(vacctl::config))]
    Config(String),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(vacctl::render))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(vacctl::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::InvalidState { .. } | Self::Unsupported { .. } => exit_code::INVALID_STATE,
            Self::Validation { .. } | Self::InvalidPreset { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Network { message, .. } | CoreError::DeviceUnreachable { message } => {
                CliError::ConnectionFailed { message }
            }

            CoreError::Timeout { message } => CliError::Timeout { message },

            CoreError::Parse { message } => CliError::BadResponse { message },

            CoreError::InvalidState { message } => CliError::InvalidState { message },

            CoreError::InvalidPreset { name, dialect } => CliError::InvalidPreset {
                name,
                dialect: dialect.into(),
            },

            CoreError::Unsupported {
                operation,
                required,
            } => CliError::Unsupported {
                operation,
                required,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                path: vacctl_config::config_path().display().to_string(),
            },
            ConfigError::NoCredentials { profile, username } => {
                CliError::NoCredentials { profile, username }
            }
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_exits_with_four() {
        let err: CliError = CoreError::InvalidState {
            message: "cannot stop spot cleaning".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::INVALID_STATE);
        assert_eq!(err.to_string(), "cannot stop spot cleaning");
    }

    #[test]
    fn network_and_timeout_exit_codes() {
        let net: CliError = CoreError::Network {
            message: "connection refused".into(),
            transient: true,
        }
        .into();
        assert_eq!(net.exit_code(), exit_code::CONNECTION);

        let slow: CliError = CoreError::Timeout {
            message: "operation timed out".into(),
        }
        .into();
        assert_eq!(slow.exit_code(), exit_code::TIMEOUT);
    }

    #[test]
    fn bad_preset_is_a_usage_error() {
        let err: CliError = CoreError::InvalidPreset {
            name: "bogus".into(),
            dialect: "modern",
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn unknown_profile_names_the_config_path() {
        let err: CliError = ConfigError::UnknownProfile {
            name: "kitchen".into(),
        }
        .into();
        assert!(matches!(err, CliError::ProfileNotFound { ref name, .. } if name == "kitchen"));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
