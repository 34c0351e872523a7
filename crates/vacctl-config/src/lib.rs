//! Configuration for vacctl.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to `vacctl_core::VacuumConfig`. The CLI adds flag-aware
//! overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use vacctl_core::{PollIntervals, PowerControl, Protocol, VacuumConfig};

/// Keyring service name; entries are keyed `<profile>/password`.
pub const KEYRING_SERVICE: &str = "vacctl";

/// Fallback password variable consulted after the profile's own.
pub const PASSWORD_ENV: &str = "VACCTL_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("no password configured for user '{username}' in profile '{profile}'")]
    NoCredentials { profile: String, username: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named vacuum profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    10
}

/// One vacuum.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Profile {
    /// Device IP or host (optionally with port).
    pub ip: String,

    /// Display name.
    pub name: Option<String>,

    /// Talk the legacy flat-JSON API instead of Valetudo v2.
    #[serde(default)]
    pub legacy_mode: bool,

    /// Basic auth user, if the web UI is protected.
    pub username: Option<String>,

    /// Basic auth password (plaintext, prefer keyring or env).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    #[serde(default)]
    pub power_control: PowerControlConfig,

    pub busy_interval_secs: Option<u64>,
    pub idle_interval_secs: Option<u64>,
    pub bootstrap_interval_secs: Option<u64>,
    pub settle_delay_ms: Option<u64>,

    #[serde(default)]
    pub strict_state_guard: bool,

    /// Override `defaults.timeout`.
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PowerControlConfig {
    #[serde(default = "default_speed")]
    pub default_speed: String,
    #[serde(default = "high_speed")]
    pub high_speed: String,
    #[serde(default)]
    pub mop_enabled: bool,
}

impl Default for PowerControlConfig {
    fn default() -> Self {
        Self {
            default_speed: default_speed(),
            high_speed: high_speed(),
            mop_enabled: false,
        }
    }
}

fn default_speed() -> String {
    "balanced".into()
}
fn high_speed() -> String {
    "max".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "vacctl", "vacctl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vacctl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Environment overrides use `VACCTL_` with `__` as the nesting separator,
/// e.g. `VACCTL_PROFILES__HOME__IP=10.0.0.5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VACCTL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Render the config as TOML with plaintext passwords masked.
pub fn render_masked(cfg: &Config) -> Result<String, ConfigError> {
    let mut masked = cfg.clone();
    for profile in masked.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("********".into());
        }
    }
    Ok(toml::to_string_pretty(&masked)?)
}

// ── Profile lookup ──────────────────────────────────────────────────

/// Pick a profile by explicit name, then `default_profile`.
pub fn select_profile<'a>(
    cfg: &'a Config,
    name: Option<&str>,
) -> Result<(String, &'a Profile), ConfigError> {
    let name = name
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    cfg.profiles
        .get(&name)
        .map(|p| (name.clone(), p))
        .ok_or(ConfigError::UnknownProfile { name })
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the Basic auth pair. `Ok(None)` when no username is set.
///
/// Password chain: `password-env` → `VACCTL_PASSWORD` → keyring →
/// plaintext.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<(String, SecretString)>, ConfigError> {
    let Some(username) = profile.username.clone() else {
        return Ok(None);
    };

    // 1. Profile's own env var
    if let Some(ref env_name) = profile.password_env {
        if let Ok(pw) = std::env::var(env_name) {
            return Ok(Some((username, SecretString::from(pw))));
        }
    }

    // 2. Global env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(Some((username, SecretString::from(pw))));
    }

    // 3. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(Some((username, SecretString::from(pw))));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(Some((username, SecretString::from(pw.clone()))));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        username,
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `VacuumConfig` from a profile, with no CLI overrides.
///
/// Preset names are carried through unresolved; `Vacuum::new` rejects
/// unknown ones before any request is made.
pub fn profile_to_vacuum_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<VacuumConfig, ConfigError> {
    if profile.ip.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "ip".into(),
            reason: format!("profile '{profile_name}' has no device ip"),
        });
    }

    let mut cfg = VacuumConfig::new(
        profile.ip.trim(),
        Protocol::from_legacy_flag(profile.legacy_mode),
    );

    cfg.power_control = PowerControl {
        default_speed: profile.power_control.default_speed.clone(),
        high_speed: profile.power_control.high_speed.clone(),
        mop_enabled: profile.power_control.mop_enabled,
    };

    let base = PollIntervals::default();
    cfg.intervals = PollIntervals {
        busy: profile
            .busy_interval_secs
            .map_or(base.busy, Duration::from_secs),
        idle: profile
            .idle_interval_secs
            .map_or(base.idle, Duration::from_secs),
        bootstrap: profile
            .bootstrap_interval_secs
            .map_or(base.bootstrap, Duration::from_secs),
    };
    if cfg.intervals.busy.is_zero() || cfg.intervals.idle.is_zero() {
        return Err(ConfigError::Validation {
            field: "interval".into(),
            reason: "polling intervals must be at least one second".into(),
        });
    }

    if let Some(ms) = profile.settle_delay_ms {
        cfg.settle_delay = Duration::from_millis(ms);
    }
    cfg.strict_state_guard = profile.strict_state_guard;
    cfg.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    if let Some((username, password)) = resolve_credentials(profile, profile_name)? {
        cfg.username = Some(username);
        cfg.password = Some(password);
    }

    Ok(cfg)
}
