//! CLI configuration: a thin layer over `vacctl_config`.
//!
//! Adds flag overrides (`--ip`, `--legacy`, `--username`, `--password`,
//! `--timeout`) on top of profile resolution.

use std::time::Duration;

use secrecy::SecretString;

use vacctl_config::{Config, ConfigError};
use vacctl_core::{Protocol, VacuumConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build the session config from the config file, profile, and flags.
pub fn build_vacuum_config(global: &GlobalOpts) -> Result<VacuumConfig, CliError> {
    let cfg = vacctl_config::load_config_or_default();
    resolve(&cfg, global)
}

/// Resolve against an already loaded config.
///
/// An explicitly requested profile must exist. Without `--profile`, a
/// missing default profile is tolerated as long as `--ip` is given.
pub fn resolve(cfg: &Config, global: &GlobalOpts) -> Result<VacuumConfig, CliError> {
    let mut vc = match vacctl_config::select_profile(cfg, global.profile.as_deref()) {
        Ok((name, profile)) => {
            tracing::debug!(profile = %name, "using profile");
            vacctl_config::profile_to_vacuum_config(profile, &name, &cfg.defaults)?
        }
        Err(ConfigError::UnknownProfile { .. }) if global.profile.is_none() => {
            let Some(ref ip) = global.ip else {
                return Err(CliError::NoConfig {
                    path: vacctl_config::config_path().display().to_string(),
                });
            };
            let mut vc = VacuumConfig::new(ip.trim(), Protocol::from_legacy_flag(global.legacy));
            vc.timeout = Duration::from_secs(cfg.defaults.timeout);
            vc
        }
        Err(e) => return Err(e.into()),
    };

    apply_overrides(&mut vc, global)?;
    Ok(vc)
}

fn apply_overrides(vc: &mut VacuumConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref ip) = global.ip {
        vc.host = ip.trim().to_owned();
    }
    if vc.host.is_empty() {
        return Err(CliError::Validation {
            field: "ip".into(),
            reason: "device address must not be empty".into(),
        });
    }

    if global.legacy {
        vc.protocol = Protocol::Legacy;
    }

    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least one second".into(),
            });
        }
        vc.timeout = Duration::from_secs(secs);
    }

    if let Some(ref username) = global.username {
        vc.username = Some(username.clone());
    }
    if let Some(ref password) = global.password {
        vc.password = Some(SecretString::from(password.clone()));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use clap::Parser;
    use secrecy::ExposeSecret;
    use vacctl_config::{Defaults, Profile};

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["vacctl"];
        argv.extend_from_slice(args);
        argv.push("status");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        Config {
            default_profile: Some(name.into()),
            defaults: Defaults::default(),
            profiles: HashMap::from([(name.to_owned(), profile)]),
        }
    }

    #[test]
    fn ip_flag_works_without_profile() {
        let vc = resolve(&Config::default(), &global(&["--ip", "10.0.0.5", "--legacy"])).unwrap();
        assert_eq!(vc.host, "10.0.0.5");
        assert_eq!(vc.protocol, Protocol::Legacy);
        assert_eq!(vc.timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_device_is_reported() {
        let err = resolve(&Config::default(), &global(&[])).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn explicit_unknown_profile_is_an_error() {
        let err = resolve(
            &Config::default(),
            &global(&["--profile", "garage", "--ip", "10.0.0.5"]),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref name, .. } if name == "garage"));
    }

    #[test]
    fn flags_override_profile() {
        let profile = Profile {
            ip: "192.168.1.40".into(),
            timeout: Some(30),
            ..Profile::default()
        };
        let cfg = config_with("living-room", profile);

        let vc = resolve(
            &cfg,
            &global(&[
                "--ip",
                "192.168.1.41",
                "--timeout",
                "3",
                "--username",
                "robot",
                "--password",
                "hunter2",
            ]),
        )
        .unwrap();

        assert_eq!(vc.host, "192.168.1.41");
        assert_eq!(vc.protocol, Protocol::Modern);
        assert_eq!(vc.timeout, Duration::from_secs(3));
        assert_eq!(vc.username.as_deref(), Some("robot"));
        assert_eq!(vc.password.as_ref().unwrap().expose_secret(), "hunter2");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = resolve(
            &Config::default(),
            &global(&["--ip", "10.0.0.5", "--timeout", "0"]),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "timeout"));
    }
}
