// ── Command executor ──
//
// Issues state-changing requests and keeps the synchronizer honest
// afterwards. Start-class and stop-class commands wait out the settle
// delay and then force a refresh; fan-speed toggles skip the call
// entirely when the device is already where it should be.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use vacctl_api::Transport;

use crate::config::VacuumConfig;
use crate::error::CoreError;
use crate::model::{FanPower, VacuumEvent};
use crate::protocol::{Action, Protocol};
use crate::sync::StatusSynchronizer;

/// How long after a locate the "locating" indicator is reset.
const LOCATE_RESET_DELAY: Duration = Duration::from_millis(250);

/// Fan-power presets resolved once for the selected dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presets {
    pub default_speed: FanPower,
    pub high_speed: FanPower,
    pub mop: FanPower,
}

impl Presets {
    /// Resolve the configured preset names. This is the only place an
    /// `InvalidPreset` can come from.
    pub fn resolve(config: &VacuumConfig) -> Result<Self, CoreError> {
        let protocol = config.protocol;
        Ok(Self {
            default_speed: protocol.speed_preset(&config.power_control.default_speed)?,
            high_speed: protocol.speed_preset(&config.power_control.high_speed)?,
            mop: protocol.speed_preset("mop")?,
        })
    }
}

#[derive(Clone)]
pub struct CommandExecutor {
    transport: Arc<dyn Transport>,
    protocol: Protocol,
    sync: StatusSynchronizer,
    presets: Presets,
    settle_delay: Duration,
    strict_state_guard: bool,
    mop_enabled: bool,
    event_tx: broadcast::Sender<VacuumEvent>,
}

impl CommandExecutor {
    pub fn new(
        config: &VacuumConfig,
        presets: Presets,
        transport: Arc<dyn Transport>,
        sync: StatusSynchronizer,
        event_tx: broadcast::Sender<VacuumEvent>,
    ) -> Self {
        Self {
            transport,
            protocol: config.protocol,
            sync,
            presets,
            settle_delay: config.settle_delay,
            strict_state_guard: config.strict_state_guard,
            mop_enabled: config.power_control.mop_enabled,
            event_tx,
        }
    }

    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    // ── Start-class ──────────────────────────────────────────────

    /// Start cleaning, or stop it if `on` is false and the device is
    /// currently cleaning.
    pub async fn start_cleaning(&self, on: bool) -> Result<(), CoreError> {
        if on {
            return self.run_then_settle(&Action::Start).await;
        }
        let status = self.sync.get_status(true).await?;
        if status.is_cleaning() {
            self.stop_cleaning().await
        } else {
            debug!(state = %status.state, "not cleaning, nothing to stop");
            Ok(())
        }
    }

    pub async fn spot_cleaning(&self, on: bool) -> Result<(), CoreError> {
        if on {
            self.run_then_settle(&Action::Spot).await
        } else {
            Err(CoreError::invalid_state("cannot stop spot cleaning"))
        }
    }

    /// Send the robot to its dock. Switching "go home" off does nothing.
    pub async fn go_home(&self, on: bool) -> Result<(), CoreError> {
        if on {
            self.run_then_settle(&Action::Home).await
        } else {
            Ok(())
        }
    }

    // ── Stop-class ───────────────────────────────────────────────

    pub async fn stop_cleaning(&self) -> Result<(), CoreError> {
        self.guarded(&Action::Stop).await
    }

    pub async fn pause_cleaning(&self) -> Result<(), CoreError> {
        self.guarded(&Action::Pause).await
    }

    /// Check the freshest state against the stop guard, then issue the
    /// command.
    ///
    /// Unless `strict_state_guard` is set, a guard violation does not stop
    /// the command from being sent: the request goes out, the refresh is
    /// scheduled, and only then is `InvalidState` returned.
    async fn guarded(&self, action: &Action) -> Result<(), CoreError> {
        let status = self.sync.get_status(true).await?;

        let violation = if self.protocol.stop_disallowed(status.state) {
            Some(CoreError::invalid_state(format!(
                "cannot {} while {}",
                action.name(),
                status.state
            )))
        } else {
            None
        };

        if let Some(err) = violation.as_ref().filter(|_| self.strict_state_guard) {
            return Err(err.clone());
        }

        let sent = self.run_then_settle(action).await;
        match violation {
            Some(err) => {
                warn!(error = %err, "command issued despite state guard");
                Err(err)
            }
            None => sent,
        }
    }

    async fn run_then_settle(&self, action: &Action) -> Result<(), CoreError> {
        let sent = self.send(action).await;
        if let Err(ref e) = sent {
            warn!(action = action.name(), error = %e, "command failed");
        }
        tokio::time::sleep(self.settle_delay).await;
        self.sync.force_refresh();
        sent
    }

    // ── Fan-speed toggles ────────────────────────────────────────

    pub async fn is_high_speed(&self) -> Result<bool, CoreError> {
        let status = self.sync.get_status(false).await?;
        Ok(status.fan_power.as_ref() == Some(&self.presets.high_speed))
    }

    pub async fn set_high_speed(&self, on: bool) -> Result<(), CoreError> {
        let current = self.is_high_speed().await?;
        if current == on {
            debug!(on, "high-speed mode already set");
            return Ok(());
        }
        let target = if on {
            &self.presets.high_speed
        } else {
            &self.presets.default_speed
        };
        self.set_fan_speed(target.clone()).await
    }

    pub async fn is_mop(&self) -> Result<bool, CoreError> {
        self.require_mop()?;
        let status = self.sync.get_status(false).await?;
        Ok(status.fan_power.as_ref() == Some(&self.presets.mop))
    }

    pub async fn set_mop(&self, on: bool) -> Result<(), CoreError> {
        let current = self.is_mop().await?;
        if current == on {
            debug!(on, "mop mode already set");
            return Ok(());
        }
        let target = if on {
            &self.presets.mop
        } else {
            &self.presets.default_speed
        };
        self.set_fan_speed(target.clone()).await
    }

    fn require_mop(&self) -> Result<(), CoreError> {
        if self.mop_enabled {
            Ok(())
        } else {
            Err(CoreError::Unsupported {
                operation: "mop mode".into(),
                required: "power-control.mop-enabled = true".into(),
            })
        }
    }

    async fn set_fan_speed(&self, power: FanPower) -> Result<(), CoreError> {
        info!(fan_power = %power, "setting fan power");
        self.send(&Action::SetFanSpeed(power)).await?;
        self.sync.force_refresh();
        Ok(())
    }

    // ── One-shot ─────────────────────────────────────────────────

    /// Play the locate sound. `VacuumEvent::LocateFinished` follows shortly
    /// after a successful call.
    pub async fn locate(&self) -> Result<(), CoreError> {
        self.send(&Action::Locate).await?;
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(LOCATE_RESET_DELAY).await;
            let _ = event_tx.send(VacuumEvent::LocateFinished);
        });
        Ok(())
    }

    /// Firmware version, never cached.
    pub async fn version(&self) -> Result<String, CoreError> {
        let body = self
            .transport
            .send(self.protocol.version_request())
            .await
            .map_err(|e| CoreError::DeviceUnreachable {
                message: e.to_string(),
            })?;
        self.protocol.parse_version(&body)
    }

    async fn send(&self, action: &Action) -> Result<(), CoreError> {
        let request = self.protocol.command_request(action)?;
        debug!(action = action.name(), path = %request.path, "sending command");
        self.transport.send(request).await?;
        Ok(())
    }
}
