// ── Vacuum facade ──
//
// One session with one device: a synchronizer, an executor, and the
// channels consumers observe. This is the surface a smart-home bridge or
// the CLI talks to.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info};
use vacctl_api::{HttpClient, Transport};

use crate::command::{Command, CommandExecutor, CommandResult, Presets};
use crate::config::VacuumConfig;
use crate::error::CoreError;
use crate::model::{BatteryChargeState, CanonicalStatus, VacuumEvent};
use crate::sync::StatusSynchronizer;

const EVENT_CHANNEL_SIZE: usize = 32;

/// Battery percentage below which the device reports low battery.
pub const LOW_BATTERY_THRESHOLD: u8 = 20;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<VacuumInner>`. Construction validates the
/// configured speed presets, so an `InvalidPreset` can only surface here.
#[derive(Clone)]
pub struct Vacuum {
    inner: Arc<VacuumInner>,
}

struct VacuumInner {
    config: VacuumConfig,
    sync: StatusSynchronizer,
    executor: CommandExecutor,
    event_tx: broadcast::Sender<VacuumEvent>,
}

impl Vacuum {
    /// Create a session backed by the reqwest HTTP client. Does not
    /// contact the device; call [`start()`](Self::start) to begin polling.
    pub fn new(config: VacuumConfig) -> Result<Self, CoreError> {
        let client = HttpClient::new(&config.host, &config.transport())?;
        Self::with_transport(config, Arc::new(client))
    }

    /// Create a session over any transport.
    pub fn with_transport(
        config: VacuumConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, CoreError> {
        if config.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "device ip must not be empty".into(),
            });
        }

        let presets = Presets::resolve(&config)?;
        debug!(
            protocol = %config.protocol,
            default_speed = %presets.default_speed,
            high_speed = %presets.high_speed,
            mop_enabled = config.power_control.mop_enabled,
            "power control configured"
        );

        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let sync = StatusSynchronizer::new(
            Arc::clone(&transport),
            config.protocol,
            config.intervals,
            event_tx.clone(),
        );
        let executor =
            CommandExecutor::new(&config, presets, transport, sync.clone(), event_tx.clone());

        Ok(Self {
            inner: Arc::new(VacuumInner {
                config,
                sync,
                executor,
                event_tx,
            }),
        })
    }

    pub fn config(&self) -> &VacuumConfig {
        &self.inner.config
    }

    pub fn synchronizer(&self) -> &StatusSynchronizer {
        &self.inner.sync
    }

    pub fn presets(&self) -> &Presets {
        self.inner.executor.presets()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Kick off the first fetch. Every completed fetch arms the next one,
    /// so this is all it takes to keep polling.
    pub fn start(&self) {
        info!(host = %self.inner.config.host, protocol = %self.inner.config.protocol, "starting status polling");
        self.inner.sync.force_refresh();
    }

    /// Stop background polling.
    pub fn shutdown(&self) {
        self.inner.sync.shutdown();
    }

    // ── Observation ──────────────────────────────────────────────

    /// Subscribe to successfully refreshed statuses.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<CanonicalStatus>>> {
        self.inner.sync.subscribe()
    }

    /// Subscribe to out-of-band device events.
    pub fn events(&self) -> broadcast::Receiver<VacuumEvent> {
        self.inner.event_tx.subscribe()
    }

    pub fn cached_status(&self) -> Option<Arc<CanonicalStatus>> {
        self.inner.sync.cached()
    }

    // ── Queries ──────────────────────────────────────────────────

    pub async fn status(&self, forced: bool) -> Result<Arc<CanonicalStatus>, CoreError> {
        self.inner.sync.get_status(forced).await
    }

    pub async fn battery_level(&self) -> Result<u8, CoreError> {
        Ok(self.status(false).await?.battery_level)
    }

    pub async fn charging_state(&self) -> Result<BatteryChargeState, CoreError> {
        Ok(self.status(false).await?.battery_charge_state)
    }

    pub async fn is_battery_low(&self) -> Result<bool, CoreError> {
        Ok(self.battery_level().await? < LOW_BATTERY_THRESHOLD)
    }

    pub async fn is_cleaning(&self) -> Result<bool, CoreError> {
        Ok(self.status(false).await?.is_cleaning())
    }

    pub async fn is_spot_cleaning(&self) -> Result<bool, CoreError> {
        Ok(self.status(false).await?.is_spot_cleaning())
    }

    pub async fn is_going_home(&self) -> Result<bool, CoreError> {
        Ok(self.status(false).await?.is_going_home())
    }

    pub async fn is_high_speed_mode(&self) -> Result<bool, CoreError> {
        self.inner.executor.is_high_speed().await
    }

    pub async fn is_mop_mode(&self) -> Result<bool, CoreError> {
        self.inner.executor.is_mop().await
    }

    // ── Commands ─────────────────────────────────────────────────

    pub async fn start_cleaning(&self, on: bool) -> Result<(), CoreError> {
        self.inner.executor.start_cleaning(on).await
    }

    pub async fn stop_cleaning(&self) -> Result<(), CoreError> {
        self.inner.executor.stop_cleaning().await
    }

    pub async fn pause_cleaning(&self) -> Result<(), CoreError> {
        self.inner.executor.pause_cleaning().await
    }

    pub async fn start_spot_cleaning(&self, on: bool) -> Result<(), CoreError> {
        self.inner.executor.spot_cleaning(on).await
    }

    pub async fn go_home(&self, on: bool) -> Result<(), CoreError> {
        self.inner.executor.go_home(on).await
    }

    pub async fn set_high_speed_mode(&self, on: bool) -> Result<(), CoreError> {
        self.inner.executor.set_high_speed(on).await
    }

    pub async fn set_mop_mode(&self, on: bool) -> Result<(), CoreError> {
        self.inner.executor.set_mop(on).await
    }

    pub async fn find(&self) -> Result<(), CoreError> {
        self.inner.executor.locate().await
    }

    pub async fn version(&self) -> Result<String, CoreError> {
        self.inner.executor.version().await
    }

    /// Route a [`Command`] to the matching operation.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        debug!(command = ?cmd, "executing command");
        match cmd {
            Command::Status { forced } => Ok(CommandResult::Status(self.status(forced).await?)),
            Command::Version => Ok(CommandResult::Version(self.version().await?)),
            Command::Clean { on } => self.start_cleaning(on).await.map(|()| CommandResult::Ok),
            Command::Stop => self.stop_cleaning().await.map(|()| CommandResult::Ok),
            Command::Pause => self.pause_cleaning().await.map(|()| CommandResult::Ok),
            Command::Spot { on } => self
                .start_spot_cleaning(on)
                .await
                .map(|()| CommandResult::Ok),
            Command::Home { on } => self.go_home(on).await.map(|()| CommandResult::Ok),
            Command::Locate => self.find().await.map(|()| CommandResult::Ok),
            Command::HighSpeed { on } => self
                .set_high_speed_mode(on)
                .await
                .map(|()| CommandResult::Ok),
            Command::Mop { on } => self.set_mop_mode(on).await.map(|()| CommandResult::Ok),
        }
    }
}
