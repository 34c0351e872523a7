//! Status synchronization and command guarding between `vacctl-api` and
//! consumers (CLI, smart-home bridges).
//!
//! - **[`Vacuum`]**: facade for one device session. Validates presets at
//!   construction, exposes the read-side queries and the write-side
//!   commands, and vends `watch` / `broadcast` subscriptions.
//!
//! - **[`StatusSynchronizer`]**: owns the cached [`CanonicalStatus`],
//!   coalesces concurrent reads into one in-flight fetch, and re-arms a
//!   single-shot background refresh whose interval adapts to the device
//!   state (fast while busy, slow while parked).
//!
//! - **[`CommandExecutor`]**: issues start/stop/pause/locate/dock/fan-speed
//!   requests, checks the stop guard against a forced refresh, and pulls a
//!   fresh status after the settle delay.
//!
//! - **[`Protocol`]**: the two firmware dialects (legacy flat JSON and the
//!   v2 tagged-attribute API) behind one enum, selected once per session.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod protocol;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandExecutor, CommandResult, Presets};
pub use config::{PollIntervals, PowerControl, VacuumConfig};
pub use controller::{LOW_BATTERY_THRESHOLD, Vacuum};
pub use error::CoreError;
pub use model::{
    BatteryChargeState, CanonicalStatus, CleanerState, CleaningMode, FanPower, VacuumEvent,
};
pub use protocol::{Action, Protocol};
pub use sync::{StatusResult, StatusSynchronizer};
