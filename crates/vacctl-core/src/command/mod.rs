// ── Command API ──
//
// Every device operation the CLI can request flows through one `Command`
// enum. `Vacuum::execute` routes each variant to the executor or the
// synchronizer.

pub mod executor;

use std::sync::Arc;

use serde::Serialize;

use crate::model::CanonicalStatus;

pub use executor::{CommandExecutor, Presets};

/// All operations against a vacuum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Read status; `forced` bypasses the cache.
    Status { forced: bool },
    /// Start cleaning, or stop it when `on` is false.
    Clean { on: bool },
    Stop,
    Pause,
    Spot { on: bool },
    Home { on: bool },
    Locate,
    HighSpeed { on: bool },
    Mop { on: bool },
    Version,
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandResult {
    Ok,
    Status(Arc<CanonicalStatus>),
    Version(String),
}
