// ── Device events ──

use serde::Serialize;

/// Out-of-band notifications for bridges and long-running consumers.
///
/// Canonical status changes go through the `watch` channel instead; these
/// carry the signals that have no place in a status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VacuumEvent {
    /// The locate sound has been triggered and any "locating" indicator
    /// should be reset. The device never reports this itself.
    LocateFinished,
    /// A background or forced refresh failed. The previous status, if
    /// any, is still cached.
    RefreshFailed { message: String },
}
