// ── Canonical domain model ──
//
// Dialect-independent vacuum state. Both firmware generations are mapped
// onto these types in `convert.rs`; nothing above this crate ever sees a
// raw wire shape.

pub mod event;
pub mod status;

pub use event::VacuumEvent;
pub use status::{BatteryChargeState, CanonicalStatus, CleanerState, CleaningMode, FanPower};
