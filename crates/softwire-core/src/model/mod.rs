// ── Softwire domain model ──
//
// Closed, typed shapes produced by `reader`. Nothing downstream of the
// reader touches raw JSON: every optional backend field is already
// resolved to `Some(valid)` or `None` by the time it lands here.

pub mod address;
pub mod config;
pub mod rule;
pub mod status;

// ── Re-exports ──────────────────────────────────────────────────────

pub use address::AddressWithMask;
pub use config::{MapConfig, MapType};
pub use rule::{MapRule, PortRange, ShareRatio};
pub use status::{InterfaceError, InterfaceStatus};
