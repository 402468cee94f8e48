//! Typed status model and mapping-rule resolution for MAP-E, MAP-T and
//! LW4over6 softwire interfaces.
//!
//! The crate sits between a backend daemon's raw interface status and the
//! consumers that present it (CLI, status pages):
//!
//! - **[`reader`]** — the single validating parse step. Turns an opaque
//!   `serde_json::Value` snapshot into a [`MapConfig`] (or an
//!   [`InterfaceStatus`] for a full interface dump). Malformed fields become
//!   unknown, they never fail the parse.
//!
//! - **[`RuleResolver`]** — pure derivations over an optional `MapConfig`:
//!   the effective Basic Mapping Rule, the share ratio, port ranges and the
//!   normalized forwarding-rule table.
//!
//! - **[`ProtocolRegistry`]** — explicit registry of the `map` protocol
//!   descriptor and the backend error-code table.
//!
//! - **[`options`]** — schema and validators for the interface options a
//!   MAP interface is configured with.

pub mod error;
pub mod model;
pub mod options;
pub mod reader;
pub mod registry;
pub mod resolver;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use options::{OptionCheck, OptionDatatype, OptionSpec, OptionTab};
pub use reader::{parse, parse_interface_status};
pub use registry::{ErrorCode, ProtocolDescriptor, ProtocolRegistry};
pub use resolver::{BmrSummary, RuleResolver, RuleRow};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AddressWithMask, InterfaceError, InterfaceStatus, MapConfig, MapRule, MapType, PortRange,
    ShareRatio,
};
