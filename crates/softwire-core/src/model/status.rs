// ── Interface status (full daemon dump) ──

use serde::{Deserialize, Serialize};

use super::config::MapConfig;

/// Error reported by the backend against an interface.
///
/// Codes are passed through verbatim; see `ProtocolRegistry::describe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceError {
    pub subsystem: Option<String>,
    pub code: String,
}

/// The parts of an interface status dump a MAP view needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceStatus {
    pub interface: Option<String>,
    pub up: bool,
    pub l3_device: Option<String>,
    pub device: Option<String>,
    pub errors: Vec<InterfaceError>,
    pub map: Option<MapConfig>,
}
