// ── Core error types ──
//
// Status resolution never fails, so the only errors this crate produces
// come from validating interface options. Backend error codes are not
// errors of this crate: they are passed through via `InterfaceStatus`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid value for {option}: '{value}' ({reason})")]
    InvalidOption {
        option: String,
        value: String,
        reason: String,
    },

    #[error("Missing required option: {option}")]
    MissingOption { option: String },

    #[error("Unknown option: {option}")]
    UnknownOption { option: String },
}
