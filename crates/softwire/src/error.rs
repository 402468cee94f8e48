//! CLI error types with miette diagnostics.
//!
//! Maps config errors into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use softwire_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNAVAILABLE: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Snapshot source ──────────────────────────────────────────────
    #[error("No status source given")]
    #[diagnostic(
        code(softwire::no_source),
        help(
            "Pass --file <path> (or '-' for stdin), --ubus <interface>,\n\
             or configure an interface profile with: softwire config init"
        )
    )]
    NoSource,

    #[error("Could not query status of '{interface}': {reason}")]
    #[diagnostic(
        code(softwire::source_unavailable),
        help("Is the backend running? Try: ubus call network.interface.{interface} status")
    )]
    SourceUnavailable { interface: String, reason: String },

    #[error("Status query timed out after {seconds}s")]
    #[diagnostic(
        code(softwire::timeout),
        help("Increase the limit with --timeout or check the backend's responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Invalid status snapshot: {0}")]
    #[diagnostic(
        code(softwire::json),
        help("The snapshot must be the JSON of an interface status or its `data` object.")
    )]
    Json(#[from] serde_json::Error),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(softwire::validation))]
    Validation { field: String, reason: String },

    #[error("{failed} of {total} options failed validation")]
    #[diagnostic(
        code(softwire::options_invalid),
        help("Run: softwire options schema  to see each option's datatype")
    )]
    OptionsInvalid { failed: usize, total: usize },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Interface profile '{name}' not found in configuration")]
    #[diagnostic(
        code(softwire::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: softwire config init {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(softwire::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write configuration: {0}")]
    #[diagnostic(code(softwire::config_write))]
    ConfigWrite(#[from] toml::ser::Error),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Overwriting '{path}' requires confirmation")]
    #[diagnostic(
        code(softwire::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { path: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SourceUnavailable { .. } => exit_code::UNAVAILABLE,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::NoSource
            | Self::Validation { .. }
            | Self::OptionsInvalid { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error → CliError mapping ─────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Serialization(e) => CliError::ConfigWrite(e),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
