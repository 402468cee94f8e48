//! CLI configuration — thin wrapper around `softwire_config` shared types.
//!
//! Re-exports the shared types and resolves the effective settings, with
//! `GlobalOpts` flags taking priority over the config file's defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use softwire_config::{
    Config, InterfaceProfile, OptionValue, config_path, load_config, save_config,
};

// ── Effective settings ──────────────────────────────────────────────

/// Settings every command handler sees once flags and config are merged.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub output: OutputFormat,
    pub color: bool,
    pub timeout: Duration,
    pub ubus: PathBuf,
    pub quiet: bool,
    pub yes: bool,
}

fn parse_choice<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|_| CliError::Validation {
        field: format!("defaults.{field}"),
        reason: format!("unsupported value '{value}'"),
    })
}

impl Context {
    /// Merge CLI flags (flag > env > config file > built-in default).
    pub fn resolve(global: &GlobalOpts, config: Config) -> Result<Self, CliError> {
        let output = match &global.output {
            Some(format) => format.clone(),
            None => parse_choice("output", &config.defaults.output)?,
        };
        let color_mode: ColorMode = match &global.color {
            Some(mode) => mode.clone(),
            None => parse_choice("color", &config.defaults.color)?,
        };
        let timeout = Duration::from_secs(global.timeout.unwrap_or(config.defaults.timeout));
        let ubus = config.defaults.ubus.clone();

        Ok(Self {
            output,
            color: output::should_color(&color_mode),
            timeout,
            ubus,
            quiet: global.quiet,
            yes: global.yes,
            config,
        })
    }

    /// The selected interface profile, if `--interface` or
    /// `default_interface` names one.
    pub fn active_profile<'a>(
        &'a self,
        global: &'a GlobalOpts,
    ) -> Result<Option<(&'a str, &'a InterfaceProfile)>, CliError> {
        let name = global
            .interface
            .as_deref()
            .or(self.config.default_interface.as_deref());
        let Some(name) = name else {
            return Ok(None);
        };
        self.config
            .profile(Some(name))
            .map(Some)
            .map_err(|_| CliError::ProfileNotFound {
                name: name.to_owned(),
                available: available_profiles(&self.config),
            })
    }
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let names = config.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
