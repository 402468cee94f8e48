//! Shared helpers for command handlers.

use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use softwire_core::InterfaceStatus;
use softwire_core::reader::parse_document;

use crate::cli::GlobalOpts;
use crate::config::Context;
use crate::error::CliError;

/// Where an interface status snapshot is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Stdin,
    /// `ubus call network.interface.<section> status`
    Ubus(String),
}

impl Source {
    /// Pick the source: `--file`, then `--ubus`, then the active profile.
    pub fn resolve(global: &GlobalOpts, ctx: &Context) -> Result<Self, CliError> {
        if let Some(path) = &global.file {
            return Ok(if path.as_os_str() == "-" {
                Self::Stdin
            } else {
                Self::File(path.clone())
            });
        }
        if let Some(section) = &global.ubus {
            return Ok(Self::Ubus(section.clone()));
        }
        match ctx.active_profile(global)? {
            Some((name, profile)) => Ok(match &profile.snapshot {
                Some(path) => Self::File(path.clone()),
                None => Self::Ubus(profile.section_name(name).to_owned()),
            }),
            None => Err(CliError::NoSource),
        }
    }

    /// Interface section name, when the source knows it.
    pub fn section(&self) -> Option<&str> {
        match self {
            Self::Ubus(section) => Some(section),
            Self::File(_) | Self::Stdin => None,
        }
    }

    /// Stdin can only be read once.
    pub fn is_repeatable(&self) -> bool {
        !matches!(self, Self::Stdin)
    }
}

/// Fetch and read one status snapshot.
pub async fn load_status(source: &Source, ctx: &Context) -> Result<InterfaceStatus, CliError> {
    let raw = match source {
        Source::File(path) => {
            tracing::debug!(path = %path.display(), "reading snapshot file");
            tokio::fs::read_to_string(path).await?
        }
        Source::Stdin => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
        Source::Ubus(section) => query_ubus(&ctx.ubus, section, ctx).await?,
    };

    let document: serde_json::Value = serde_json::from_str(&raw)?;
    let mut status = parse_document(&document);
    if status.interface.is_none() {
        status.interface = source.section().map(String::from);
    }
    tracing::debug!(
        interface = status.interface.as_deref().unwrap_or("-"),
        has_map = status.map.is_some(),
        "snapshot parsed"
    );
    Ok(status)
}

async fn query_ubus(program: &Path, section: &str, ctx: &Context) -> Result<String, CliError> {
    let object = format!("network.interface.{section}");
    tracing::debug!(program = %program.display(), %object, "querying interface status");

    let output = Command::new(program)
        .args(["call", object.as_str(), "status"])
        .kill_on_drop(true)
        .output();
    let output = tokio::time::timeout(ctx.timeout, output)
        .await
        .map_err(|_| CliError::Timeout {
            seconds: ctx.timeout.as_secs(),
        })?
        .map_err(|e| CliError::SourceUnavailable {
            interface: section.to_owned(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CliError::SourceUnavailable {
            interface: section.to_owned(),
            reason: format!("{} ({})", stderr.trim(), output.status),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
