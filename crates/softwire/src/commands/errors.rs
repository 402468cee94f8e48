//! Backend error codes: the registered table, or what an interface reports.

use std::fmt;

use serde::Serialize;
use tabled::Tabled;

use softwire_core::{ErrorCode, InterfaceError, ProtocolRegistry};

use super::util::{self, Source};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

/// An error an interface reported, with its registered description.
#[derive(Debug, Clone, Serialize)]
pub struct ReportedError {
    pub subsystem: Option<String>,
    pub code: String,
    pub description: Option<&'static str>,
}

impl ReportedError {
    pub fn new(err: &InterfaceError, registry: &ProtocolRegistry) -> Self {
        Self {
            subsystem: err.subsystem.clone(),
            code: err.code.clone(),
            description: registry.describe(&err.code),
        }
    }
}

impl fmt::Display for ReportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(subsystem) = &self.subsystem {
            write!(f, "[{subsystem}] ")?;
        }
        f.write_str(&self.code)?;
        if let Some(description) = self.description {
            write!(f, ": {description}")?;
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct CodeRow {
    #[tabled(rename = "Code")]
    code: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

impl From<&ErrorCode> for CodeRow {
    fn from(e: &ErrorCode) -> Self {
        Self {
            code: e.code,
            description: e.description,
        }
    }
}

#[derive(Tabled)]
struct ReportedRow {
    #[tabled(rename = "Subsystem")]
    subsystem: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ReportedError> for ReportedRow {
    fn from(e: &ReportedError) -> Self {
        Self {
            subsystem: e.subsystem.clone().unwrap_or_default(),
            code: e.code.clone(),
            description: e.description.unwrap_or("(unregistered)").to_owned(),
        }
    }
}

/// Without a status source, list the registered codes. With one, list the
/// errors that interface reports, passed through verbatim.
pub async fn handle(global: &GlobalOpts, ctx: &Context) -> Result<(), CliError> {
    let registry = ProtocolRegistry::new();

    let source = match Source::resolve(global, ctx) {
        Ok(source) => Some(source),
        Err(CliError::NoSource) => None,
        Err(e) => return Err(e),
    };

    let out = match source {
        None => {
            let codes: Vec<&ErrorCode> = registry.error_codes().collect();
            output::render_list(&ctx.output, &codes, |e| CodeRow::from(*e), |e| e.code.into())
        }
        Some(source) => {
            let status = util::load_status(&source, ctx).await?;
            let reported: Vec<ReportedError> = status
                .errors
                .iter()
                .map(|e| ReportedError::new(e, &registry))
                .collect();
            if reported.is_empty() && matches!(ctx.output, OutputFormat::Table) {
                "No errors reported".to_owned()
            } else {
                output::render_list(
                    &ctx.output,
                    &reported,
                    |e| ReportedRow::from(e),
                    |e| e.code.clone(),
                )
            }
        }
    };
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_error_display() {
        let registry = ProtocolRegistry::new();
        let known = ReportedError::new(
            &InterfaceError {
                subsystem: Some("map".into()),
                code: "UNSUPPORTED_TYPE".into(),
            },
            &registry,
        );
        assert_eq!(known.to_string(), "[map] UNSUPPORTED_TYPE: Unsupported MAP type");

        let unknown = ReportedError::new(
            &InterfaceError {
                subsystem: None,
                code: "PEER_RESOLVE_FAIL".into(),
            },
            &registry,
        );
        assert_eq!(unknown.to_string(), "PEER_RESOLVE_FAIL");
        assert_eq!(ReportedRow::from(&unknown).description, "(unregistered)");
    }
}
