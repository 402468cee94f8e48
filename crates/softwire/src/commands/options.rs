//! Option schema listing and validation.

use std::collections::BTreeMap;

use owo_colors::OwoColorize;
use tabled::Tabled;

use softwire_core::OptionCheck;
use softwire_core::options::{self as schema, OptionSpec};

use crate::cli::{GlobalOpts, OptionsArgs, OptionsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SchemaRow {
    #[tabled(rename = "Tab")]
    tab: String,
    #[tabled(rename = "Option")]
    name: &'static str,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Datatype")]
    datatype: String,
    #[tabled(rename = "Required")]
    required: &'static str,
    #[tabled(rename = "Placeholder")]
    placeholder: &'static str,
}

impl From<&OptionSpec> for SchemaRow {
    fn from(s: &OptionSpec) -> Self {
        Self {
            tab: s.tab.to_string(),
            name: s.name,
            label: s.label,
            datatype: s.datatype.to_string(),
            required: if s.required { "yes" } else { "" },
            placeholder: s.placeholder.unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct CheckRow {
    #[tabled(rename = "Option")]
    option: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Result")]
    result: String,
}

fn check_row(c: &OptionCheck, color: bool) -> CheckRow {
    let result = match (&c.error, color) {
        (None, true) => "ok".green().to_string(),
        (None, false) => "ok".into(),
        (Some(e), true) => e.to_string().red().to_string(),
        (Some(e), false) => e.to_string(),
    };
    CheckRow {
        option: c.option.clone(),
        value: c.value.clone().unwrap_or_default(),
        result,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Split `name=value` pairs from `--set`.
fn parse_assignments(pairs: &[String]) -> Result<BTreeMap<String, String>, CliError> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(name, _)| !name.trim().is_empty())
                .map(|(name, value)| (name.trim().to_owned(), value.to_owned()))
                .ok_or_else(|| CliError::Validation {
                    field: "set".into(),
                    reason: format!("expected NAME=VALUE, got '{pair}'"),
                })
        })
        .collect()
}

// ── Handler ──────────────────────────────────────────────────────────

pub fn handle(args: OptionsArgs, global: &GlobalOpts, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        OptionsCommand::Schema => {
            let out = output::render_list(
                &ctx.output,
                schema::schema(),
                |s| SchemaRow::from(s),
                |s| s.name.to_owned(),
            );
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        OptionsCommand::Check { set } => {
            let mut values = match ctx.active_profile(global)? {
                Some((_, profile)) => profile.option_values(),
                None => BTreeMap::new(),
            };
            values.extend(parse_assignments(&set)?);
            tracing::debug!(count = values.len(), "checking options");

            let checks = schema::validate_options(&values);
            let out = output::render_list(
                &ctx.output,
                &checks,
                |c| check_row(c, ctx.color),
                |c| {
                    c.error
                        .as_ref()
                        .map_or_else(|| format!("{}\tok", c.option), |e| format!("{}\t{e}", c.option))
                },
            );
            output::print_output(&out, ctx.quiet);

            let failed = checks.iter().filter(|c| !c.is_ok()).count();
            if failed > 0 {
                return Err(CliError::OptionsInvalid {
                    failed,
                    total: checks.len(),
                });
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        let parsed = parse_assignments(&["maptype=map-t".into(), "peeraddr=a=b".into()]).unwrap();
        assert_eq!(parsed.get("maptype").map(String::as_str), Some("map-t"));
        assert_eq!(parsed.get("peeraddr").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn assignments_reject_missing_name() {
        assert!(parse_assignments(&["=1".into()]).is_err());
        assert!(parse_assignments(&["mtu".into()]).is_err());
    }

    #[test]
    fn schema_row_required_marker() {
        let maptype = schema::lookup("maptype").unwrap();
        let row = SchemaRow::from(maptype);
        assert_eq!(row.name, "maptype");
        assert_eq!(row.datatype, maptype.datatype.to_string());
    }
}
