//! Config subcommand handlers.

use std::collections::BTreeMap;
use std::io::IsTerminal;

use serde::Serialize;
use tabled::Tabled;

use super::util;
use crate::cli::{ConfigArgs, ConfigCommand, OutputFormat};
use crate::config::{self, Context, InterfaceProfile, OptionValue};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct ProfileSummary {
    name: String,
    section: String,
    source: String,
    default: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Default")]
    default: &'static str,
}

impl From<&ProfileSummary> for ProfileRow {
    fn from(p: &ProfileSummary) -> Self {
        Self {
            name: p.name.clone(),
            section: p.section.clone(),
            source: p.source.clone(),
            default: if p.default { "*" } else { "" },
        }
    }
}

fn starter_profile(snapshot: Option<std::path::PathBuf>) -> InterfaceProfile {
    InterfaceProfile {
        section: None,
        snapshot,
        options: BTreeMap::from([("maptype".to_owned(), OptionValue::Text("map-e".into()))]),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let out = match ctx.output {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&ctx.config)?,
                _ => output::render_single(&ctx.output, &ctx.config, |_| String::new(), |_| String::new()),
            };
            output::print_output(out.trim_end(), ctx.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), ctx.quiet);
            Ok(())
        }

        ConfigCommand::Init { name, snapshot } => {
            let path = config::config_path();
            let mut cfg = config::load_config()?;

            if cfg.interfaces.contains_key(&name) {
                if !ctx.yes && !std::io::stdin().is_terminal() {
                    return Err(CliError::NonInteractiveRequiresYes {
                        path: path.display().to_string(),
                    });
                }
                let prompt = format!("Profile '{name}' already exists. Overwrite?");
                if !util::confirm(&prompt, ctx.yes)? {
                    eprintln!("Aborted.");
                    return Ok(());
                }
            }

            cfg.interfaces.insert(name.clone(), starter_profile(snapshot));
            if cfg.default_interface.is_none() {
                cfg.default_interface = Some(name.clone());
            }
            config::save_config(&cfg)?;
            tracing::info!(profile = %name, path = %path.display(), "config written");

            if !ctx.quiet {
                eprintln!("Wrote profile '{name}' to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Profiles => {
            let default = ctx.config.default_interface.as_deref();
            let profiles: Vec<ProfileSummary> = ctx
                .config
                .profile_names()
                .into_iter()
                .filter_map(|name| ctx.config.interfaces.get(name).map(|p| (name, p)))
                .map(|(name, p)| ProfileSummary {
                    name: name.to_owned(),
                    section: p.section_name(name).to_owned(),
                    source: p.snapshot.as_ref().map_or_else(
                        || "ubus".to_owned(),
                        |path| path.display().to_string(),
                    ),
                    default: default == Some(name),
                })
                .collect();

            let out = output::render_list(
                &ctx.output,
                &profiles,
                |p| ProfileRow::from(p),
                |p| p.name.clone(),
            );
            output::print_output(&out, ctx.quiet);
            Ok(())
        }
    }
}
