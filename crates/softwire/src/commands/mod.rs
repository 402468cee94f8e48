//! Command dispatch: bridges CLI args -> snapshot source -> output formatting.

pub mod config_cmd;
pub mod errors;
pub mod options;
pub mod rules;
pub mod status;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a command that reads interface state or the option schema.
pub async fn dispatch(cmd: Command, global: &GlobalOpts, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Status(args) => status::handle(args, global, ctx).await,
        Command::Show => status::handle_show(global, ctx).await,
        Command::Rules => rules::handle_rules(global, ctx).await,
        Command::Prefixes => rules::handle_prefixes(global, ctx).await,
        Command::Ports => rules::handle_ports(global, ctx).await,
        Command::Options(args) => options::handle(args, global, ctx),
        Command::Errors => errors::handle(global, ctx).await,
        Command::Config(args) => config_cmd::handle(args, ctx),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
