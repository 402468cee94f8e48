//! Clap derive structures for the `softwire` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// softwire -- inspect MAP-E / MAP-T / LW4over6 interfaces
#[derive(Debug, Parser)]
#[command(
    name = "softwire",
    version,
    about = "Inspect MAP-E / MAP-T / LW4over6 softwire interfaces",
    long_about = "Reads the status a softwire interface reports (from a file, stdin,\n\
        or `ubus call network.interface.<name> status`) and shows the\n\
        Basic Mapping Rule, share ratio, port sets and forwarding rules.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Read the status snapshot from a file ("-" for stdin)
    #[arg(long, short = 'f', env = "SOFTWIRE_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Query the status of this interface section via ubus
    #[arg(long, short = 'u', global = true, conflicts_with = "file")]
    pub ubus: Option<String>,

    /// Interface profile from the config file
    #[arg(long, short = 'i', env = "SOFTWIRE_INTERFACE", global = true)]
    pub interface: Option<String>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "SOFTWIRE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Status query timeout in seconds
    #[arg(long, env = "SOFTWIRE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// One-line summary: type, shared IPv4, share ratio, port sets
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Full view: interface, Basic Mapping Rule, port sets, rule table
    Show,

    /// Forwarding mapping rules advertised for the domain
    #[command(alias = "fmr")]
    Rules,

    /// IPv4 prefixes of every rule, in rule order
    Prefixes,

    /// Port ranges assigned by the Basic Mapping Rule
    Ports,

    /// Interface option schema and validation
    #[command(alias = "opt")]
    Options(OptionsArgs),

    /// Backend error codes and their meaning
    Errors,

    /// Manage CLI configuration and interface profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Re-read the snapshot at this interval until interrupted (e.g. "5s")
    #[arg(long, short = 'w', value_parser = humantime::parse_duration)]
    pub watch: Option<Duration>,
}

// ── Options ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OptionsArgs {
    #[command(subcommand)]
    pub command: OptionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OptionsCommand {
    /// List every option with its datatype
    Schema,

    /// Validate option values (from the interface profile and/or --set)
    Check {
        /// Option value as name=value (repeatable, overrides the profile)
        #[arg(long = "set", short = 's', value_name = "NAME=VALUE")]
        set: Vec<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file location
    Path,

    /// Write a starter config with one interface profile
    Init {
        /// Profile (and interface section) name
        #[arg(default_value = "wan6_4")]
        name: String,

        /// Read this profile's snapshot from a file instead of ubus
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// List configured interface profiles
    Profiles,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
