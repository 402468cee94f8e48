//! Rule table, IPv4 prefix list and port ranges.

use tabled::Tabled;

use softwire_core::{PortRange, RuleResolver, RuleRow};

use super::util::{self, Source};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

const NO_RULES: &str = "There are no rules";

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleTableRow {
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Share Ratio")]
    share_ratio: String,
    #[tabled(rename = "Shared IPv4")]
    ipv4_address: String,
    #[tabled(rename = "MAP IPv6 Address")]
    ipv6_address: String,
    #[tabled(rename = "BR / DMR / AFTR")]
    border_relay: String,
    #[tabled(rename = "IPv4 Prefix")]
    ipv4_prefix: String,
    #[tabled(rename = "IPv6 Prefix")]
    ipv6_prefix: String,
}

impl From<&RuleRow> for RuleTableRow {
    fn from(r: &RuleRow) -> Self {
        Self {
            index: r.index,
            share_ratio: r.share_ratio.map(|s| s.to_string()).unwrap_or_default(),
            ipv4_address: r.ipv4_address.clone(),
            ipv6_address: r.ipv6_address.clone(),
            border_relay: r.border_relay.clone(),
            ipv4_prefix: r.ipv4_prefix.clone(),
            ipv6_prefix: r.ipv6_prefix.clone(),
        }
    }
}

#[derive(Tabled)]
struct PrefixRow {
    #[tabled(rename = "IPv4 Prefix")]
    prefix: String,
}

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port Range")]
    range: String,
}

/// The rule table as text, or a notice when there are no rules.
pub fn rules_table(rules: &[RuleRow]) -> String {
    if rules.is_empty() {
        return NO_RULES.to_owned();
    }
    let rows: Vec<RuleTableRow> = rules.iter().map(RuleTableRow::from).collect();
    output::render_table(&rows)
}

// ── Handlers ─────────────────────────────────────────────────────────

pub async fn handle_rules(global: &GlobalOpts, ctx: &Context) -> Result<(), CliError> {
    let status = util::load_status(&Source::resolve(global, ctx)?, ctx).await?;
    let rules = RuleResolver::new(status.map.as_ref()).rule_table();

    let out = match ctx.output {
        OutputFormat::Table => rules_table(&rules),
        _ => output::render_list(
            &ctx.output,
            &rules,
            |r| RuleTableRow::from(r),
            |r| r.ipv4_address.clone(),
        ),
    };
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub async fn handle_prefixes(global: &GlobalOpts, ctx: &Context) -> Result<(), CliError> {
    let status = util::load_status(&Source::resolve(global, ctx)?, ctx).await?;
    let prefixes = RuleResolver::new(status.map.as_ref()).all_ipv4_prefixes();

    let out = output::render_list(
        &ctx.output,
        &prefixes,
        |p| PrefixRow { prefix: p.clone() },
        |p| p.clone(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub async fn handle_ports(global: &GlobalOpts, ctx: &Context) -> Result<(), CliError> {
    let status = util::load_status(&Source::resolve(global, ctx)?, ctx).await?;
    let resolver = RuleResolver::new(status.map.as_ref());
    let ranges: &[PortRange] = resolver.port_ranges();

    let out = output::render_list(
        &ctx.output,
        ranges,
        |r| PortRow {
            range: r.to_string(),
        },
        |r| r.to_string(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}
