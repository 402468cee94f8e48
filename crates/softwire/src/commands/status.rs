//! Status views: the compact summary (`status`) and the full view (`show`).

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use softwire_core::{BmrSummary, InterfaceStatus, ProtocolRegistry, RuleResolver, RuleRow};

use super::errors::ReportedError;
use super::rules::rules_table;
use super::util::{self, Source};
use crate::cli::{GlobalOpts, StatusArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

// ── Views ────────────────────────────────────────────────────────────

/// Interface facts plus the node's own mapping.
#[derive(Debug, Serialize)]
pub struct StatusView {
    pub interface: Option<String>,
    pub device: Option<String>,
    pub up: bool,
    #[serde(flatten)]
    pub bmr: BmrSummary,
    pub errors: Vec<ReportedError>,
}

impl StatusView {
    pub fn new(status: &InterfaceStatus, registry: &ProtocolRegistry) -> Self {
        let resolver = RuleResolver::new(status.map.as_ref());
        let device = match (registry.protocol("map"), status.interface.as_deref()) {
            (Some(proto), Some(section)) => {
                Some(proto.interface_name(status.l3_device.as_deref(), section))
            }
            _ => status.l3_device.clone(),
        };
        Self {
            interface: status.interface.clone(),
            device,
            up: status.up,
            bmr: resolver.summary(),
            errors: status
                .errors
                .iter()
                .map(|e| ReportedError::new(e, registry))
                .collect(),
        }
    }
}

/// `StatusView` plus the full forwarding-rule table.
#[derive(Debug, Serialize)]
pub struct ShowView {
    #[serde(flatten)]
    pub status: StatusView,
    pub rules: Vec<RuleRow>,
}

// ── Detail renderers ─────────────────────────────────────────────────

fn compact_detail(view: &StatusView, color: bool) -> String {
    let bmr = &view.bmr;
    let ratio = bmr.share_ratio;
    output::detail_lines(&[
        ("Type", Some(bmr.map_type.to_string())),
        ("Shared IPv4", bmr.shared_ipv4.map(|a| a.to_string())),
        ("Share Ratio", Some(output::or_unknown(ratio, color))),
        (
            "Port Set",
            ratio
                .filter(|r| r.is_shared())
                .map(|_| format!("{} ranges", bmr.port_ranges.len())),
        ),
    ])
}

fn show_detail(view: &ShowView, color: bool) -> String {
    let status = &view.status;
    let bmr = &status.bmr;
    let mut out = String::new();

    let title = status.interface.as_deref().unwrap_or("interface").to_uppercase();
    let _ = writeln!(out, "{}", output::heading(&title, color));
    let _ = writeln!(
        out,
        "{}\n",
        output::detail_lines(&[
            ("Device", Some(status.device.clone().unwrap_or_else(|| "Not present".into()))),
            ("Uplink", bmr.link.as_deref().map(str::to_uppercase)),
            ("Connected", Some(output::yes_no(status.up, color))),
        ])
    );

    let _ = writeln!(out, "{}", output::heading("Basic Mapping Rule", color));
    let _ = writeln!(
        out,
        "{}",
        output::detail_lines(&[
            ("Type", Some(bmr.map_type.to_string())),
            ("Shared IPv4", bmr.shared_ipv4.map(|a| a.to_string())),
            ("MAP IPv6", bmr.ipv6_address.map(|a| a.to_string())),
            ("BR / DMR / AFTR", bmr.border_relay.map(|a| a.to_string())),
            ("Share Ratio", Some(output::or_unknown(bmr.share_ratio, color))),
        ])
    );

    if bmr.share_ratio.is_some() {
        let _ = writeln!(out, "\n{}", output::heading("Port Sets", color));
        if bmr.port_ranges.is_empty() {
            let _ = writeln!(out, "(none)");
        }
        for range in &bmr.port_ranges {
            let _ = writeln!(out, "  {range}");
        }
    }

    let _ = writeln!(out, "\n{}", output::heading("Forwarding Mapping Rules", color));
    let _ = write!(out, "{}", rules_table(&view.rules));

    if !status.errors.is_empty() {
        let _ = write!(out, "\n\n{}", output::heading("Errors", color));
        for err in &status.errors {
            let _ = write!(out, "\n  {err}");
        }
    }
    out
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn render_status(source: &Source, ctx: &Context, registry: &ProtocolRegistry) -> Result<(), CliError> {
    let status = util::load_status(source, ctx).await?;
    let view = StatusView::new(&status, registry);
    let out = output::render_single(
        &ctx.output,
        &view,
        |v| compact_detail(v, ctx.color),
        |v| v.bmr.shared_ipv4.map(|a| a.to_string()).unwrap_or_default(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub async fn handle(args: StatusArgs, global: &GlobalOpts, ctx: &Context) -> Result<(), CliError> {
    let registry = ProtocolRegistry::new();
    let source = Source::resolve(global, ctx)?;

    let Some(period) = args.watch else {
        return render_status(&source, ctx, &registry).await;
    };
    validate_watch(period, &source)?;

    tracing::info!(interval = %humantime::format_duration(period), "watching status");
    let mut ticker = tokio::time::interval(period);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut first = true;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !first && !ctx.quiet {
                    println!();
                }
                first = false;
                // A failed refresh must not end the watch.
                if let Err(err) = render_status(&source, ctx, &registry).await {
                    tracing::warn!(error = %err, "status refresh failed");
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
    Ok(())
}

fn validate_watch(period: Duration, source: &Source) -> Result<(), CliError> {
    if period.is_zero() {
        return Err(CliError::Validation {
            field: "watch".into(),
            reason: "interval must be greater than zero".into(),
        });
    }
    if !source.is_repeatable() {
        return Err(CliError::Validation {
            field: "watch".into(),
            reason: "a snapshot read from stdin cannot be refreshed".into(),
        });
    }
    Ok(())
}

pub async fn handle_show(global: &GlobalOpts, ctx: &Context) -> Result<(), CliError> {
    let registry = ProtocolRegistry::new();
    let source = Source::resolve(global, ctx)?;
    let status = util::load_status(&source, ctx).await?;

    let view = ShowView {
        status: StatusView::new(&status, &registry),
        rules: RuleResolver::new(status.map.as_ref()).rule_table(),
    };
    let out = output::render_single(
        &ctx.output,
        &view,
        |v| show_detail(v, ctx.color),
        |v| v.status.interface.clone().unwrap_or_default(),
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use softwire_core::reader::parse_document;

    fn status() -> InterfaceStatus {
        parse_document(&json!({
            "interface": "wan6_4",
            "up": true,
            "l3_device": "map-wan6_4",
            "errors": [{ "subsystem": "map", "code": "NO_MATCHING_PD" }],
            "data": { "map": {
                "map-type": "map-e",
                "link": "wan6",
                "bmr": 1,
                "rule": [{
                    "psid-len": 4,
                    "ipv4-address": { "address": "192.0.2.1", "mask": 32 },
                    "ipv6-address": { "address": "2001:db8::1", "mask": 128 },
                    "dmr-addres": { "address": "2001:db8:ffff::1", "mask": 128 },
                    "port-set": ["1024-1039", "2048-2063"]
                }]
            }}
        }))
    }

    #[test]
    fn compact_view_lists_port_set_when_shared() {
        let view = StatusView::new(&status(), &ProtocolRegistry::new());
        let text = compact_detail(&view, false);
        assert!(text.contains("MAP-E"));
        assert!(text.contains("Shared IPv4:  192.0.2.1"));
        assert!(text.contains("1:16"));
        assert!(text.contains("2 ranges"));
    }

    #[test]
    fn compact_view_without_map_data() {
        let status = InterfaceStatus {
            interface: Some("wan6_4".into()),
            ..InterfaceStatus::default()
        };
        let view = StatusView::new(&status, &ProtocolRegistry::new());
        let text = compact_detail(&view, false);
        assert!(text.contains("Type:"));
        assert!(text.contains("Unknown"));
        assert!(!text.contains("Shared IPv4"));
        assert!(!text.contains("Port Set"));
        assert_eq!(view.device.as_deref(), Some("map-wan6_4"));
    }

    #[test]
    fn show_view_sections() {
        let status = status();
        let view = ShowView {
            status: StatusView::new(&status, &ProtocolRegistry::new()),
            rules: RuleResolver::new(status.map.as_ref()).rule_table(),
        };
        let text = show_detail(&view, false);
        assert!(text.starts_with("WAN6_4\n"));
        assert!(text.contains("Uplink:     WAN6"));
        assert!(text.contains("Connected:  yes"));
        assert!(text.contains("BR / DMR / AFTR:  2001:db8:ffff::1/128"));
        assert!(text.contains("  1024-1039"));
        assert!(text.contains("NO_MATCHING_PD"));
        assert!(text.contains("No matching prefix delegation"));
    }

    #[test]
    fn watch_rejects_stdin_and_zero() {
        assert!(validate_watch(Duration::ZERO, &Source::File("x".into())).is_err());
        assert!(validate_watch(Duration::from_secs(1), &Source::Stdin).is_err());
        assert!(validate_watch(Duration::from_secs(1), &Source::Ubus("wan".into())).is_ok());
    }
}
