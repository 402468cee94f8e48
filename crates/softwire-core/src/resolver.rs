// ── Mapping-rule resolution ──
//
// Pure derivations over an optional `MapConfig`. Nothing here returns an
// error or panics: an absent config, an out-of-range BMR index or a rule
// with missing fields all degrade to `None` / empty values, so a live
// status view always has something to render.

use std::net::IpAddr;

use serde::Serialize;

use crate::model::{AddressWithMask, MapConfig, MapRule, MapType, PortRange, ShareRatio};

/// One display-ready row of the forwarding-rule table.
///
/// Missing fields are empty strings; the row itself is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRow {
    /// Zero-based position in the reported rule list.
    pub index: usize,
    pub share_ratio: Option<ShareRatio>,
    pub ipv4_address: String,
    pub ipv6_address: String,
    pub border_relay: String,
    pub ipv4_prefix: String,
    pub ipv6_prefix: String,
}

/// Everything a status view shows about the node's own mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BmrSummary {
    pub map_type: MapType,
    pub link: Option<String>,
    pub shared_ipv4: Option<IpAddr>,
    pub ipv6_address: Option<IpAddr>,
    pub border_relay: Option<AddressWithMask>,
    pub share_ratio: Option<ShareRatio>,
    pub port_ranges: Vec<PortRange>,
}

/// Derives display values from an optional [`MapConfig`].
#[derive(Debug, Clone, Copy)]
pub struct RuleResolver<'a> {
    config: Option<&'a MapConfig>,
}

fn address_text(addr: Option<AddressWithMask>) -> String {
    addr.map(|a| a.address.to_string()).unwrap_or_default()
}

fn prefix_text(addr: Option<AddressWithMask>) -> String {
    addr.map(|a| a.to_string()).unwrap_or_default()
}

impl<'a> RuleResolver<'a> {
    pub fn new(config: Option<&'a MapConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> Option<&'a MapConfig> {
        self.config
    }

    pub fn map_type(&self) -> MapType {
        self.config.map_or(MapType::Unknown, |c| c.map_type)
    }

    pub fn link(&self) -> Option<&'a str> {
        self.config.and_then(|c| c.link.as_deref())
    }

    fn rules(&self) -> &'a [MapRule] {
        self.config.map(|c| c.rules.as_slice()).unwrap_or_default()
    }

    /// The rule governing this node's own mapping: `rules[bmr_index - 1]`
    /// when the 1-based index is in range.
    pub fn effective_bmr(&self) -> Option<&'a MapRule> {
        let index = self.config?.bmr_index?;
        let position = usize::try_from(index.checked_sub(1)?).ok()?;
        self.rules().get(position)
    }

    /// `2^psid_length` of the effective BMR. `None` when there is no BMR or
    /// it carries no PSID length; a ratio of 1 means no sharing.
    pub fn share_ratio(&self) -> Option<ShareRatio> {
        self.effective_bmr().and_then(MapRule::share_ratio)
    }

    pub fn own_ipv4_address(&self) -> Option<IpAddr> {
        self.effective_bmr()?.ipv4_address.map(|a| a.address)
    }

    pub fn own_ipv6_address(&self) -> Option<IpAddr> {
        self.effective_bmr()?.ipv6_address.map(|a| a.address)
    }

    pub fn border_relay_address(&self) -> Option<AddressWithMask> {
        self.effective_bmr()?.dmr_address
    }

    /// The BMR's port set in backend order, or empty.
    pub fn port_ranges(&self) -> &'a [PortRange] {
        self.effective_bmr()
            .map(|r| r.port_set.as_slice())
            .unwrap_or_default()
    }

    /// Every rule's IPv4 address as `address/mask` (`address/` when the mask
    /// is unknown), in rule order. Rules
    /// without one contribute nothing.
    pub fn all_ipv4_prefixes(&self) -> Vec<String> {
        self.rules()
            .iter()
            .filter_map(|r| r.ipv4_address)
            .map(|a| a.to_string())
            .collect()
    }

    /// One row per reported rule, in order, each with its own share ratio.
    pub fn rule_table(&self) -> Vec<RuleRow> {
        self.rules()
            .iter()
            .enumerate()
            .map(|(index, rule)| RuleRow {
                index,
                share_ratio: rule.share_ratio(),
                ipv4_address: address_text(rule.ipv4_address),
                ipv6_address: address_text(rule.ipv6_address),
                border_relay: prefix_text(rule.dmr_address),
                ipv4_prefix: prefix_text(rule.ipv4_prefix),
                ipv6_prefix: prefix_text(rule.ipv6_prefix),
            })
            .collect()
    }

    pub fn summary(&self) -> BmrSummary {
        BmrSummary {
            map_type: self.map_type(),
            link: self.link().map(String::from),
            shared_ipv4: self.own_ipv4_address(),
            ipv6_address: self.own_ipv6_address(),
            border_relay: self.border_relay_address(),
            share_ratio: self.share_ratio(),
            port_ranges: self.port_ranges().to_vec(),
        }
    }
}
