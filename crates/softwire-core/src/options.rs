// ── Interface option schema ──
//
// The options a MAP interface section is configured with, their labels and
// the datatype each value must satisfy. Values arrive as strings (the
// backend's configuration store is string-typed), so every validator works
// on `&str`.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Serialize, Serializer};

use crate::error::CoreError;

/// Form tab an option is shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OptionTab {
    General,
    Advanced,
}

/// Datatype constraint of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDatatype {
    /// One of a fixed set of tags.
    OneOf(&'static [&'static str]),
    /// IPv4 address, optionally with a `/prefix`.
    Ip4Addr,
    /// IPv6 address, optionally with a `/prefix`.
    Ip6Addr,
    /// Integer in `min..=max`.
    Range { min: u32, max: u32 },
    /// Integer no larger than the bound.
    Max(u32),
    /// Name of another interface section.
    NetworkName,
    /// Boolean flag.
    Flag,
}

impl fmt::Display for OptionDatatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneOf(values) => write!(f, "list({})", values.join("|")),
            Self::Ip4Addr => f.write_str("ip4addr"),
            Self::Ip6Addr => f.write_str("ip6addr"),
            Self::Range { min, max } => write!(f, "range({min},{max})"),
            Self::Max(max) => write!(f, "max({max})"),
            Self::NetworkName => f.write_str("network"),
            Self::Flag => f.write_str("bool"),
        }
    }
}

impl Serialize for OptionDatatype {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_integer(value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| "expected a non-negative integer".to_owned())
}

/// Split an optional `/prefix` suffix off an address and bound-check it.
fn split_prefix(value: &str, width: u32) -> Result<&str, String> {
    match value.split_once('/') {
        Some((addr, prefix)) => {
            let bits = parse_integer(prefix)?;
            if bits > width {
                return Err(format!("prefix length {bits} exceeds {width}"));
            }
            Ok(addr)
        }
        None => Ok(value),
    }
}

impl OptionDatatype {
    /// Check a value against this datatype, returning the reason on failure.
    pub fn check(&self, value: &str) -> Result<(), String> {
        match self {
            Self::OneOf(allowed) => {
                if allowed.iter().any(|a| *a == value) {
                    Ok(())
                } else {
                    Err(format!("expected one of {}", allowed.join(", ")))
                }
            }
            Self::Ip4Addr => split_prefix(value, 32)?
                .parse::<Ipv4Addr>()
                .map(|_| ())
                .map_err(|_| "expected an IPv4 address".to_owned()),
            Self::Ip6Addr => split_prefix(value, 128)?
                .parse::<Ipv6Addr>()
                .map(|_| ())
                .map_err(|_| "expected an IPv6 address".to_owned()),
            Self::Range { min, max } => {
                let n = parse_integer(value)?;
                if (*min..=*max).contains(&n) {
                    Ok(())
                } else {
                    Err(format!("expected a value between {min} and {max}"))
                }
            }
            Self::Max(max) => {
                let n = parse_integer(value)?;
                if n <= *max {
                    Ok(())
                } else {
                    Err(format!("expected a value no larger than {max}"))
                }
            }
            Self::NetworkName => {
                if !value.is_empty()
                    && value
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    Ok(())
                } else {
                    Err("expected an interface name (letters, digits, underscore)".to_owned())
                }
            }
            Self::Flag => match value {
                "0" | "1" | "yes" | "no" | "on" | "off" | "true" | "false" => Ok(()),
                _ => Err("expected a boolean (0/1)".to_owned()),
            },
        }
    }
}

/// One configurable option of a MAP interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub tab: OptionTab,
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub datatype: OptionDatatype,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    pub required: bool,
}

impl OptionSpec {
    /// Validate a raw value. An empty value counts as unset.
    pub fn validate(&self, value: Option<&str>) -> Result<(), CoreError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None if self.required => Err(CoreError::MissingOption {
                option: self.name.to_owned(),
            }),
            None => Ok(()),
            Some(v) => self
                .datatype
                .check(v)
                .map_err(|reason| CoreError::InvalidOption {
                    option: self.name.to_owned(),
                    value: v.to_owned(),
                    reason,
                }),
        }
    }
}

pub const MAP_TYPES: &[&str] = &["map-e", "map-t", "lw4o6"];

const fn spec(
    tab: OptionTab,
    name: &'static str,
    label: &'static str,
    datatype: OptionDatatype,
) -> OptionSpec {
    OptionSpec {
        tab,
        name,
        label,
        description: None,
        datatype,
        placeholder: None,
        required: false,
    }
}

const fn range(min: u32, max: u32) -> OptionDatatype {
    OptionDatatype::Range { min, max }
}

static SCHEMA: [OptionSpec; 13] = [
    spec(OptionTab::General, "maptype", "Type", OptionDatatype::OneOf(MAP_TYPES)),
    OptionSpec {
        required: true,
        ..spec(OptionTab::General, "peeraddr", "BR / DMR / AFTR", OptionDatatype::Ip6Addr)
    },
    spec(OptionTab::General, "ipaddr", "IPv4 prefix", OptionDatatype::Ip4Addr),
    OptionSpec {
        description: Some(
            "The length of the IPv4 prefix in bits, the remainder is used in the IPv6 addresses.",
        ),
        placeholder: Some("32"),
        ..spec(OptionTab::General, "ip4prefixlen", "IPv4 prefix length", range(0, 32))
    },
    OptionSpec {
        description: Some("The IPv6 prefix assigned to the provider, usually ends with ::"),
        required: true,
        ..spec(OptionTab::General, "ip6prefix", "IPv6 prefix", OptionDatatype::Ip6Addr)
    },
    OptionSpec {
        description: Some("The length of the IPv6 prefix in bits"),
        placeholder: Some("16"),
        ..spec(OptionTab::General, "ip6prefixlen", "IPv6 prefix length", range(0, 64))
    },
    spec(OptionTab::General, "ealen", "EA-bits length", range(0, 48)),
    spec(OptionTab::General, "psidlen", "PSID-bits length", range(0, 16)),
    spec(OptionTab::General, "offset", "PSID offset", range(0, 16)),
    spec(OptionTab::Advanced, "tunlink", "Tunnel Link", OptionDatatype::NetworkName),
    OptionSpec {
        placeholder: Some("64"),
        ..spec(OptionTab::Advanced, "ttl", "Use TTL on tunnel interface", range(1, 255))
    },
    OptionSpec {
        placeholder: Some("1280"),
        ..spec(
            OptionTab::Advanced,
            "mtu",
            "Use MTU on tunnel interface",
            OptionDatatype::Max(9200),
        )
    },
    OptionSpec {
        description: Some(
            "Use legacy MAP interface identifier format (draft-ietf-softwire-map-00) instead of RFC7597",
        ),
        ..spec(OptionTab::Advanced, "legacymap", "Use legacy MAP", OptionDatatype::Flag)
    },
];

/// Every option, in form order.
pub fn schema() -> &'static [OptionSpec] {
    &SCHEMA
}

pub fn lookup(name: &str) -> Option<&'static OptionSpec> {
    SCHEMA.iter().find(|s| s.name == name)
}

/// Result of checking one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCheck {
    pub option: String,
    pub value: Option<String>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<CoreError>,
}

impl OptionCheck {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[allow(clippy::ref_option)]
fn serialize_error<S: Serializer>(err: &Option<CoreError>, serializer: S) -> Result<S::Ok, S::Error> {
    match err {
        Some(e) => serializer.collect_str(e),
        None => serializer.serialize_none(),
    }
}

/// Check a set of option values against the schema.
///
/// Yields one entry per schema option (in form order) followed by one per
/// unrecognized option name.
pub fn validate_options(values: &BTreeMap<String, String>) -> Vec<OptionCheck> {
    let known = SCHEMA.iter().map(|spec| {
        let value = values.get(spec.name);
        OptionCheck {
            option: spec.name.to_owned(),
            value: value.cloned(),
            error: spec.validate(value.map(String::as_str)).err(),
        }
    });

    let unknown = values
        .iter()
        .filter(|(name, _)| lookup(name).is_none())
        .map(|(name, value)| OptionCheck {
            option: name.clone(),
            value: Some(value.clone()),
            error: Some(CoreError::UnknownOption {
                option: name.clone(),
            }),
        });

    known.chain(unknown).collect()
}
