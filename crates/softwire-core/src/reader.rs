// ── Snapshot-to-domain conversion ──
//
// The only place raw backend JSON is inspected. Each field is resolved on
// its own: a malformed value becomes `None` (or an empty list) for that
// field and is logged at debug level, the rest of the snapshot still parses.

use std::net::IpAddr;

use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{
    AddressWithMask, InterfaceError, InterfaceStatus, MapConfig, MapRule, MapType, PortRange,
    rule::MAX_PSID_LENGTH,
};

// Wire keys. `dmr-addres` is the backend's own spelling and must match it.
const KEY_MAP: &str = "map";
const KEY_MAP_TYPE: &str = "map-type";
const KEY_LINK: &str = "link";
const KEY_BMR: &str = "bmr";
const KEY_RULE: &str = "rule";
const KEY_PSID_LEN: &str = "psid-len";
const KEY_IPV4_ADDRESS: &str = "ipv4-address";
const KEY_IPV6_ADDRESS: &str = "ipv6-address";
const KEY_DMR_ADDRESS: &str = "dmr-addres";
const KEY_IPV4_PREFIX: &str = "ipv4-prefix";
const KEY_IPV6_PREFIX: &str = "ipv6-prefix";
const KEY_PORT_SET: &str = "port-set";

// ── Helpers ────────────────────────────────────────────────────────

/// Read an integral JSON number. Floats are accepted only when whole and
/// within the exactly-representable range.
#[allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::as_conversions
)]
fn as_integer(value: &Value) -> Option<i64> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT)
            .map(|f| f as i64)
    })
}

fn as_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(String::from)
}

/// Read a mask: an integer, or a string holding one.
fn parse_mask(raw: Option<&Value>) -> Option<u8> {
    let mask = match raw? {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        other => as_integer(other),
    };
    mask.and_then(|m| u8::try_from(m).ok())
}

/// Parse an `{address, mask}` object. Only the address is required; a bad
/// mask loses the mask alone.
fn parse_address(raw: Option<&Value>, key: &str) -> Option<AddressWithMask> {
    let obj = raw?.as_object()?;

    let Some(address) = obj
        .get("address")
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
    else {
        debug!(field = key, "ignoring address object without a valid address");
        return None;
    };

    let parsed = AddressWithMask::new(address, parse_mask(obj.get("mask")));
    if parsed.mask.is_none() {
        debug!(field = key, "address has no usable mask");
    }
    Some(parsed)
}

fn parse_psid_length(raw: Option<&Value>) -> Option<u8> {
    let value = raw?;
    let psid = as_integer(value)
        .and_then(|v| u8::try_from(v).ok())
        .filter(|v| *v <= MAX_PSID_LENGTH);
    if psid.is_none() {
        debug!(value = %value, "ignoring out-of-range or non-numeric psid-len");
    }
    psid
}

/// Port-set entries are opaque; strings are kept verbatim, numbers rendered.
fn parse_port_set(raw: Option<&Value>) -> Vec<PortRange> {
    let Some(items) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(PortRange::new(s.as_str())),
            Value::Number(n) => Some(PortRange::new(n.to_string())),
            other => {
                debug!(value = %other, "skipping non-scalar port-set entry");
                None
            }
        })
        .collect()
}

fn parse_rule(raw: &Value) -> MapRule {
    let Some(obj) = raw.as_object() else {
        debug!("rule entry is not an object; keeping it as an unknown rule");
        return MapRule::default();
    };
    MapRule {
        ipv4_address: parse_address(obj.get(KEY_IPV4_ADDRESS), KEY_IPV4_ADDRESS),
        ipv6_address: parse_address(obj.get(KEY_IPV6_ADDRESS), KEY_IPV6_ADDRESS),
        dmr_address: parse_address(obj.get(KEY_DMR_ADDRESS), KEY_DMR_ADDRESS),
        ipv4_prefix: parse_address(obj.get(KEY_IPV4_PREFIX), KEY_IPV4_PREFIX),
        ipv6_prefix: parse_address(obj.get(KEY_IPV6_PREFIX), KEY_IPV6_PREFIX),
        psid_length: parse_psid_length(obj.get(KEY_PSID_LEN)),
        port_set: parse_port_set(obj.get(KEY_PORT_SET)),
    }
}

fn parse_rules(raw: Option<&Value>) -> Vec<MapRule> {
    match raw {
        Some(Value::Array(items)) => items.iter().map(parse_rule).collect(),
        Some(other) => {
            debug!(value = %other, "rule list is not an array; treating as empty");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn parse_bmr_index(raw: Option<&Value>) -> Option<i64> {
    let value = raw?;
    let index = as_integer(value);
    if index.is_none() {
        debug!(value = %value, "ignoring non-numeric bmr index");
    }
    index
}

fn parse_map_type(raw: Option<&Value>) -> MapType {
    raw.and_then(Value::as_str)
        .map_or(MapType::Unknown, MapType::from_tag)
}

fn map_object(snapshot: &Value) -> Option<&Map<String, Value>> {
    snapshot.get(KEY_MAP)?.as_object()
}

// ── Public entry points ────────────────────────────────────────────

/// Extract the MAP state from a status snapshot (the interface's `data` blob).
///
/// Returns `None` when the snapshot has no `map` object. Never fails
/// otherwise: malformed fields resolve to unknown individually.
pub fn parse(snapshot: &Value) -> Option<MapConfig> {
    let map = map_object(snapshot)?;

    Some(MapConfig {
        map_type: parse_map_type(map.get(KEY_MAP_TYPE)),
        link: as_string(map.get(KEY_LINK)),
        bmr_index: parse_bmr_index(map.get(KEY_BMR)),
        rules: parse_rules(map.get(KEY_RULE)),
    })
}

/// Read a full interface status dump, running [`parse`] over its `data`.
pub fn parse_interface_status(status: &Value) -> InterfaceStatus {
    let errors = status
        .get("errors")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let code = item.get("code").and_then(Value::as_str)?;
                    Some(InterfaceError {
                        subsystem: as_string(item.get("subsystem")),
                        code: code.to_owned(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    InterfaceStatus {
        interface: as_string(status.get("interface")),
        up: status.get("up").and_then(Value::as_bool).unwrap_or(false),
        l3_device: as_string(status.get("l3_device")),
        device: as_string(status.get("device")),
        errors,
        map: status.get("data").and_then(parse),
    }
}

/// Accept either a full interface dump (has a `data` object) or a bare
/// `data` blob, and read it as an [`InterfaceStatus`].
pub fn parse_document(document: &Value) -> InterfaceStatus {
    if document.get("data").is_some_and(Value::is_object) {
        parse_interface_status(document)
    } else {
        InterfaceStatus {
            map: parse(document),
            ..InterfaceStatus::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn single_rule_snapshot() -> Value {
        json!({
            "map": {
                "map-type": "map-e",
                "link": "wan6",
                "bmr": 1,
                "rule": [{
                    "psid-len": 4,
                    "ipv4-address": { "address": "192.0.2.1", "mask": 32 },
                    "ipv6-address": { "address": "2001:db8:12:3400::c000:201:34", "mask": 128 },
                    "dmr-addres": { "address": "2001:db8:ffff::1", "mask": 128 },
                    "ipv4-prefix": { "address": "192.0.2.0", "mask": 24 },
                    "ipv6-prefix": { "address": "2001:db8::", "mask": 40 },
                    "port-set": ["4144-4159", "8240-8255"]
                }]
            }
        })
    }

    #[test]
    fn missing_map_object_is_absent() {
        assert_eq!(parse(&json!({})), None);
        assert_eq!(parse(&json!({ "map": "map-e" })), None);
        assert_eq!(parse(&json!(null)), None);
        assert_eq!(parse(&json!([1, 2, 3])), None);
    }

    #[test]
    fn parses_full_rule() {
        let cfg = parse(&single_rule_snapshot()).unwrap();
        assert_eq!(cfg.map_type, MapType::MapE);
        assert_eq!(cfg.link.as_deref(), Some("wan6"));
        assert_eq!(cfg.bmr_index, Some(1));
        assert_eq!(cfg.rules.len(), 1);

        let rule = &cfg.rules[0];
        assert_eq!(rule.psid_length, Some(4));
        assert_eq!(
            rule.ipv4_address.map(|a| a.to_string()).as_deref(),
            Some("192.0.2.1/32")
        );
        assert_eq!(
            rule.dmr_address.map(|a| a.to_string()).as_deref(),
            Some("2001:db8:ffff::1/128")
        );
        assert_eq!(
            rule.port_set,
            vec![PortRange::new("4144-4159"), PortRange::new("8240-8255")]
        );
    }

    #[test]
    fn map_type_tags() {
        let ty = |tag: Value| parse(&json!({ "map": { "map-type": tag } })).unwrap().map_type;
        assert_eq!(ty(json!("lw4o6")), MapType::Lw4over6);
        assert_eq!(ty(json!("map-t")), MapType::MapT);
        assert_eq!(ty(json!("bogus")), MapType::Unknown);
        assert_eq!(ty(json!("Map-E")), MapType::Unknown);
        assert_eq!(ty(json!(7)), MapType::Unknown);
        assert_eq!(
            parse(&json!({ "map": {} })).unwrap().map_type,
            MapType::Unknown
        );
    }

    #[test]
    fn bmr_index_must_be_numeric() {
        let bmr = |v: Value| parse(&json!({ "map": { "bmr": v } })).unwrap().bmr_index;
        assert_eq!(bmr(json!(2)), Some(2));
        assert_eq!(bmr(json!(2.0)), Some(2));
        assert_eq!(bmr(json!(-3)), Some(-3));
        assert_eq!(bmr(json!("1")), None);
        assert_eq!(bmr(json!(1.5)), None);
        assert_eq!(bmr(json!(null)), None);
        assert_eq!(bmr(json!(true)), None);
    }

    #[test]
    fn non_list_rules_are_empty() {
        let cfg = parse(&json!({ "map": { "rule": { "psid-len": 4 } } })).unwrap();
        assert!(cfg.rules.is_empty());
    }

    #[test]
    fn non_object_rule_entries_keep_their_position() {
        let cfg = parse(&json!({ "map": { "rule": [null, { "psid-len": 2 }] } })).unwrap();
        assert_eq!(cfg.rules.len(), 2);
        assert_eq!(cfg.rules[0], MapRule::default());
        assert_eq!(cfg.rules[1].psid_length, Some(2));
    }

    #[test]
    fn malformed_fields_resolve_individually() {
        let cfg = parse(&json!({
            "map": {
                "link": 12,
                "rule": [{
                    "psid-len": 17,
                    "ipv4-address": { "address": "192.0.2.1", "mask": 33 },
                    "ipv6-address": { "address": "not-an-ip", "mask": 64 },
                    "ipv4-prefix": { "address": "192.0.2.0" },
                    "ipv6-prefix": { "address": "2001:db8::", "mask": 40 },
                    "port-set": "1024-2047"
                }]
            }
        }))
        .unwrap();

        assert_eq!(cfg.link, None);
        let rule = &cfg.rules[0];
        assert_eq!(rule.psid_length, None);
        assert_eq!(
            rule.ipv4_address.map(|a| a.to_string()).as_deref(),
            Some("192.0.2.1/")
        );
        assert_eq!(rule.ipv6_address, None);
        assert_eq!(
            rule.ipv4_prefix.map(|a| a.to_string()).as_deref(),
            Some("192.0.2.0/")
        );
        assert_eq!(rule.dmr_address, None);
        assert!(rule.ipv6_prefix.is_some());
        assert!(rule.port_set.is_empty());
    }

    #[test]
    fn address_survives_missing_or_textual_mask() {
        let cfg = parse(&json!({
            "map": {
                "rule": [{
                    "ipv4-address": { "address": "192.0.2.1" },
                    "ipv6-address": { "address": "2001:db8::1", "mask": "128" },
                    "dmr-addres": { "address": "2001:db8:ffff::1", "mask": "wide" }
                }]
            }
        }))
        .unwrap();

        let rule = &cfg.rules[0];
        let v4 = rule.ipv4_address.unwrap();
        assert_eq!(v4.address, "192.0.2.1".parse::<IpAddr>().unwrap());
        assert_eq!(v4.mask, None);
        assert_eq!(
            rule.ipv6_address.map(|a| a.to_string()).as_deref(),
            Some("2001:db8::1/128")
        );
        assert_eq!(
            rule.dmr_address.map(|a| a.to_string()).as_deref(),
            Some("2001:db8:ffff::1/")
        );
    }

    #[test]
    fn correctly_spelled_dmr_key_is_not_read() {
        let cfg = parse(&json!({
            "map": { "rule": [{ "dmr-address": { "address": "2001:db8::1", "mask": 128 } }] }
        }))
        .unwrap();
        assert_eq!(cfg.rules[0].dmr_address, None);
    }

    #[test]
    fn port_set_keeps_backend_order() {
        let cfg = parse(&json!({
            "map": { "rule": [{ "port-set": ["9000-9015", 1024, {"x": 1}, "2048-2063"] }] }
        }))
        .unwrap();
        let ports: Vec<&str> = cfg.rules[0].port_set.iter().map(PortRange::as_str).collect();
        assert_eq!(ports, vec!["9000-9015", "1024", "2048-2063"]);
    }

    #[test]
    fn interface_status_dump() {
        let status = parse_interface_status(&json!({
            "interface": "wan6_4",
            "up": true,
            "l3_device": "map-wan6_4",
            "device": "map-wan6_4",
            "errors": [
                { "subsystem": "map", "code": "NO_MATCHING_PD" },
                { "subsystem": "map" }
            ],
            "data": single_rule_snapshot()
        }));

        assert_eq!(status.interface.as_deref(), Some("wan6_4"));
        assert!(status.up);
        assert_eq!(status.l3_device.as_deref(), Some("map-wan6_4"));
        assert_eq!(status.errors.len(), 1);
        assert_eq!(status.errors[0].code, "NO_MATCHING_PD");
        assert_eq!(status.map.unwrap().map_type, MapType::MapE);
    }

    #[test]
    fn document_detection() {
        let bare = parse_document(&single_rule_snapshot());
        assert!(bare.map.is_some());
        assert!(!bare.up);

        let wrapped = parse_document(&json!({ "up": true, "data": single_rule_snapshot() }));
        assert!(wrapped.up);
        assert!(wrapped.map.is_some());

        let empty = parse_document(&json!({ "up": true, "data": {} }));
        assert!(empty.up);
        assert_eq!(empty.map, None);
    }
}
