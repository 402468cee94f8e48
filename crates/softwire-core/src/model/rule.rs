// ── Mapping rule types ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::address::AddressWithMask;

/// Largest PSID length a rule may carry (the PSID lives in a 16-bit port).
pub const MAX_PSID_LENGTH: u8 = 16;

/// One assigned port range, pre-formatted by the backend.
///
/// Opaque: never parsed, sorted or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortRange(String);

impl PortRange {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of subscribers sharing one IPv4 address (`2^psid_length`).
///
/// Displays as `1:N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareRatio(u32);

impl ShareRatio {
    /// Ratio for a PSID length, `None` past [`MAX_PSID_LENGTH`].
    pub fn from_psid_length(psid_length: u8) -> Option<Self> {
        (psid_length <= MAX_PSID_LENGTH).then(|| Self(1_u32 << psid_length))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// True when more than one subscriber shares the address.
    pub fn is_shared(self) -> bool {
        self.0 > 1
    }
}

impl fmt::Display for ShareRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", self.0)
    }
}

/// One entry of the reported rule list.
///
/// Every field is independently optional; the backend omits fields during
/// transient states. `port_set` is only populated on the rule acting as BMR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRule {
    pub ipv4_address: Option<AddressWithMask>,
    pub ipv6_address: Option<AddressWithMask>,
    /// BR / DMR / AFTR address (raw key `dmr-addres`).
    pub dmr_address: Option<AddressWithMask>,
    pub ipv4_prefix: Option<AddressWithMask>,
    pub ipv6_prefix: Option<AddressWithMask>,
    pub psid_length: Option<u8>,
    pub port_set: Vec<PortRange>,
}

impl MapRule {
    /// This rule's own share ratio, independent of which rule is the BMR.
    pub fn share_ratio(&self) -> Option<ShareRatio> {
        self.psid_length.and_then(ShareRatio::from_psid_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_from_psid_length() {
        assert_eq!(ShareRatio::from_psid_length(0).map(ShareRatio::get), Some(1));
        assert_eq!(ShareRatio::from_psid_length(4).map(ShareRatio::get), Some(16));
        assert_eq!(
            ShareRatio::from_psid_length(16).map(ShareRatio::get),
            Some(65_536)
        );
        assert_eq!(ShareRatio::from_psid_length(17), None);
    }

    #[test]
    fn ratio_one_is_not_shared() {
        let ratio = ShareRatio::from_psid_length(0);
        assert_eq!(ratio.map(ShareRatio::is_shared), Some(false));
        assert_eq!(ratio.map(|r| r.to_string()).as_deref(), Some("1:1"));
    }

    #[test]
    fn rule_without_psid_has_no_ratio() {
        assert_eq!(MapRule::default().share_ratio(), None);
    }
}
