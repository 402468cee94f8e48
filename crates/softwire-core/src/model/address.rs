// ── Address / prefix pairs ──

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// An IPv4 or IPv6 address (or prefix) with its mask length.
///
/// The mask is optional on its own: a missing or malformed mask leaves the
/// address usable. When present it never exceeds the address family's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressWithMask {
    pub address: IpAddr,
    pub mask: Option<u8>,
}

impl AddressWithMask {
    /// Pair an address with a mask. A mask wider than the address family
    /// allows is dropped.
    pub fn new(address: IpAddr, mask: Option<u8>) -> Self {
        Self {
            address,
            mask: mask.filter(|m| *m <= max_mask(address)),
        }
    }
}

/// Bit width of the address family.
fn max_mask(address: IpAddr) -> u8 {
    match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl fmt::Display for AddressWithMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mask {
            Some(mask) => write!(f, "{}/{mask}", self.address),
            None => write!(f, "{}/", self.address),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mask_bounded_by_family() {
        let v4: IpAddr = "192.0.2.1".parse().unwrap();
        assert_eq!(AddressWithMask::new(v4, Some(32)).mask, Some(32));
        assert_eq!(AddressWithMask::new(v4, Some(33)).mask, None);

        let v6: IpAddr = "2001:db8::".parse().unwrap();
        assert_eq!(AddressWithMask::new(v6, Some(128)).mask, Some(128));
        let wide = AddressWithMask::new(v6, Some(129));
        assert_eq!(wide.mask, None);
        assert_eq!(wide.address, v6);
    }

    #[test]
    fn displays_as_slash_notation() {
        let addr = AddressWithMask::new("198.51.100.0".parse().unwrap(), Some(24));
        assert_eq!(addr.to_string(), "198.51.100.0/24");

        let unmasked = AddressWithMask::new("198.51.100.0".parse().unwrap(), None);
        assert_eq!(unmasked.to_string(), "198.51.100.0/");
    }
}
