//! Hardware address lookup
//!
//! Picks the MAC of the first interface carrying a non-loopback IPv4 address.
//! The manager appends it to file names so hosts sharing a work path do not
//! collide.

mod interface;

pub use interface::{list_interfaces, InterfaceInfo};

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::Result;

/// A six-byte link-layer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

/// Lowercase hex, no separators (`0242ac110002`).
impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// First interface with an IPv4 address other than `127.0.0.1` and a
/// non-zero hardware address.
pub fn first_hardware_address(interfaces: &[InterfaceInfo]) -> Option<MacAddress> {
    interfaces
        .iter()
        .filter(|iface| {
            iface
                .ipv4_addresses
                .iter()
                .any(|addr| *addr != Ipv4Addr::LOCALHOST)
        })
        .filter_map(|iface| iface.mac)
        .find(|mac| !mac.is_zero())
}

/// `"_<mac>"` for the first qualifying interface, or an empty string.
pub fn mac_suffix() -> Result<String> {
    let interfaces = list_interfaces()?;
    Ok(first_hardware_address(&interfaces)
        .map(|mac| format!("_{mac}"))
        .unwrap_or_default())
}
