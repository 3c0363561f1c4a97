use std::net::Ipv4Addr;

use nix::ifaddrs::getifaddrs;

use super::MacAddress;
use crate::error::{Error, Result};

/// Per-interface view of the `getifaddrs` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub name: String,
    pub ipv4_addresses: Vec<Ipv4Addr>,
    pub mac: Option<MacAddress>,
}

/// Enumerate network interfaces in the order the kernel reports them.
///
/// `getifaddrs` yields one entry per (interface, address) pair; entries are
/// merged by interface name, keeping first-seen order.
pub fn list_interfaces() -> Result<Vec<InterfaceInfo>> {
    let mut interfaces: Vec<InterfaceInfo> = Vec::new();

    for entry in getifaddrs().map_err(Error::Interfaces)? {
        let index = match interfaces
            .iter()
            .position(|iface| iface.name == entry.interface_name)
        {
            Some(index) => index,
            None => {
                interfaces.push(InterfaceInfo {
                    name: entry.interface_name.clone(),
                    ..Default::default()
                });
                interfaces.len() - 1
            }
        };
        let iface = &mut interfaces[index];

        let Some(address) = entry.address else {
            continue;
        };

        if let Some(sin) = address.as_sockaddr_in() {
            iface.ipv4_addresses.push(sin.ip());
        } else if let Some(link) = address.as_link_addr() {
            if let Some(bytes) = link.addr() {
                iface.mac = Some(MacAddress::new(bytes));
            }
        }
    }

    Ok(interfaces)
}
