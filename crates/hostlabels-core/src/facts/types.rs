//! Host fact types shared by every [`FactProvider`](super::FactProvider).

use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub version: String,
    pub hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default)]
    pub ipv4: Vec<Ipv4Addr>,
    #[serde(default)]
    pub ipv6: Vec<Ipv6Addr>,
}

impl NetworkInterface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = Some(mac.into());
        self
    }

    pub fn with_ipv4(mut self, addr: Ipv4Addr) -> Self {
        self.ipv4.push(addr);
        self
    }

    pub fn with_ipv6(mut self, addr: Ipv6Addr) -> Self {
        self.ipv6.push(addr);
        self
    }
}

/// Ordered interface list. `primary` indexes into `interfaces`; an index
/// that is absent or out of range means the host has no primary interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkFacts {
    pub interfaces: Vec<NetworkInterface>,
    #[serde(default)]
    pub primary: Option<usize>,
}

impl NetworkFacts {
    pub fn primary_interface(&self) -> Option<&NetworkInterface> {
        self.primary.and_then(|idx| self.interfaces.get(idx))
    }

    /// Every interface except the primary one, in provider order.
    pub fn others(&self) -> impl Iterator<Item = &NetworkInterface> {
        let primary = self.primary;
        self.interfaces
            .iter()
            .enumerate()
            .filter(move |(idx, _)| Some(*idx) != primary)
            .map(|(_, iface)| iface)
    }
}
