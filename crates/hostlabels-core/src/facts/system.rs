//! Live host facts gathered through `sysinfo` and `chrono`.

use std::net::IpAddr;

use chrono::Local;
use sysinfo::{Networks, System};

use crate::error::CoreError;

use super::types::{NetworkFacts, NetworkInterface, OsInfo};
use super::FactProvider;

/// Queries the running system on every call; nothing is cached between
/// calls so long-lived callers always see current addresses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFacts;

impl SystemFacts {
    pub fn new() -> Self {
        Self
    }
}

impl FactProvider for SystemFacts {
    fn os_info(&self) -> Result<OsInfo, CoreError> {
        let missing = |what: &str| CoreError::Facts(format!("{what} unavailable"));
        Ok(OsInfo {
            name: System::name().ok_or_else(|| missing("OS name"))?,
            version: System::os_version().ok_or_else(|| missing("OS version"))?,
            hostname: System::host_name().ok_or_else(|| missing("hostname"))?,
        })
    }

    fn network(&self) -> Result<NetworkFacts, CoreError> {
        let networks = Networks::new_with_refreshed_list();

        let mut interfaces: Vec<NetworkInterface> = networks
            .iter()
            .map(|(name, data)| {
                let mac = data.mac_address();
                let mut iface = NetworkInterface::new(name.as_str());
                if !mac.is_unspecified() {
                    iface.mac = Some(mac.to_string());
                }
                for net in data.ip_networks() {
                    match net.addr {
                        IpAddr::V4(addr) => iface.ipv4.push(addr),
                        IpAddr::V6(addr) => iface.ipv6.push(addr),
                    }
                }
                iface
            })
            .collect();
        // sysinfo keys interfaces by name in a hash map; sort for a stable order.
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));

        let primary = default_route_interface()
            .and_then(|name| interfaces.iter().position(|i| i.name == name))
            .or_else(|| interfaces.iter().position(is_candidate_primary));

        tracing::debug!(
            interfaces = interfaces.len(),
            primary = ?primary.map(|idx| interfaces[idx].name.as_str()),
            "gathered network interfaces"
        );
        Ok(NetworkFacts {
            interfaces,
            primary,
        })
    }

    fn utc_offset_seconds(&self) -> Result<i32, CoreError> {
        Ok(Local::now().offset().local_minus_utc())
    }
}

/// Fallback primary: the first interface that is not loopback and carries
/// at least one address.
fn is_candidate_primary(iface: &NetworkInterface) -> bool {
    let loopback = iface.name == "lo"
        || (iface.ipv4.iter().all(|a| a.is_loopback()) && iface.ipv6.iter().all(|a| a.is_loopback()));
    !loopback && (!iface.ipv4.is_empty() || !iface.ipv6.is_empty())
}

#[cfg(target_os = "linux")]
fn default_route_interface() -> Option<String> {
    match std::fs::read_to_string("/proc/net/route") {
        Ok(table) => parse_default_route(&table),
        Err(err) => {
            tracing::debug!(error = %err, "cannot read routing table");
            None
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn default_route_interface() -> Option<String> {
    None
}

/// Pick the interface of the lowest-metric default route (destination and
/// mask both zero) from `/proc/net/route` content.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_default_route(table: &str) -> Option<String> {
    table
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            // Iface Destination Gateway Flags RefCnt Use Metric Mask ...
            if cols.len() < 8 || cols[1] != "00000000" || cols[7] != "00000000" {
                return None;
            }
            let metric: u32 = cols[6].parse().ok()?;
            Some((metric, cols[0]))
        })
        .min_by_key(|(metric, _)| *metric)
        .map(|(_, name)| name.to_string())
}
