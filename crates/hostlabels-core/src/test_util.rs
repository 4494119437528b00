//! Shared fixtures for `hostlabels-core` unit tests.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::facts::{NetworkInterface, StaticFacts};

pub fn eth0() -> NetworkInterface {
    NetworkInterface::new("eth0")
        .with_mac("02:00:00:00:00:01")
        .with_ipv4(Ipv4Addr::new(10, 0, 0, 1))
        .with_ipv6(Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 1))
}

pub fn eth1() -> NetworkInterface {
    NetworkInterface::new("eth1")
        .with_mac("02:00:00:00:00:02")
        .with_ipv4(Ipv4Addr::new(10, 0, 0, 2))
        .with_ipv6(Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 2))
}

/// `myhost` running Linux 6.1.0 at UTC+2, with `eth0` as the primary
/// interface and `eth1` as the only other one.
pub fn sample_facts() -> StaticFacts {
    StaticFacts::builder()
        .with_os("Linux", "6.1.0")
        .with_hostname("myhost")
        .with_primary_interface(eth0())
        .with_interface(eth1())
        .with_utc_offset_seconds(2 * 3600)
        .build()
}
