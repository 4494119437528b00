use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

use super::types::{NetworkFacts, NetworkInterface, OsInfo};
use super::FactProvider;

/// A fact provider that answers from fixed data. Built via the builder
/// pattern, loaded from a JSON fixture, or captured from another provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticFacts {
    pub os: OsInfo,
    #[serde(default)]
    pub network: NetworkFacts,
    #[serde(default)]
    pub utc_offset_seconds: i32,
}

impl StaticFacts {
    pub fn builder() -> StaticFactsBuilder {
        StaticFactsBuilder {
            os: OsInfo {
                name: "Linux".into(),
                version: "6.1.0".into(),
                hostname: "localhost".into(),
            },
            network: NetworkFacts::default(),
            utc_offset_seconds: 0,
        }
    }

    pub fn from_json(content: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Take a one-off snapshot of everything `provider` reports.
    pub fn capture(provider: &dyn FactProvider) -> Result<Self, CoreError> {
        Ok(Self {
            os: provider.os_info()?,
            network: provider.network()?,
            utc_offset_seconds: provider.utc_offset_seconds()?,
        })
    }
}

pub struct StaticFactsBuilder {
    os: OsInfo,
    network: NetworkFacts,
    utc_offset_seconds: i32,
}

impl StaticFactsBuilder {
    pub fn with_os(mut self, name: &str, version: &str) -> Self {
        self.os.name = name.into();
        self.os.version = version.into();
        self
    }

    pub fn with_hostname(mut self, hostname: &str) -> Self {
        self.os.hostname = hostname.into();
        self
    }

    pub fn with_interface(mut self, iface: NetworkInterface) -> Self {
        self.network.interfaces.push(iface);
        self
    }

    /// Add an interface and mark it as the primary one.
    pub fn with_primary_interface(mut self, iface: NetworkInterface) -> Self {
        self.network.primary = Some(self.network.interfaces.len());
        self.network.interfaces.push(iface);
        self
    }

    pub fn with_utc_offset_seconds(mut self, offset: i32) -> Self {
        self.utc_offset_seconds = offset;
        self
    }

    pub fn build(self) -> StaticFacts {
        StaticFacts {
            os: self.os,
            network: self.network,
            utc_offset_seconds: self.utc_offset_seconds,
        }
    }
}

impl FactProvider for StaticFacts {
    fn os_info(&self) -> Result<OsInfo, CoreError> {
        Ok(self.os.clone())
    }

    fn network(&self) -> Result<NetworkFacts, CoreError> {
        Ok(self.network.clone())
    }

    fn utc_offset_seconds(&self) -> Result<i32, CoreError> {
        Ok(self.utc_offset_seconds)
    }
}
