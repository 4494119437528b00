//! System fact abstraction layer.
//!
//! Defines the [`FactProvider`] trait consumed by the expansion engine and
//! provides a live implementation ([`SystemFacts`]) plus a fixed, serialisable
//! one ([`StaticFacts`]) for fixtures and tests.

mod fixed;
mod system;
pub mod types;

pub use fixed::{StaticFacts, StaticFactsBuilder};
pub use system::SystemFacts;
pub use types::{NetworkFacts, NetworkInterface, OsInfo};

use crate::error::CoreError;

/// Source of the host facts that label placeholders expand to.
///
/// Every method is a synchronous query; implementations decide whether to
/// cache. Errors are reported per category so one missing fact does not
/// hide the others.
pub trait FactProvider: Send + Sync {
    /// OS name, version and hostname.
    fn os_info(&self) -> Result<OsInfo, CoreError>;

    /// Network interfaces in provider order, with the primary one marked.
    fn network(&self) -> Result<NetworkFacts, CoreError>;

    /// Offset of local time from UTC, in seconds east of UTC.
    fn utc_offset_seconds(&self) -> Result<i32, CoreError>;
}
