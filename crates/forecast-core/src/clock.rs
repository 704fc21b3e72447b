//! Time source used for freshness decisions.

use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Supplies the current instant.
///
/// The cache compares stored `last_updated` stamps against this clock, so
/// tests can substitute a controllable implementation.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
