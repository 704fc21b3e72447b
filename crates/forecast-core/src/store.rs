//! Store trait for persisting forecast records.
//!
//! This module defines the [`ForecastStore`] trait that provides a unified
//! interface over the record backends (SQLite, in-memory, no-op).

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

use crate::{
    error::Result,
    types::{AreaCode, ForecastRecord},
};

/// Trait for persisting forecast records keyed by `(area_code, date)`.
///
/// Writes are upserts: storing a record whose key already exists replaces
/// the previous row.
#[async_trait]
pub trait ForecastStore: Send + Sync {
    /// Retrieves the most recently updated record for an area whose date
    /// falls on the given calendar day.
    ///
    /// Returns `Ok(Some(record))` if one is stored, `Ok(None)` otherwise.
    async fn get(&self, area: &AreaCode, day: NaiveDate) -> Result<Option<ForecastRecord>>;

    /// Stores a record, replacing any existing record with the same key.
    async fn put(&self, record: &ForecastRecord) -> Result<()>;

    /// Returns every stored record ordered by area code then date.
    async fn list(&self) -> Result<Vec<ForecastRecord>>;

    /// Removes records last updated longer ago than `max_age`.
    ///
    /// Returns the number of records removed.
    async fn invalidate_stale(&self, max_age: Duration) -> Result<usize>;

    /// Removes all records.
    async fn clear(&self) -> Result<()>;
}
