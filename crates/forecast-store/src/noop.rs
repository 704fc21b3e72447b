//! No-op store implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use forecast_core::{AreaCode, ForecastRecord, ForecastStore, Result};
use std::time::Duration;
use tracing::trace;

/// A store that doesn't keep anything.
///
/// `get` always returns `Ok(None)` and every write succeeds without effect,
/// so each lookup goes to the provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl NoopStore {
    /// Create a new no-op store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ForecastStore for NoopStore {
    async fn get(&self, _area: &AreaCode, _day: NaiveDate) -> Result<Option<ForecastRecord>> {
        trace!("NoopStore: get called, returning None");
        Ok(None)
    }

    async fn put(&self, _record: &ForecastRecord) -> Result<()> {
        trace!("NoopStore: put called, doing nothing");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ForecastRecord>> {
        Ok(Vec::new())
    }

    async fn invalidate_stale(&self, _max_age: Duration) -> Result<usize> {
        trace!("NoopStore: invalidate_stale called, returning 0");
        Ok(0)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}
