//! In-memory store implementation.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use forecast_core::{AreaCode, ForecastRecord, ForecastStore, Result};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Key for stored records.
type RecordKey = (AreaCode, String);

/// Simple in-memory store.
///
/// Records are kept in a `RwLock`-protected map and are lost when the store
/// is dropped. Records are cloned on get/put operations.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<BTreeMap<RecordKey, ForecastRecord>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ForecastStore for InMemoryStore {
    #[instrument(skip(self), fields(area = %area, day = %day))]
    async fn get(&self, area: &AreaCode, day: NaiveDate) -> Result<Option<ForecastRecord>> {
        let day = day.to_string();
        let records = self.records.read().await;

        let found = records
            .values()
            .filter(|record| record.area_code == *area && record.day() == day)
            .max_by_key(|record| record.last_updated)
            .cloned();

        if found.is_some() {
            debug!("Found stored forecast");
        } else {
            debug!("No stored forecast found");
        }
        Ok(found)
    }

    #[instrument(skip(self, record), fields(area = %record.area_code, date = %record.date))]
    async fn put(&self, record: &ForecastRecord) -> Result<()> {
        let key = (record.area_code.clone(), record.date.clone());
        self.records.write().await.insert(key, record.clone());
        debug!("Stored forecast");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ForecastRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, max_age: Duration) -> Result<usize> {
        let max_age = chrono::TimeDelta::from_std(max_age).unwrap_or(chrono::TimeDelta::MAX);
        let now = Utc::now();

        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| now.signed_duration_since(record.last_updated) <= max_age);
        let removed = before - records.len();

        if removed > 0 {
            debug!("Invalidated {} stale forecasts", removed);
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.records.write().await.clear();
        debug!("Cleared all stored forecasts");
        Ok(())
    }
}
