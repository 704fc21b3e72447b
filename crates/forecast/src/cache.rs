//! Fetch-then-cache lookups over a provider and a record store.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use futures::{StreamExt, stream};
use tracing::{debug, warn};

use forecast_core::{
    AreaCode, Clock, ForecastProvider, ForecastRecord, ForecastStore, Region, Result, SystemClock,
    extract, extract_all,
};

const FRESHNESS_SECS: u64 = 3600;

/// How long a stored record is served without re-fetching.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(FRESHNESS_SECS);

/// Default number of area fetches in flight for one region.
const DEFAULT_CONCURRENCY: usize = 4;

/// Outcome for one child area of a region.
#[derive(Debug)]
pub struct AreaForecast {
    /// The child area.
    pub area_code: AreaCode,
    /// Its forecast, or the error that replaced it.
    pub result: Result<ForecastRecord>,
}

/// Serves forecast records from a store while they are fresh and from the
/// provider otherwise.
///
/// A lookup for `(area, day)` returns the stored record unchanged if it was
/// updated less than [`FRESHNESS_WINDOW`] ago. Otherwise the provider is
/// called once, the record for that day is extracted, stamped with the
/// current time and upserted, and the new record is returned.
///
/// Store failures never fail a lookup: a failed read counts as a miss and a
/// failed write is logged.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use forecast::{AreaCode, ForecastCache, JmaProvider, SqliteStore};
///
/// let cache = ForecastCache::new(
///     Arc::new(JmaProvider::new()?),
///     Arc::new(SqliteStore::new("weather.db")?),
/// );
/// let record = cache.get_or_fetch(&AreaCode::parse("130000")?, forecast::today_in_japan()).await?;
/// ```
pub struct ForecastCache {
    provider: Arc<dyn ForecastProvider>,
    store: Arc<dyn ForecastStore>,
    clock: Arc<dyn Clock>,
    concurrency: usize,
}

impl std::fmt::Debug for ForecastCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastCache")
            .field("provider", &self.provider.name())
            .field("store", &"configured")
            .field("clock", &self.clock)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl ForecastCache {
    /// Create a cache over a provider and a store, using the system clock.
    #[must_use]
    pub fn new(provider: Arc<dyn ForecastProvider>, store: Arc<dyn ForecastStore>) -> Self {
        Self {
            provider,
            store,
            clock: Arc::new(SystemClock),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Replace the clock used for freshness checks and timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set how many area fetches [`fetch_region`](Self::fetch_region) keeps in flight.
    ///
    /// Values below one are treated as one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns the underlying record store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ForecastStore> {
        &self.store
    }

    /// Return the forecast for `area` on `day`, fetching only when the stored
    /// record is missing or stale.
    ///
    /// # Errors
    /// Returns [`ForecastError::Fetch`](forecast_core::ForecastError::Fetch)
    /// if the provider fails and
    /// [`ForecastError::Parse`](forecast_core::ForecastError::Parse) if the
    /// response has no entry for the area and day.
    pub async fn get_or_fetch(&self, area: &AreaCode, day: NaiveDate) -> Result<ForecastRecord> {
        let now = self.clock.now();

        match self.store.get(area, day).await {
            Ok(Some(record)) if is_fresh(&record, now) => {
                debug!(area = %area, day = %day, "Cache hit for forecast");
                return Ok(record);
            }
            Ok(Some(_)) => debug!(area = %area, day = %day, "Stored forecast is stale"),
            Ok(None) => debug!(area = %area, day = %day, "Cache miss for forecast"),
            Err(e) => warn!(area = %area, error = %e, "Failed to read stored forecast"),
        }

        debug!(provider = self.provider.name(), area = %area, "Fetching forecast");
        let raw = self.provider.fetch(area).await?;
        let record = extract(&raw, area, day)?.with_last_updated(now);

        if let Err(e) = self.store.put(&record).await {
            warn!(area = %area, error = %e, "Failed to store forecast");
        }

        Ok(record)
    }

    /// Look up every child area of a region for `day`.
    ///
    /// Duplicate child codes are looked up once. Lookups run concurrently up
    /// to the configured limit and results come back in child order; one
    /// child's failure does not affect the others.
    pub async fn fetch_region(&self, region: &Region, day: NaiveDate) -> Vec<AreaForecast> {
        let mut seen = HashSet::new();
        let areas: Vec<AreaCode> = region
            .children
            .iter()
            .filter(|area| seen.insert(*area))
            .cloned()
            .collect();

        debug!(region = %region.key, areas = areas.len(), "Fetching region forecasts");

        stream::iter(areas)
            .map(|area| async move {
                let result = self.get_or_fetch(&area, day).await;
                if let Err(e) = &result {
                    warn!(area = %area, error = %e, "Forecast unavailable");
                }
                AreaForecast {
                    area_code: area,
                    result,
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Fetch every day the provider currently forecasts for `area`.
    ///
    /// Bypasses the store entirely.
    ///
    /// # Errors
    /// Same conditions as [`get_or_fetch`](Self::get_or_fetch).
    pub async fn outlook(&self, area: &AreaCode) -> Result<Vec<ForecastRecord>> {
        let now = self.clock.now();
        let raw = self.provider.fetch(area).await?;
        Ok(extract_all(&raw, area)?
            .into_iter()
            .map(|record| record.with_last_updated(now))
            .collect())
    }
}

fn is_fresh(record: &ForecastRecord, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(record.last_updated) < TimeDelta::seconds(FRESHNESS_SECS as i64)
}
