//! SQLite-based store implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use forecast_core::{AreaCode, ForecastError, ForecastRecord, ForecastStore, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument};

/// SQLite-based store for forecast records.
///
/// Records live in a single `weather` table keyed by `(area_code, date)`.
/// The connection sits behind a mutex that each operation holds only for its
/// own statements, so concurrent callers are serialized into single writes.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| ForecastError::Cache(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite store.
    ///
    /// Data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| ForecastError::Cache(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS weather (
                area_code TEXT NOT NULL,
                date TEXT NOT NULL,
                weather TEXT,
                min_temp TEXT,
                max_temp TEXT,
                last_updated TIMESTAMP NOT NULL,
                PRIMARY KEY (area_code, date)
            )",
            [],
        )
        .map_err(|e| ForecastError::Cache(e.to_string()))?;

        debug!("SQLite store schema initialized");
        Ok(())
    }
}

/// Columns of a `weather` row before the timestamp is parsed.
type WeatherRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
);

fn read_row(row: &Row<'_>) -> rusqlite::Result<WeatherRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn into_record(row: WeatherRow) -> Result<ForecastRecord> {
    let (area_code, date, weather, min_temp, max_temp, last_updated) = row;
    let last_updated = DateTime::parse_from_rfc3339(&last_updated)
        .map_err(|e| ForecastError::Cache(format!("Invalid last_updated {last_updated:?}: {e}")))?
        .with_timezone(&Utc);

    Ok(ForecastRecord {
        area_code: AreaCode::new(area_code),
        date,
        weather: weather.unwrap_or_default(),
        min_temp: min_temp.unwrap_or_default(),
        max_temp: max_temp.unwrap_or_default(),
        last_updated,
    })
}

/// Format a timestamp so that text order matches time order.
fn timestamp_to_str(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl ForecastStore for SqliteStore {
    #[instrument(skip(self), fields(area = %area, day = %day))]
    async fn get(&self, area: &AreaCode, day: NaiveDate) -> Result<Option<ForecastRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        let row = conn
            .query_row(
                "SELECT area_code, date, weather, min_temp, max_temp, last_updated
                 FROM weather
                 WHERE area_code = ?1 AND substr(date, 1, 10) = ?2
                 ORDER BY last_updated DESC
                 LIMIT 1",
                params![area.as_str(), day.to_string()],
                read_row,
            )
            .optional()
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        match row {
            Some(row) => {
                debug!("Found stored forecast");
                into_record(row).map(Some)
            }
            None => {
                debug!("No stored forecast found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, record), fields(area = %record.area_code, date = %record.date))]
    async fn put(&self, record: &ForecastRecord) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO weather
             (area_code, date, weather, min_temp, max_temp, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.area_code.as_str(),
                record.date,
                record.weather,
                record.min_temp,
                record.max_temp,
                timestamp_to_str(record.last_updated)
            ],
        )
        .map_err(|e| ForecastError::Cache(e.to_string()))?;

        debug!("Stored forecast");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<ForecastRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT area_code, date, weather, min_temp, max_temp, last_updated
                 FROM weather
                 ORDER BY area_code ASC, date ASC",
            )
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        let rows = stmt
            .query_map([], read_row)
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let row = row.map_err(|e| ForecastError::Cache(e.to_string()))?;
            records.push(into_record(row)?);
        }

        debug!("Listed {} stored forecasts", records.len());
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, max_age: Duration) -> Result<usize> {
        // An age reaching past the representable range cannot match any row
        let Some(cutoff) = chrono::TimeDelta::from_std(max_age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            debug!("Max age exceeds the timestamp range, nothing to invalidate");
            return Ok(0);
        };

        let conn = self
            .conn
            .lock()
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        let deleted = conn
            .execute(
                "DELETE FROM weather WHERE last_updated < ?1",
                params![timestamp_to_str(cutoff)],
            )
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        if deleted > 0 {
            debug!("Invalidated {} stale forecasts", deleted);
        }

        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        conn.execute("DELETE FROM weather", [])
            .map_err(|e| ForecastError::Cache(e.to_string()))?;

        debug!("Cleared all stored forecasts");
        Ok(())
    }
}
