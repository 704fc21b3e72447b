#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fetch-then-cache access to JMA forecasts.
//!
//! This crate re-exports the core types, store implementations and the JMA
//! provider, and provides [`ForecastCache`], which answers
//! `(area_code, day)` lookups from a [`ForecastStore`] while the stored
//! record is fresh and from a [`ForecastProvider`] otherwise.
//!
//! # Features
//!
//! - `jma` - JMA forecast provider
//! - `store-sqlite` - SQLite-backed record store
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use forecast::{ForecastCache, JmaProvider, RegionCatalog, SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> forecast::Result<()> {
//!     let catalog = RegionCatalog::load("areas.json")?;
//!     let cache = ForecastCache::new(
//!         Arc::new(JmaProvider::new()?),
//!         Arc::new(SqliteStore::new("weather.db")?),
//!     );
//!
//!     let region = catalog.require("010300")?;
//!     for entry in cache.fetch_region(region, forecast::today_in_japan()).await {
//!         println!("{}: {:?}", entry.area_code, entry.result);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use forecast_core::*;

// Store implementations
#[cfg(feature = "store-sqlite")]
pub use forecast_store::SqliteStore;
pub use forecast_store::{InMemoryStore, NoopStore};

// Providers
#[cfg(feature = "jma")]
pub use forecast_jma::{BROWSER_USER_AGENT, DEFAULT_BASE_URL, JmaConfig, JmaProvider, today_in_japan};

mod cache;
pub use cache::{AreaForecast, FRESHNESS_WINDOW, ForecastCache};
