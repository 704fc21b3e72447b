#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for JMA forecast fetching and caching.
//!
//! This crate provides the foundational abstractions shared by the workspace:
//!
//! - [`RegionCatalog`](catalog::RegionCatalog) - Region hierarchy loaded from `areas.json`
//! - [`RawForecastResponse`](response::RawForecastResponse) - Wire shape of the forecast endpoint
//! - [`extract`](extract::extract) - Pulls one day's forecast for one area out of a response
//! - [`ForecastProvider`](provider::ForecastProvider) - Source of raw forecasts
//! - [`ForecastStore`](store::ForecastStore) - Persistence abstraction for records
//! - [`Clock`](clock::Clock) - Time source used for freshness checks

/// Region hierarchy loading.
pub mod catalog;
/// Time source abstraction.
pub mod clock;
/// Error types for forecast operations.
pub mod error;
/// Extraction of forecast records from raw responses.
pub mod extract;
/// Provider trait for fetching raw forecasts.
pub mod provider;
/// Deserializable shape of the remote forecast document.
pub mod response;
/// Store trait for persisting forecast records.
pub mod store;
/// Core data types (AreaCode, Region, ForecastRecord, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use catalog::RegionCatalog;
pub use clock::{Clock, SystemClock};
pub use error::{ForecastError, Result};
pub use extract::{extract, extract_all};
pub use provider::ForecastProvider;
pub use response::RawForecastResponse;
pub use store::ForecastStore;
pub use types::{AreaCode, ChildArea, ForecastRecord, MISSING_VALUE, Region, WeatherKind};
