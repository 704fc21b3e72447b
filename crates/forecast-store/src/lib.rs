#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Record stores for cached forecasts.
//!
//! This crate provides implementations of the [`ForecastStore`] trait from `forecast-core`:
//!
//! - [`SqliteStore`] - Persistent SQLite-based store (default, requires `sqlite` feature)
//! - [`InMemoryStore`] - Simple in-memory store
//! - [`NoopStore`] - Store that doesn't keep anything

/// In-memory store implementation.
pub mod memory;
/// No-op store implementation.
pub mod noop;

/// SQLite-based store implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use forecast_core::ForecastStore;

pub use memory::InMemoryStore;
pub use noop::NoopStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
