//! Provider trait for fetching raw forecasts.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::Result, response::RawForecastResponse, types::AreaCode};

/// Source of raw forecast documents.
///
/// Implementations issue exactly one request per call and never retry.
/// Transport failures and non-success statuses are reported as
/// [`ForecastError::Fetch`](crate::ForecastError::Fetch); bodies that do not
/// have the expected shape as [`ForecastError::Parse`](crate::ForecastError::Parse).
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "JMA").
    fn name(&self) -> &str;

    /// Fetches the forecast document for one area code.
    async fn fetch(&self, area: &AreaCode) -> Result<RawForecastResponse>;
}
