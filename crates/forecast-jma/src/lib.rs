#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Japan Meteorological Agency forecast provider.
//!
//! This crate provides [`JmaProvider`], an implementation of the
//! [`ForecastProvider`] trait from `forecast-core`.
//!
//! # Example
//!
//! ```no_run
//! use forecast_core::{AreaCode, ForecastProvider};
//! use forecast_jma::JmaProvider;
//!
//! # async fn example() -> forecast_core::Result<()> {
//! let provider = JmaProvider::new()?;
//! let raw = provider.fetch(&AreaCode::parse("130000")?).await?;
//! println!("Fetched {} reports", raw.reports().len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use forecast_core::{AreaCode, ForecastError, ForecastProvider, RawForecastResponse, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// JMA forecast endpoint base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.jma.go.jp/bosai/forecast/data/forecast";

/// Browser-like user agent some deployments send with every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// JST is UTC+9 with no daylight saving.
const JST_OFFSET_HOURS: i64 = 9;

/// Returns the current calendar day in Japan, which is the day the forecast
/// documents are written against.
#[must_use]
pub fn today_in_japan() -> NaiveDate {
    (Utc::now() + chrono::Duration::hours(JST_OFFSET_HOURS)).date_naive()
}

/// Settings for [`JmaProvider`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JmaConfig {
    /// Base URL; the request goes to `{base_url}/{area}.json`.
    pub base_url: String,
    /// `User-Agent` header value. `None` sends the HTTP client's default.
    pub user_agent: Option<String>,
    /// Whole-request timeout in seconds; must be non-zero.
    pub timeout_secs: u64,
    /// Minimum spacing between requests in milliseconds; 0 disables it.
    pub min_request_interval_ms: u64,
}

impl Default for JmaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_request_interval_ms: 0,
        }
    }
}

/// Spaces out consecutive requests.
#[derive(Debug)]
struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    const fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {}ms", wait_time.as_millis());
                sleep(wait_time).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// JMA forecast provider.
///
/// Implements [`ForecastProvider`]: one GET per call, no retries.
#[derive(Debug)]
pub struct JmaProvider {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: Option<Arc<Mutex<RateLimiter>>>,
}

impl JmaProvider {
    /// Create a provider with default settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::from_config(JmaConfig::default())
    }

    /// Create a provider from explicit settings.
    ///
    /// # Errors
    /// Returns [`ForecastError::InvalidParameter`] if the timeout is zero or
    /// the HTTP client cannot be built (for example an unusable user agent
    /// string).
    pub fn from_config(config: JmaConfig) -> Result<Self> {
        if config.timeout_secs == 0 {
            return Err(ForecastError::InvalidParameter(
                "Request timeout must be at least one second".to_string(),
            ));
        }

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|e| ForecastError::InvalidParameter(format!("HTTP client: {e}")))?;

        Ok(Self::with_client(client, &config))
    }

    /// Create a provider around a pre-configured HTTP client.
    ///
    /// The client's own timeout and user agent are used; only the base URL
    /// and request spacing are taken from `config`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &JmaConfig) -> Self {
        let rate_limiter = (config.min_request_interval_ms > 0).then(|| {
            Arc::new(Mutex::new(RateLimiter::new(Duration::from_millis(
                config.min_request_interval_ms,
            ))))
        });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limiter,
        }
    }

    /// Build the forecast URL for an area.
    fn forecast_url(&self, area: &AreaCode) -> String {
        format!("{}/{}.json", self.base_url, area.as_str())
    }
}

#[async_trait]
impl ForecastProvider for JmaProvider {
    fn name(&self) -> &str {
        "JMA"
    }

    async fn fetch(&self, area: &AreaCode) -> Result<RawForecastResponse> {
        if !area.is_valid() {
            return Err(ForecastError::InvalidParameter(format!(
                "Invalid area code: {:?}",
                area.as_str()
            )));
        }

        if let Some(rate_limiter) = &self.rate_limiter {
            rate_limiter.lock().await.wait().await;
        }

        let url = self.forecast_url(area);
        debug!("Fetching forecast: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ForecastError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Fetch(format!("HTTP {} for {}", status, area)));
        }

        response.json::<RawForecastResponse>().await.map_err(|e| {
            if e.is_decode() {
                ForecastError::Parse(format!("Unexpected forecast document for {}: {}", area, e))
            } else {
                ForecastError::Fetch(e.to_string())
            }
        })
    }
}
