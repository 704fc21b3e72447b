//! Core data types for forecast data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`AreaCode`] - Government-assigned forecast area identifier
//! - [`ChildArea`] - A child entry of a region as it appears in the region file
//! - [`Region`] - A named region with its child area codes
//! - [`ForecastRecord`] - One day's forecast for one area, as cached
//! - [`WeatherKind`] - Coarse classification of a weather description

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ForecastError, Result};

/// Placeholder stored when a temperature is absent from the response.
pub const MISSING_VALUE: &str = "-";

/// A forecast area code, used as the path segment of the forecast endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaCode(String);

impl AreaCode {
    /// Creates an area code without validating it.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Creates an area code, rejecting values that cannot be used in a URL path.
    ///
    /// # Errors
    /// Returns [`ForecastError::InvalidParameter`] if the code is empty or
    /// contains anything other than ASCII letters and digits.
    pub fn parse(s: &str) -> Result<Self> {
        let code = Self::new(s.trim());
        if code.is_valid() {
            Ok(code)
        } else {
            Err(ForecastError::InvalidParameter(format!(
                "Invalid area code: {s:?}"
            )))
        }
    }

    /// Returns true if the code is non-empty ASCII alphanumeric.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_alphanumeric())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AreaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AreaCode {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&str> for AreaCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AreaCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A child entry of a region in the region file.
///
/// The file lists children either as bare code strings or as objects
/// carrying a `code` field. Both resolve to an [`AreaCode`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildArea {
    /// A bare area code string.
    Code(String),
    /// An object with a `code` field and optional display name.
    Detailed {
        /// The area code.
        code: String,
        /// Display name, when the file carries one.
        #[serde(default)]
        name: Option<String>,
    },
}

impl ChildArea {
    /// Returns the area code this child refers to.
    #[must_use]
    pub fn code(&self) -> AreaCode {
        match self {
            Self::Code(code) | Self::Detailed { code, .. } => AreaCode::new(code.as_str()),
        }
    }
}

/// A named region and the area codes beneath it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Key of the region in the catalog.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Child area codes in file order.
    pub children: Vec<AreaCode>,
}

impl Region {
    /// Creates a region.
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, children: Vec<AreaCode>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            children,
        }
    }
}

/// One day's forecast for one area.
///
/// Uniquely identified by `(area_code, date)`. `date` holds the full
/// `timeDefines` value the forecast was read from, so it always starts with
/// the calendar day that was requested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Area the forecast belongs to.
    pub area_code: AreaCode,
    /// Forecast timestamp, e.g. `2024-01-01T00:00:00+09:00`.
    pub date: String,
    /// Weather description.
    pub weather: String,
    /// Minimum temperature or [`MISSING_VALUE`].
    pub min_temp: String,
    /// Maximum temperature or [`MISSING_VALUE`].
    pub max_temp: String,
    /// When the record was fetched.
    pub last_updated: DateTime<Utc>,
}

impl ForecastRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(
        area_code: AreaCode,
        date: impl Into<String>,
        weather: impl Into<String>,
        min_temp: impl Into<String>,
        max_temp: impl Into<String>,
    ) -> Self {
        Self {
            area_code,
            date: date.into(),
            weather: weather.into(),
            min_temp: min_temp.into(),
            max_temp: max_temp.into(),
            last_updated: Utc::now(),
        }
    }

    /// Sets the fetch timestamp.
    #[must_use]
    pub const fn with_last_updated(mut self, last_updated: DateTime<Utc>) -> Self {
        self.last_updated = last_updated;
        self
    }

    /// Returns the calendar-day prefix of [`date`](Self::date).
    #[must_use]
    pub fn day(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }

    /// Returns the coarse weather classification.
    #[must_use]
    pub fn kind(&self) -> WeatherKind {
        WeatherKind::classify(&self.weather)
    }
}

/// Coarse classification of a Japanese weather description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherKind {
    /// Contains 晴.
    Sunny,
    /// Contains 雨.
    Rainy,
    /// Contains 曇.
    Cloudy,
    /// Contains 雪.
    Snowy,
    /// None of the above.
    Unknown,
}

impl WeatherKind {
    /// Classifies a description. The first matching character wins, checked
    /// in the order sunny, rainy, cloudy, snowy.
    #[must_use]
    pub fn classify(weather: &str) -> Self {
        if weather.contains('晴') {
            Self::Sunny
        } else if weather.contains('雨') {
            Self::Rainy
        } else if weather.contains('曇') {
            Self::Cloudy
        } else if weather.contains('雪') {
            Self::Snowy
        } else {
            Self::Unknown
        }
    }

    /// Returns a single-character symbol for text output.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Sunny => "☀",
            Self::Rainy => "☂",
            Self::Cloudy => "☁",
            Self::Snowy => "❄",
            Self::Unknown => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_code_parse() {
        assert_eq!(AreaCode::parse("130000").unwrap().as_str(), "130000");
        assert_eq!(AreaCode::parse(" 016000 ").unwrap().as_str(), "016000");
        assert!(AreaCode::parse("").is_err());
        assert!(AreaCode::parse("../etc").is_err());
        assert!(AreaCode::parse("13 00").is_err());
    }

    #[test]
    fn test_child_area_forms() {
        let children: Vec<ChildArea> =
            serde_json::from_str(r#"["010100", {"code": "010200", "name": "x"}]"#).unwrap();
        assert_eq!(children[0].code(), AreaCode::new("010100"));
        assert_eq!(children[1].code(), AreaCode::new("010200"));
    }

    #[test]
    fn test_record_day() {
        let record = ForecastRecord::new(
            AreaCode::new("010100"),
            "2024-01-01T00:00:00+09:00",
            "晴れ",
            "5",
            "15",
        );
        assert_eq!(record.day(), "2024-01-01");
        assert_eq!(record.kind(), WeatherKind::Sunny);
    }

    #[test]
    fn test_weather_kind_order() {
        assert_eq!(WeatherKind::classify("晴れ時々曇り"), WeatherKind::Sunny);
        assert_eq!(WeatherKind::classify("曇り一時雨"), WeatherKind::Rainy);
        assert_eq!(WeatherKind::classify("くもり"), WeatherKind::Unknown);
        assert_eq!(WeatherKind::classify("曇り"), WeatherKind::Cloudy);
        assert_eq!(WeatherKind::classify("雪"), WeatherKind::Snowy);
    }
}
