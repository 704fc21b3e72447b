//! Deserializable shape of the JMA forecast document.
//!
//! The endpoint returns an array of reports. Each report holds a list of
//! time series; each series pairs a `timeDefines` list with per-area value
//! arrays indexed the same way. Nothing guarantees the arrays line up, so
//! every field is optional here and the extractor bounds-checks indices.

use serde::{Deserialize, Serialize};

use crate::types::AreaCode;

/// The full response body: an ordered list of reports.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawForecastResponse(pub Vec<ForecastReport>);

impl RawForecastResponse {
    /// Returns the reports in order.
    #[must_use]
    pub fn reports(&self) -> &[ForecastReport] {
        &self.0
    }
}

/// One report (short-term or weekly).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    /// Issuing office name.
    #[serde(default)]
    pub publishing_office: Option<String>,
    /// Issue timestamp.
    #[serde(default)]
    pub report_datetime: Option<String>,
    /// Time series in report order.
    #[serde(default)]
    pub time_series: Vec<TimeSeries>,
}

/// A list of timestamps and the per-area values aligned with them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    /// Forecast timestamps.
    #[serde(default)]
    pub time_defines: Vec<String>,
    /// Per-area value arrays.
    #[serde(default)]
    pub areas: Vec<AreaSeries>,
}

impl TimeSeries {
    /// Returns the entry for the given area code.
    #[must_use]
    pub fn area(&self, code: &AreaCode) -> Option<&AreaSeries> {
        self.areas
            .iter()
            .find(|entry| entry.area.code == code.as_str())
    }
}

/// Identifies the area an [`AreaSeries`] belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRef {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Area code.
    #[serde(default)]
    pub code: String,
}

/// Value arrays for a single area.
///
/// Temperatures are kept as raw JSON values because the service sends
/// strings, empty strings and occasionally nulls in the same array.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSeries {
    /// Area this entry describes.
    #[serde(default)]
    pub area: AreaRef,
    /// Weather descriptions.
    #[serde(default)]
    pub weathers: Option<Vec<String>>,
    /// Daily minimum temperatures.
    #[serde(default)]
    pub temps_min: Option<Vec<serde_json::Value>>,
    /// Daily maximum temperatures.
    #[serde(default)]
    pub temps_max: Option<Vec<serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_unknown_fields() {
        let json = r#"[{
            "publishingOffice": "気象庁",
            "reportDatetime": "2024-01-01T05:00:00+09:00",
            "timeSeries": [{
                "timeDefines": ["2024-01-01T00:00:00+09:00"],
                "areas": [{
                    "area": {"name": "石狩地方", "code": "016010"},
                    "weatherCodes": ["100"],
                    "weathers": ["晴れ"],
                    "winds": ["北の風"]
                }]
            }]
        }]"#;

        let response: RawForecastResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.reports().len(), 1);
        let series = &response.reports()[0].time_series[0];
        let area = series.area(&AreaCode::new("016010")).unwrap();
        assert_eq!(area.weathers.as_deref(), Some(&["晴れ".to_string()][..]));
        assert!(area.temps_min.is_none());
    }

    #[test]
    fn test_non_array_body_is_rejected() {
        assert!(serde_json::from_str::<RawForecastResponse>(r#"{"error": "x"}"#).is_err());
    }
}
