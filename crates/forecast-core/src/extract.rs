//! Extraction of [`ForecastRecord`]s from a [`RawForecastResponse`].
//!
//! Weather descriptions come from the first series of the first report and
//! temperatures from the second series, both located by area code. A
//! temperature that is missing, out of range or empty becomes
//! [`MISSING_VALUE`]; a missing weather description is an error.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{ForecastError, Result};
use crate::response::{RawForecastResponse, TimeSeries};
use crate::types::{AreaCode, ForecastRecord, MISSING_VALUE};

/// Extract the forecast for `area` on `date`.
///
/// The first `timeDefines` entry that starts with `date` (formatted
/// `YYYY-MM-DD`) selects the index read from every parallel array.
///
/// # Errors
/// Returns [`ForecastError::Parse`] if the response has no series, no entry
/// for the date, no entry for the area, or no weather at that index.
pub fn extract(raw: &RawForecastResponse, area: &AreaCode, date: NaiveDate) -> Result<ForecastRecord> {
    let (weather_series, temp_series) = series_pair(raw)?;
    let day = date.to_string();

    let index = weather_series
        .time_defines
        .iter()
        .position(|time| time.starts_with(&day))
        .ok_or_else(|| ForecastError::Parse(format!("No forecast for {day} in response")))?;

    record_at(weather_series, temp_series, area, index)
}

/// Extract one record per `timeDefines` entry of the first series.
///
/// # Errors
/// Same conditions as [`extract`], applied to every index.
pub fn extract_all(raw: &RawForecastResponse, area: &AreaCode) -> Result<Vec<ForecastRecord>> {
    let (weather_series, temp_series) = series_pair(raw)?;

    (0..weather_series.time_defines.len())
        .map(|index| record_at(weather_series, temp_series, area, index))
        .collect()
}

fn series_pair(raw: &RawForecastResponse) -> Result<(&TimeSeries, &TimeSeries)> {
    let report = raw
        .reports()
        .first()
        .ok_or_else(|| ForecastError::Parse("Response contains no reports".to_string()))?;

    let weather_series = report
        .time_series
        .first()
        .ok_or_else(|| ForecastError::Parse("Report contains no time series".to_string()))?;
    let temp_series = report.time_series.get(1).ok_or_else(|| {
        ForecastError::Parse("Report is missing the temperature series".to_string())
    })?;

    Ok((weather_series, temp_series))
}

fn record_at(
    weather_series: &TimeSeries,
    temp_series: &TimeSeries,
    area: &AreaCode,
    index: usize,
) -> Result<ForecastRecord> {
    let date = weather_series
        .time_defines
        .get(index)
        .ok_or_else(|| ForecastError::Parse(format!("No time define at index {index}")))?;

    let weather = weather_series
        .area(area)
        .ok_or_else(|| ForecastError::Parse(format!("Area {area} not found in response")))?
        .weathers
        .as_ref()
        .and_then(|weathers| weathers.get(index))
        .ok_or_else(|| {
            ForecastError::Parse(format!("No weather for area {area} at index {index}"))
        })?;

    let temps = temp_series.area(area);
    let min_temp = temperature(temps.and_then(|t| t.temps_min.as_deref()), index);
    let max_temp = temperature(temps.and_then(|t| t.temps_max.as_deref()), index);

    Ok(ForecastRecord::new(
        area.clone(),
        date.as_str(),
        weather.as_str(),
        min_temp,
        max_temp,
    ))
}

/// Read a temperature, treating absent and falsy values as missing.
fn temperature(values: Option<&[Value]>, index: usize) -> String {
    match values.and_then(|values| values.get(index)) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => MISSING_VALUE.to_string(),
    }
}
