//! Plain-text cards for the terminal.

use chrono::NaiveDate;
use forecast::{AreaCode, ForecastError, ForecastRecord, Region};

/// One line per region: key, name and number of areas.
pub(crate) fn region_line(region: &Region) -> String {
    format!(
        "{:<8} {} ({} areas)",
        region.key,
        region.name,
        region.children.len()
    )
}

pub(crate) fn region_header(region: &Region, day: NaiveDate) -> String {
    format!("== {} ({}) {} ==", region.name, region.key, day)
}

/// A forecast card: date, weather symbol and text, then min / max.
pub(crate) fn forecast_card(record: &ForecastRecord) -> String {
    format!(
        "[{}] {}\n  {} {}\n  最低 {}°C / 最高 {}°C",
        record.area_code,
        record.date,
        record.kind().symbol(),
        record.weather,
        record.min_temp,
        record.max_temp,
    )
}

pub(crate) fn error_card(area: &AreaCode, err: &ForecastError) -> String {
    format!("[{area}] エラー: {err}")
}

/// A compact row for cache listings.
pub(crate) fn record_row(record: &ForecastRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        record.area_code,
        record.date,
        record.weather,
        record.min_temp,
        record.max_temp,
        record.last_updated.to_rfc3339(),
    )
}
