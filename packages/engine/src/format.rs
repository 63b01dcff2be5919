//! Display formatting for KPI and list rendering.
//!
//! Absent values always render as an em-dash placeholder; a present 0 is
//! a real figure and renders as "0.0" / "0%" / "0".

use chrono::NaiveDate;

/// Placeholder for absent values.
pub const PLACEHOLDER: &str = "—";

/// ISO date layout used throughout the dataset.
const ISO_DATE: &str = "%Y-%m-%d";

/// Rating to one decimal, placeholder when absent.
#[must_use]
pub fn format_rating(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.1}"))
}

/// Distance in metres below 1 km, otherwise kilometres to one decimal.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_km(distance: f64) -> String {
    if distance.is_nan() {
        return PLACEHOLDER.to_string();
    }
    if distance < 1.0 {
        return format!("{} m", (distance * 1000.0).round() as i64);
    }
    format!("{distance:.1} km")
}

/// Percentage to the given number of decimals, placeholder when absent
/// or not finite.
#[must_use]
pub fn format_percent(value: Option<f64>, decimals: usize) -> String {
    value
        .filter(|v| v.is_finite())
        .map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.decimals$}%"))
}

/// Integer with thousands separators, placeholder when absent.
#[must_use]
pub fn format_integer(value: Option<i64>) -> String {
    let Some(value) = value else {
        return PLACEHOLDER.to_string();
    };
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Long date label ("Sat 25 Oct 2025"); placeholder for empty input and
/// the raw text when it fails to parse.
#[must_use]
pub fn format_long_date(date: &str) -> String {
    if date.is_empty() {
        return PLACEHOLDER.to_string();
    }
    NaiveDate::parse_from_str(date, ISO_DATE).map_or_else(
        |_| date.to_string(),
        |parsed| parsed.format("%a %-d %b %Y").to_string(),
    )
}

/// Compact range over the first and last of a date series
/// ("16 Oct – 22 Oct"); empty input yields an empty string.
#[must_use]
pub fn format_date_range(dates: &[String]) -> String {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return String::new();
    };
    let short = |date: &str| {
        NaiveDate::parse_from_str(date, ISO_DATE).map_or_else(
            |_| date.to_string(),
            |parsed| parsed.format("%-d %b").to_string(),
        )
    };
    format!("{} – {}", short(first), short(last))
}
