//! Weather-card display helpers: condition casing, icon selection,
//! advisory and metadata composition.

use regex::Regex;
use std::sync::LazyLock;

use crate::WeatherRecord;

/// Provider icon tokens look like "03" / "03d" / "03n".
static PROVIDER_ICON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}[dn]?$").expect("valid regex"));

/// Glyph used when nothing better can be derived.
const DEFAULT_ICON: &str = "🌤️";

/// Advice shown when no condition triggers specific guidance.
const ROUTINE_ADVICE: &str = "Maintain your usual COPD routine today.";

/// Title-cases each whitespace-separated word of a condition string.
/// Only the first character of each word changes; the rest is kept as-is.
#[must_use]
pub fn format_condition(condition: &str) -> String {
    condition
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rounded display temperature, when the record carries one.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rounded_temperature(record: &WeatherRecord) -> Option<i64> {
    record
        .temperature_c
        .filter(|t| t.is_finite())
        .map(|t| t.round() as i64)
}

/// Selects a display glyph for a record. Provider codes ("01".."50",
/// optional day/night suffix) map through a fixed table; any other
/// non-empty token passes through trimmed; otherwise the condition text
/// is keyword-scanned.
#[must_use]
pub fn select_icon(record: &WeatherRecord) -> String {
    if let Some(icon) = record.icon.as_deref() {
        if PROVIDER_ICON_RE.is_match(icon) {
            return provider_glyph(&icon[..2]).to_string();
        }
        let trimmed = icon.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if let Some(condition) = record.condition.as_deref() {
        let lowered = condition.to_lowercase();
        if lowered.contains("storm") || lowered.contains("thunder") {
            return "⛈️".to_string();
        }
        if lowered.contains("rain") || lowered.contains("shower") {
            return "🌧️".to_string();
        }
        if lowered.contains("snow") {
            return "❄️".to_string();
        }
        if lowered.contains("fog") || lowered.contains("mist") || lowered.contains("haze") {
            return "🌫️".to_string();
        }
        if lowered.contains("cloud") {
            return "☁️".to_string();
        }
        if lowered.contains("sun") || lowered.contains("clear") {
            return "☀️".to_string();
        }
    }

    DEFAULT_ICON.to_string()
}

fn provider_glyph(code: &str) -> &'static str {
    match code {
        "01" => "☀️",
        "02" => "🌤️",
        "03" => "⛅",
        "04" => "☁️",
        "09" => "🌧️",
        "10" => "🌦️",
        "11" => "⛈️",
        "13" => "❄️",
        "50" => "🌫️",
        _ => DEFAULT_ICON,
    }
}

/// Advisory text for a record: its own advice when present, otherwise
/// composed from temperature, AQI, and humidity bands.
#[must_use]
pub fn advice_text(record: &WeatherRecord) -> String {
    if let Some(advice) = record.advice.as_deref() {
        if !advice.is_empty() {
            return advice.to_string();
        }
    }
    build_advice(record)
}

/// Composes advisory guidance from the record's numeric bands.
#[must_use]
pub fn build_advice(record: &WeatherRecord) -> String {
    let mut advice = Vec::new();

    if let Some(temp) = rounded_temperature(record) {
        if temp <= 5 {
            advice.push("Cold air can trigger breathlessness, wrap up warmly outdoors.");
        } else if temp >= 26 {
            advice.push("Hot weather, stay hydrated and avoid strenuous trips outside midday.");
        }
    }

    if let Some(aqi) = record.aqi.filter(|v| v.is_finite()) {
        if aqi > 100.0 {
            advice.push("Air quality is poor, limit prolonged outdoor activity today.");
        } else if aqi > 70.0 {
            advice.push("Moderate air quality, keep rescue inhaler close if you head out.");
        }
    }

    if record.humidity.filter(|v| v.is_finite()).is_some_and(|h| h >= 80.0) {
        advice.push("High humidity, pace breathing exercises and move slowly outside.");
    }

    if advice.is_empty() {
        ROUTINE_ADVICE.to_string()
    } else {
        advice.join(" ")
    }
}

/// Metadata line: humidity, AQI, and fetch time joined with a separator,
/// or a dash when none are present.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn build_meta(record: &WeatherRecord) -> String {
    let mut detail = Vec::new();
    if let Some(humidity) = record.humidity.filter(|v| v.is_finite()) {
        detail.push(format!("Humidity {}%", humidity.round() as i64));
    }
    if let Some(aqi) = record.aqi.filter(|v| v.is_finite()) {
        detail.push(format!("AQI {}", aqi.round() as i64));
    }
    if let Some(fetched_at) = record.fetched_at {
        detail.push(format!("Updated {}", fetched_at.format("%H:%M")));
    }
    if detail.is_empty() {
        "—".to_string()
    } else {
        detail.join(" · ")
    }
}
