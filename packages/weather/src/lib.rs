#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Localized weather resolution by postal prefix.
//!
//! There is no real weather service behind this: a static lookup table
//! keyed by outward-code prefixes (plus one `DEFAULT` entry) stands in
//! for it. Resolution tries the longest prefix first, since UK outward
//! codes are 2-4 characters and a longer prefix approximates a more
//! specific district.

pub mod display;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of the table-wide fallback entry.
pub const DEFAULT_KEY: &str = "DEFAULT";

/// A weather observation for one postal district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    /// Temperature in degrees Celsius.
    pub temperature_c: Option<f64>,
    /// Relative humidity percentage.
    pub humidity: Option<f64>,
    /// Air-quality index.
    pub aqi: Option<f64>,
    /// Free-text condition (e.g. "partly cloudy").
    pub condition: Option<String>,
    /// Icon token: a provider code like "03d" or a literal glyph.
    pub icon: Option<String>,
    /// Pre-composed advisory text; composed from the record when absent.
    pub advice: Option<String>,
    /// When the record was fetched, if it ever came from a live feed.
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Prefix-keyed weather table built from a raw, untyped lookup object.
#[derive(Debug, Clone, Default)]
pub struct WeatherLookup {
    entries: BTreeMap<String, WeatherRecord>,
}

impl WeatherLookup {
    /// Normalizes a raw lookup object: keys are upper-cased and only
    /// record-shaped values are retained. Anything else (arrays, strings,
    /// numbers, objects with mistyped fields) is skipped with a warning.
    #[must_use]
    pub fn from_raw(raw: &serde_json::Map<String, Value>) -> Self {
        let mut entries = BTreeMap::new();
        for (key, value) in raw {
            if !value.is_object() {
                log::warn!("weather lookup entry {key} is not a record, skipping");
                continue;
            }
            match serde_json::from_value::<WeatherRecord>(value.clone()) {
                Ok(record) => {
                    entries.insert(key.to_uppercase(), record);
                }
                Err(e) => {
                    log::warn!("weather lookup entry {key} failed to parse: {e}");
                }
            }
        }
        log::debug!("weather lookup holds {} entries", entries.len());
        Self { entries }
    }

    /// Builds a lookup directly from typed entries (tests, fixtures).
    #[must_use]
    pub fn from_entries(entries: BTreeMap<String, WeatherRecord>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, record)| (key.to_uppercase(), record))
                .collect(),
        }
    }

    /// Resolves weather for a normalized postcode through the cascade:
    /// longest outward prefix (length `min(len, 4)` down to 2) first,
    /// then the table `DEFAULT` entry, then the supplied "today" record.
    #[must_use]
    pub fn resolve(
        &self,
        normalized_postcode: &str,
        today: Option<&WeatherRecord>,
    ) -> Option<WeatherRecord> {
        let cleaned = care_map_postcode::normalize(normalized_postcode);
        if !cleaned.is_empty() {
            for candidate in care_map_postcode::prefix_candidates(&cleaned) {
                if let Some(record) = self.entries.get(&candidate) {
                    log::debug!("weather for {cleaned} resolved via prefix {candidate}");
                    return Some(record.clone());
                }
            }
        }
        self.entries
            .get(DEFAULT_KEY)
            .or(today)
            .cloned()
    }
}
