#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Compile-time embedded mock dataset.
//!
//! The dashboard runs entirely off this bundle: five GP practices with
//! clinical metrics, three curated sample localities, the patient
//! reference profile, a prefix-keyed weather lookup, and today's
//! weather. The weather lookup stays untyped here; the weather crate
//! validates it entry by entry so malformed values degrade to a warning
//! rather than failing the whole load.

use care_map_locality::SampleLocality;
use care_map_practice_models::{PatientSummary, Practice};
use care_map_weather::WeatherRecord;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Embedded dataset payload.
const DASHBOARD_JSON: &str = include_str!("../data/dashboard.json");

/// Error raised when the embedded dataset fails to parse.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The embedded JSON did not match the expected shape.
    #[error("failed to parse embedded dashboard dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The full mock dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Curated sample localities, in precedence order; the first entry
    /// is the last-resort default locality.
    pub sample_localities: Vec<SampleLocality>,
    /// Static patient reference profile.
    pub patient_summary: PatientSummary,
    /// Today's weather, the ultimate weather fallback.
    pub weather_today: Option<WeatherRecord>,
    /// Raw prefix-keyed weather lookup; validated by the weather crate.
    #[serde(default)]
    pub weather_lookup: serde_json::Map<String, Value>,
    /// GP practice records.
    pub practices: Vec<Practice>,
}

/// Parses the embedded dataset.
///
/// # Errors
///
/// Returns [`DatasetError::Parse`] if the embedded JSON does not match
/// the dataset shape. This is the engine's only fatal error; it means
/// the build itself shipped a bad bundle.
pub fn load() -> Result<Dataset, DatasetError> {
    let dataset: Dataset = serde_json::from_str(DASHBOARD_JSON)?;
    log::info!(
        "loaded {} practices, {} sample localities, {} weather prefixes",
        dataset.practices.len(),
        dataset.sample_localities.len(),
        dataset.weather_lookup.len()
    );
    Ok(dataset)
}
