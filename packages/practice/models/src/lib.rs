#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! GP practice and patient reference types.
//!
//! These are the immutable inputs to the locality engine. Practices never
//! mutate; derived figures (distance from a resolved centre) are carried on
//! wrapper types, never written back here. Clinical metrics are optional
//! throughout: a practice that did not report a figure carries `None`, and
//! `0` is always a real value, never shorthand for "absent".

use serde::{Deserialize, Serialize};

/// A WGS84 point as `lat`/`lng` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// A GP practice reference record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Practice {
    /// Stable identifier (practice code or synthetic id).
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// ODS practice code, when distinct from the id.
    pub practice_code: Option<String>,
    /// Recorded postcode, already display-formatted at source.
    pub postcode: Option<String>,
    /// Practice location.
    pub coordinates: Coordinate,
    /// Patient rating on a 0-5 scale.
    pub rating: Option<f64>,
    /// QOF achievement percentage.
    pub achievement_percent: Option<f64>,
    /// Condition prevalence percentage.
    pub prevalence_percent: Option<f64>,
    /// Percentage of patients receiving the tracked intervention.
    pub intervention_percent: Option<f64>,
    /// Percentage of patients receiving an annual review.
    pub review_percent: Option<f64>,
    /// Disease register headcount.
    pub register: Option<i64>,
    /// Registered patient list size.
    pub list_size: Option<i64>,
    /// Personalised-care-adjustment rate.
    pub pca_rate: Option<f64>,
    /// Whether the practice is NHS-operated.
    #[serde(default)]
    pub is_nhs: bool,
    /// Contact phone number.
    pub phone: Option<String>,
}

/// Reference averages carried on the patient profile. Used as the
/// aggregation fallback when no practice in the active set reports the
/// corresponding metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAverages {
    /// Mean disease-register size across the patient's home area.
    pub register: Option<f64>,
    /// Mean intervention percentage across the patient's home area.
    pub intervention_percent: Option<f64>,
    /// Mean review percentage across the patient's home area.
    pub review_percent: Option<f64>,
}

/// A stripped-down practice record used for the top-practice banner when
/// no live practice subset is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePractice {
    /// Display name.
    pub name: Option<String>,
    /// QOF achievement percentage.
    pub achievement_percent: Option<f64>,
    /// Condition prevalence percentage.
    pub prevalence_percent: Option<f64>,
    /// Disease register headcount.
    pub register: Option<i64>,
}

/// Static patient reference profile.
///
/// The activity series is a fixed 7-point history with matching date
/// labels; it seeds the charts before any practice subset is resolved and
/// backs the fallback series when a trend dataset comes up empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    /// Display alias (not a real name).
    pub alias: String,
    /// Home postcode, display-formatted.
    pub home_postcode: String,
    /// 7-point activity series.
    #[serde(default)]
    pub activity: Vec<f64>,
    /// ISO dates matching the activity series.
    #[serde(default)]
    pub activity_dates: Vec<String>,
    /// Explicit chart labels; when absent, weekday names are derived from
    /// `activity_dates`.
    pub activity_labels: Option<Vec<String>>,
    /// Reference averages for fallback aggregation.
    pub averages: Option<PatientAverages>,
    /// Reference top practice for fallback display.
    pub top_practice: Option<ReferencePractice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn practice_deserializes_from_camel_case() {
        let practice: Practice = serde_json::from_str(
            r#"{
                "id": "gp-01",
                "name": "City Road Medical Centre",
                "postcode": "EC1V 2PD",
                "coordinates": { "lat": 51.527193, "lng": -0.086555 },
                "rating": 4.6,
                "achievementPercent": 92.0,
                "register": 118,
                "isNhs": true,
                "phone": "+44 20 7608 2500"
            }"#,
        )
        .unwrap();

        assert_eq!(practice.id, "gp-01");
        assert_eq!(practice.postcode.as_deref(), Some("EC1V 2PD"));
        assert!(practice.is_nhs);
        assert_eq!(practice.register, Some(118));
        assert!(practice.intervention_percent.is_none());
    }

    #[test]
    fn zero_metric_is_present_not_absent() {
        let practice: Practice = serde_json::from_str(
            r#"{
                "id": "gp-02",
                "coordinates": { "lat": 51.5, "lng": -0.1 },
                "rating": 0.0
            }"#,
        )
        .unwrap();

        assert_eq!(practice.rating, Some(0.0));
        assert!(!practice.is_nhs);
    }

    #[test]
    fn patient_summary_defaults_empty_series() {
        let patient: PatientSummary = serde_json::from_str(
            r#"{ "alias": "A. Smith", "homePostcode": "EC1A 1BB" }"#,
        )
        .unwrap();

        assert!(patient.activity.is_empty());
        assert!(patient.activity_dates.is_empty());
        assert!(patient.averages.is_none());
    }
}
