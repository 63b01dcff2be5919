#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! The dashboard update cycle.
//!
//! [`DashboardEngine`] owns the static dataset and the current
//! [`FilterState`], and recomputes a complete [`DashboardView`] inside
//! one synchronous call per user action (submit, reset, load). The
//! filter state is replaced wholesale on every update; no field is ever
//! patched in isolation, so a port to a concurrent runtime only needs to
//! serialize whole updates per session.

pub mod format;
pub mod map;

use care_map_analytics_models::AggregateSummary;
use care_map_locality::{AreaResolver, PracticeIndex, Resolved, SampleLocality, SampleTable};
use care_map_practice_models::{Coordinate, PatientSummary, Practice, ReferencePractice};
use care_map_spatial::{RankedPractice, filter_by_rating, select_active, within_distance};
use care_map_weather::{WeatherLookup, WeatherRecord};
use chrono::NaiveDate;
use serde::Serialize;

/// Radius applied at load and restored by reset.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Rating threshold applied at load and restored by reset.
pub const DEFAULT_MIN_RATING: f64 = 0.0;

/// Fixed usage tip appended to every hint string.
const BASE_HINT: &str = "Tip: Enter any NHS GP postcode, e.g. EC1A 1BB / SW1A 0AA / M1 1AE.";

/// The ephemeral per-session filter state. Recomputed as one value on
/// every submission or reset.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Radius filter in kilometres.
    pub radius_km: f64,
    /// Minimum rating threshold.
    pub min_rating: f64,
    /// Resolved centre coordinate.
    pub centre: Coordinate,
    /// Resolved area display label.
    pub area_label: String,
    /// Postcode text shown in the input field.
    pub display_postcode: String,
    /// Weather resolved for the current postcode.
    pub weather: Option<WeatherRecord>,
}

/// Parallel label/value sequences for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Category labels.
    pub labels: Vec<String>,
    /// Values parallel to `labels`.
    pub values: Vec<f64>,
}

/// Chart series for the three tracked metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendCharts {
    /// Achievement chart.
    pub achievement: ChartSeries,
    /// Intervention chart.
    pub intervention: ChartSeries,
    /// Review chart.
    pub review: ChartSeries,
}

/// Everything the rendering layer needs after one update cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Resolved area label.
    pub area_label: String,
    /// Resolved centre.
    pub centre: Coordinate,
    /// Postcode text to show in the input field.
    pub display_postcode: String,
    /// The active practice set, ranked ascending by distance. Consumers
    /// cap this at their own display limits.
    pub practices: Vec<RankedPractice>,
    /// Size of the within-distance set (before the rating filter).
    pub within_count: usize,
    /// Size of the rating-filtered set.
    pub filtered_count: usize,
    /// Aggregates derived from the active set.
    pub summary: AggregateSummary,
    /// Chart series, with fallbacks already substituted so every series
    /// is non-empty.
    pub charts: TrendCharts,
    /// Composed top-practice banner line.
    pub top_practice_banner: String,
    /// Weather for the current postcode.
    pub weather: Option<WeatherRecord>,
    /// Composed hint line describing match counts and radius.
    pub hint: String,
}

/// Owns the dataset and the current filter state.
pub struct DashboardEngine {
    practices: Vec<Practice>,
    patient: PatientSummary,
    resolver: AreaResolver,
    weather: WeatherLookup,
    today: Option<WeatherRecord>,
    state: FilterState,
}

impl DashboardEngine {
    /// Builds the engine and resolves the default state for the
    /// patient's home postcode.
    #[must_use]
    pub fn new(
        practices: Vec<Practice>,
        sample_localities: Vec<SampleLocality>,
        patient: PatientSummary,
        weather: WeatherLookup,
        today: Option<WeatherRecord>,
    ) -> Self {
        let index = PracticeIndex::from_practices(&practices);
        let resolver = AreaResolver::new(
            SampleTable::new(sample_localities),
            index,
            &patient.home_postcode,
        );
        let state = Self::default_state(&resolver, &weather, today.as_ref());
        Self {
            practices,
            patient,
            resolver,
            weather,
            today,
            state,
        }
    }

    fn default_state(
        resolver: &AreaResolver,
        weather: &WeatherLookup,
        today: Option<&WeatherRecord>,
    ) -> FilterState {
        let area = resolver.default_area();
        FilterState {
            radius_km: DEFAULT_RADIUS_KM,
            min_rating: DEFAULT_MIN_RATING,
            centre: area.centre,
            area_label: area.label.clone(),
            display_postcode: care_map_postcode::format(resolver.home_key()),
            weather: weather.resolve(resolver.home_key(), today),
        }
    }

    /// Current filter state.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// The view for the current state; used at initial load.
    #[must_use]
    pub fn current_view(&self) -> DashboardView {
        self.compute_view()
    }

    /// Applies one filter submission: resolves the postcode, replaces
    /// the whole filter state, and recomputes the view.
    pub fn submit(
        &mut self,
        postcode_text: &str,
        radius_km: f64,
        min_rating: f64,
    ) -> DashboardView {
        let key = care_map_postcode::normalize(postcode_text);
        let Resolved {
            area,
            kind,
            echo_postcode,
        } = self.resolver.resolve(&key);
        log::debug!("resolved \"{postcode_text}\" via {kind:?}");

        let weather_key = if key.is_empty() {
            self.resolver.home_key().to_string()
        } else {
            key
        };

        self.state = FilterState {
            radius_km,
            min_rating,
            centre: area.centre,
            area_label: area.label,
            display_postcode: echo_postcode.unwrap_or_else(|| postcode_text.to_string()),
            weather: self.weather.resolve(&weather_key, self.today.as_ref()),
        };
        self.compute_view()
    }

    /// Restores the default state unconditionally: home area, 10 km
    /// radius, rating threshold 0.
    pub fn reset(&mut self) -> DashboardView {
        self.state = Self::default_state(&self.resolver, &self.weather, self.today.as_ref());
        self.compute_view()
    }

    fn compute_view(&self) -> DashboardView {
        let state = &self.state;
        let within = within_distance(&self.practices, &state.centre, state.radius_km);
        let filtered = filter_by_rating(&within, state.min_rating);
        let active = select_active(&filtered, &within);

        let summary = care_map_analytics::aggregate(active, &self.patient);
        let charts = self.build_charts(&summary);
        let top_practice_banner = banner_line(summary.top_practice.as_ref());
        let hint = self.hint_line(within.len(), filtered.len());

        DashboardView {
            area_label: state.area_label.clone(),
            centre: state.centre,
            display_postcode: state.display_postcode.clone(),
            practices: active.to_vec(),
            within_count: within.len(),
            filtered_count: filtered.len(),
            summary,
            charts,
            top_practice_banner,
            weather: state.weather.clone(),
            hint,
        }
    }

    fn build_charts(&self, summary: &AggregateSummary) -> TrendCharts {
        let labels = self.default_labels();
        let reference = self.patient.averages.as_ref();

        let achievement_fallback = {
            let mut series: Vec<f64> = self
                .patient
                .activity
                .iter()
                .copied()
                .take(labels.len())
                .collect();
            if series.is_empty() {
                series = default_series(
                    care_map_spatial::stats::mean(&self.patient.activity),
                    labels.len(),
                );
            }
            series
        };
        let intervention_fallback = default_series(
            reference.and_then(|averages| averages.intervention_percent),
            labels.len(),
        );
        let review_fallback = default_series(
            reference.and_then(|averages| averages.review_percent),
            labels.len(),
        );

        TrendCharts {
            achievement: chart_series(&summary.achievement.labels, &summary.achievement.values, &labels, achievement_fallback),
            intervention: chart_series(&summary.intervention.labels, &summary.intervention.values, &labels, intervention_fallback),
            review: chart_series(&summary.review.labels, &summary.review.values, &labels, review_fallback),
        }
    }

    /// Default chart labels: the patient's explicit activity labels, or
    /// weekday names derived from the activity dates.
    fn default_labels(&self) -> Vec<String> {
        if let Some(labels) = &self.patient.activity_labels {
            if !labels.is_empty() {
                return labels.clone();
            }
        }
        self.patient
            .activity_dates
            .iter()
            .map(|date| weekday_label(date))
            .collect()
    }

    fn hint_line(&self, within_count: usize, filtered_count: usize) -> String {
        let mut detail = if within_count > 0 {
            format!(
                "GPs in range: {within_count} (radius {} km)",
                self.state.radius_km
            )
        } else {
            "No matches within the selected radius.".to_string()
        };
        if within_count > 0 && filtered_count > 0 && filtered_count != within_count {
            detail.push_str(&format!(" · After rating filter: {filtered_count}"));
        }
        format!("{} | {detail} | {BASE_HINT}", self.state.area_label)
    }
}

fn chart_series(
    labels: &[String],
    values: &[f64],
    fallback_labels: &[String],
    fallback_values: Vec<f64>,
) -> ChartSeries {
    if values.is_empty() {
        ChartSeries {
            labels: fallback_labels.to_vec(),
            values: fallback_values,
        }
    } else {
        ChartSeries {
            labels: labels.to_vec(),
            values: values.to_vec(),
        }
    }
}

/// A flat series at the given value (rounded to 1 decimal, absent as 0),
/// never shorter than one point.
fn default_series(value: Option<f64>, len: usize) -> Vec<f64> {
    let rounded = value
        .filter(|v| v.is_finite())
        .map_or(0.0, |v| (v * 10.0).round() / 10.0);
    vec![rounded; len.max(1)]
}

/// Short weekday name for an ISO date, or the raw text when it fails to
/// parse.
fn weekday_label(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_or_else(|_| date.to_string(), |parsed| parsed.format("%a").to_string())
}

/// Composes the top-practice banner: name plus whichever figures are
/// present, or a dash when there is no practice to show.
#[must_use]
pub fn banner_line(practice: Option<&ReferencePractice>) -> String {
    let Some(practice) = practice else {
        return "—".to_string();
    };
    let Some(name) = practice.name.as_deref() else {
        return "—".to_string();
    };

    let mut parts = vec!["Top Practice".to_string(), name.to_string()];
    if practice.achievement_percent.is_some() {
        parts.push(format!(
            "{} achievement",
            format::format_percent(practice.achievement_percent, 1)
        ));
    }
    if practice.prevalence_percent.is_some() {
        parts.push(format!(
            "{} prevalence",
            format::format_percent(practice.prevalence_percent, 2)
        ));
    }
    if practice.register.is_some() {
        parts.push(format!(
            "{} register",
            format::format_integer(practice.register)
        ));
    }
    parts.join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DashboardEngine {
        let dataset = care_map_data::load().unwrap();
        let weather = WeatherLookup::from_raw(&dataset.weather_lookup);
        DashboardEngine::new(
            dataset.practices,
            dataset.sample_localities,
            dataset.patient_summary,
            weather,
            dataset.weather_today,
        )
    }

    #[test]
    fn load_resolves_home_area_defaults() {
        let engine = engine();
        let state = engine.state();
        assert_eq!(state.area_label, "Barbican, London");
        assert_eq!(state.display_postcode, "EC1A 1BB");
        assert_eq!(state.radius_km, DEFAULT_RADIUS_KM);
        assert_eq!(state.min_rating, DEFAULT_MIN_RATING);
        // Home postcode EC1A 1BB resolves weather through the EC1 prefix.
        let weather = state.weather.as_ref().unwrap();
        assert_eq!(weather.condition.as_deref(), Some("partly cloudy"));
    }

    #[test]
    fn submit_sample_postcode_moves_centre() {
        let mut engine = engine();
        let view = engine.submit("m1 1ae", 10.0, 0.0);
        assert_eq!(view.area_label, "Manchester City Centre");
        assert_eq!(view.display_postcode, "M1 1AE");
        assert!((view.centre.lat - 53.4808).abs() < 1e-9);
        // Only the Manchester clinic is inside 10 km of the M1 centre.
        assert_eq!(view.within_count, 1);
        assert_eq!(view.practices[0].practice.id, "gp-04");
        assert_eq!(
            view.weather.unwrap().condition.as_deref(),
            Some("overcast")
        );
    }

    #[test]
    fn submit_indexed_postcode_synthesizes_area() {
        let mut engine = engine();
        let view = engine.submit("ec1v 2pd", 10.0, 0.0);
        assert_eq!(view.area_label, "EC1V 2PD · 1 GP");
        assert_eq!(view.display_postcode, "EC1V 2PD");
    }

    #[test]
    fn submit_unknown_postcode_keeps_default_centre() {
        let mut engine = engine();
        let view = engine.submit("ZZ1 2AB", 10.0, 0.0);
        assert_eq!(view.area_label, "No GP data found for ZZ1 2AB");
        // Centre stays at the default area; the typed text is kept.
        assert!((view.centre.lat - 51.5202).abs() < 1e-9);
        assert_eq!(view.display_postcode, "ZZ1 2AB");
        // Unknown prefix falls through to the DEFAULT weather entry.
        assert_eq!(
            view.weather.unwrap().condition.as_deref(),
            Some("mostly cloudy")
        );
    }

    #[test]
    fn submit_empty_postcode_restores_home_area() {
        let mut engine = engine();
        engine.submit("M1 1AE", 10.0, 0.0);
        let view = engine.submit("   ", 10.0, 0.0);
        assert_eq!(view.area_label, "Barbican, London");
        assert_eq!(view.display_postcode, "EC1A 1BB");
    }

    #[test]
    fn rating_filter_fallback_keeps_within_distance_set() {
        let mut engine = engine();
        // Threshold above every rating: the active set must fall back to
        // the full within-distance set rather than go empty.
        let view = engine.submit("EC1A 1BB", 10.0, 5.0);
        assert_eq!(view.filtered_count, 0);
        assert!(view.within_count > 0);
        assert_eq!(view.practices.len(), view.within_count);
        assert_eq!(view.summary.kpis.practice_count, view.within_count);
    }

    #[test]
    fn practices_ranked_ascending_by_distance() {
        let mut engine = engine();
        let view = engine.submit("EC1A 1BB", 10.0, 0.0);
        assert!(view
            .practices
            .windows(2)
            .all(|w| w[0].distance_km <= w[1].distance_km));
        assert!(view.practices.iter().all(|p| p.distance_km <= 10.0));
    }

    #[test]
    fn reset_restores_defaults_unconditionally() {
        let mut engine = engine();
        engine.submit("M1 1AE", 25.0, 4.5);
        let view = engine.reset();
        let state = engine.state();
        assert_eq!(state.radius_km, DEFAULT_RADIUS_KM);
        assert_eq!(state.min_rating, DEFAULT_MIN_RATING);
        assert_eq!(view.area_label, "Barbican, London");
        assert_eq!(view.display_postcode, "EC1A 1BB");
    }

    #[test]
    fn hint_reports_counts_and_radius() {
        let mut engine = engine();
        let view = engine.submit("EC1A 1BB", 10.0, 4.5);
        assert!(view.hint.starts_with("Barbican, London | GPs in range: 4 (radius 10 km)"));
        assert!(view.hint.contains("After rating filter: 2"));
        assert!(view.hint.ends_with(BASE_HINT));
    }

    #[test]
    fn hint_reports_empty_radius() {
        let mut engine = engine();
        let view = engine.submit("ZZ9 9ZZ", 0.0, 0.0);
        // No practice sits exactly on the default centre.
        assert!(view.hint.contains("No matches within the selected radius."));
    }

    #[test]
    fn charts_fall_back_to_activity_series() {
        let mut engine = engine();
        // Manchester centre with a 1 km radius catches the clinic alone;
        // shrink to zero matches to force the chart fallback.
        let view = engine.submit("ZZ9 9ZZ", 0.0, 0.0);
        assert_eq!(view.charts.achievement.labels.len(), 7);
        assert_eq!(
            view.charts.achievement.values,
            vec![4.0, 3.0, 5.0, 4.0, 6.0, 5.0, 4.0]
        );
        // Weekday labels derived from the activity dates.
        assert_eq!(view.charts.achievement.labels[0], "Thu");
        // Flat fallback series at the reference averages.
        assert_eq!(view.charts.intervention.values, vec![44.1; 7]);
        assert_eq!(view.charts.review.values, vec![61.0; 7]);
    }

    #[test]
    fn charts_use_trend_data_when_available() {
        let mut engine = engine();
        let view = engine.submit("EC1A 1BB", 10.0, 0.0);
        assert!(!view.charts.achievement.values.is_empty());
        assert_eq!(
            view.charts.achievement.labels.len(),
            view.charts.achievement.values.len()
        );
        // Descending by achievement: Westminster (96) ranks first.
        assert_eq!(view.charts.achievement.labels[0], "Westminster Health Centre");
    }

    #[test]
    fn banner_composes_present_parts() {
        let banner = banner_line(Some(&ReferencePractice {
            name: Some("City Road Medical Centre".to_string()),
            achievement_percent: Some(92.0),
            prevalence_percent: Some(2.01),
            register: Some(1480),
        }));
        assert_eq!(
            banner,
            "Top Practice · City Road Medical Centre · 92.0% achievement · 2.01% prevalence · 1,480 register"
        );
    }

    #[test]
    fn banner_dash_without_practice_or_name() {
        assert_eq!(banner_line(None), "—");
        assert_eq!(
            banner_line(Some(&ReferencePractice {
                name: None,
                achievement_percent: Some(90.0),
                prevalence_percent: None,
                register: None,
            })),
            "—"
        );
    }

    #[test]
    fn state_is_replaced_wholesale() {
        let mut engine = engine();
        let before = engine.state().clone();
        engine.submit("SW1A 0AA", 25.0, 4.0);
        let after = engine.state();
        assert_ne!(before.area_label, after.area_label);
        assert_ne!(before.radius_km, after.radius_km);
        assert_ne!(before.min_rating, after.min_rating);
        assert_ne!(before.weather, after.weather);
    }
}
