#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Aggregation over the active practice set.
//!
//! Derives the KPI scalars, the per-metric top-7 trend datasets, the
//! summary averages, and the top practice from whatever subset survived
//! filtering. Every figure is recomputed from scratch per update; the
//! only inputs are the active set and the static patient profile, whose
//! reference figures back the fallbacks when the set carries no data.

use care_map_analytics_models::{
    AggregateSummary, Kpis, SummaryAverages, TrendDataset, TrendMetric,
};
use care_map_practice_models::{PatientSummary, Practice, ReferencePractice};
use care_map_spatial::{RankedPractice, stats};

/// Label used when a practice has neither a name nor a practice code.
const GENERIC_LABEL: &str = "GP";

/// How many practices a trend dataset ranks.
const TREND_LIMIT: usize = 7;

/// A trend dataset together with the sorted practices that produced it;
/// the source feeds the top-practice reduction.
#[derive(Debug, Clone)]
pub struct Trend {
    /// The chart-facing dataset.
    pub dataset: TrendDataset,
    /// The top practices backing the dataset, in dataset order.
    pub source: Vec<Practice>,
}

/// Reads the ranked metric off a practice.
#[must_use]
pub const fn metric_value(practice: &Practice, metric: TrendMetric) -> Option<f64> {
    match metric {
        TrendMetric::Achievement => practice.achievement_percent,
        TrendMetric::Intervention => practice.intervention_percent,
        TrendMetric::Review => practice.review_percent,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Builds the trend dataset for one metric: practices carrying the
/// metric, stable-sorted descending by it (ties keep active-set order),
/// truncated to the top 7.
#[must_use]
pub fn trend(active: &[RankedPractice], metric: TrendMetric) -> Trend {
    let mut carrying: Vec<&Practice> = active
        .iter()
        .map(|ranked| &ranked.practice)
        .filter(|practice| metric_value(practice, metric).is_some())
        .collect();
    carrying.sort_by(|a, b| {
        let a_value = metric_value(a, metric).unwrap_or(f64::NEG_INFINITY);
        let b_value = metric_value(b, metric).unwrap_or(f64::NEG_INFINITY);
        b_value.total_cmp(&a_value)
    });
    carrying.truncate(TREND_LIMIT);

    let labels = carrying
        .iter()
        .map(|practice| {
            practice
                .name
                .clone()
                .or_else(|| practice.practice_code.clone())
                .unwrap_or_else(|| GENERIC_LABEL.to_string())
        })
        .collect();
    let values = carrying
        .iter()
        .map(|practice| round1(metric_value(practice, metric).unwrap_or(0.0)))
        .collect();

    Trend {
        dataset: TrendDataset {
            metric,
            labels,
            values,
        },
        source: carrying.into_iter().cloned().collect(),
    }
}

/// Derives the headline KPI scalars.
///
/// Absent ratings are excluded from both numerator and denominator, never
/// treated as zero. The intervention KPI falls back to the patient's
/// reference average when no active practice reports the metric.
#[must_use]
pub fn kpis(active: &[RankedPractice], patient: &PatientSummary) -> Kpis {
    let ratings: Vec<f64> = active
        .iter()
        .filter_map(|ranked| ranked.practice.rating)
        .collect();
    let interventions: Vec<f64> = active
        .iter()
        .filter_map(|ranked| ranked.practice.intervention_percent)
        .collect();

    Kpis {
        practice_count: active.len(),
        average_rating: stats::mean(&ratings),
        average_intervention: stats::mean(&interventions).or_else(|| {
            patient
                .averages
                .as_ref()
                .and_then(|averages| averages.intervention_percent)
        }),
    }
}

/// Reduces the candidates to the winning practice: strictly greater
/// achievement wins; on equal achievement, strictly greater register
/// wins. Absent achievement compares as negative infinity, absent
/// register as zero.
fn reduce_top_practice<'a>(candidates: &[&'a Practice]) -> Option<&'a Practice> {
    let mut best: Option<&Practice> = None;
    for &candidate in candidates {
        let Some(incumbent) = best else {
            best = Some(candidate);
            continue;
        };
        let best_value = incumbent.achievement_percent.unwrap_or(f64::NEG_INFINITY);
        let value = candidate.achievement_percent.unwrap_or(f64::NEG_INFINITY);
        let beats = value > best_value
            || (value == best_value
                && candidate.register.unwrap_or(0) > incumbent.register.unwrap_or(0));
        if beats {
            best = Some(candidate);
        }
    }
    best
}

/// Derives the full aggregate summary for one active set.
#[must_use]
pub fn aggregate(active: &[RankedPractice], patient: &PatientSummary) -> AggregateSummary {
    let achievement = trend(active, TrendMetric::Achievement);
    let intervention = trend(active, TrendMetric::Intervention);
    let review = trend(active, TrendMetric::Review);

    let achievement_values: Vec<f64> = active
        .iter()
        .filter_map(|ranked| ranked.practice.achievement_percent)
        .collect();
    let averages = SummaryAverages {
        achievement: stats::mean(&achievement_values)
            .or_else(|| stats::mean(&patient.activity)),
        intervention: stats::mean(&intervention.dataset.values).or_else(|| {
            patient
                .averages
                .as_ref()
                .and_then(|averages| averages.intervention_percent)
        }),
        review: stats::mean(&review.dataset.values).or_else(|| {
            patient
                .averages
                .as_ref()
                .and_then(|averages| averages.review_percent)
        }),
    };

    // The trend source is the top slice of the achievement-bearing
    // practices, so it is only empty when no active practice carries the
    // metric at all; then the full candidate list gets its turn before
    // the patient's reference record.
    let achievement_candidates: Vec<&Practice> = active
        .iter()
        .map(|ranked| &ranked.practice)
        .filter(|practice| practice.achievement_percent.is_some())
        .collect();
    let source_refs: Vec<&Practice> = achievement.source.iter().collect();
    let candidates = if source_refs.is_empty() {
        &achievement_candidates
    } else {
        &source_refs
    };
    let top_practice = reduce_top_practice(candidates)
        .map(|practice| ReferencePractice {
            name: practice.name.clone(),
            achievement_percent: practice.achievement_percent,
            prevalence_percent: practice.prevalence_percent,
            register: practice.register,
        })
        .or_else(|| patient.top_practice.clone());

    log::debug!(
        "aggregated {} practices ({} with achievement)",
        active.len(),
        achievement_candidates.len()
    );

    AggregateSummary {
        kpis: kpis(active, patient),
        achievement: achievement.dataset,
        intervention: intervention.dataset,
        review: review.dataset,
        averages,
        top_practice,
    }
}
