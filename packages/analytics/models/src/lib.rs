#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation result types.
//!
//! Everything here is recomputed from the currently active practice
//! subset on every update cycle; none of these values are ever patched
//! incrementally. "No value" is always `None`, never 0: a KPI with no
//! contributing practices renders as a placeholder, not a zero.

use care_map_practice_models::ReferencePractice;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The clinical metrics a trend dataset can rank practices by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendMetric {
    /// QOF achievement percentage.
    Achievement,
    /// Intervention percentage.
    Intervention,
    /// Annual review percentage.
    Review,
}

impl TrendMetric {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Achievement, Self::Intervention, Self::Review]
    }
}

/// Headline KPI scalars for the active practice set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    /// Size of the active set.
    pub practice_count: usize,
    /// Mean of present ratings; `None` when no practice carries one.
    pub average_rating: Option<f64>,
    /// Mean of present intervention percentages, falling back to the
    /// patient reference average; `None` when neither exists.
    pub average_intervention: Option<f64>,
}

/// Top-7-by-metric chart feed: parallel label and value sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendDataset {
    /// Which metric this dataset ranks by.
    pub metric: TrendMetric,
    /// Practice display names (or a generic placeholder).
    pub labels: Vec<String>,
    /// Metric values rounded to 1 decimal, parallel to `labels`.
    pub values: Vec<f64>,
}

impl TrendDataset {
    /// An empty dataset for a metric.
    #[must_use]
    pub const fn empty(metric: TrendMetric) -> Self {
        Self {
            metric,
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Whether the dataset holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-metric averages for the summary panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryAverages {
    /// Mean achievement over the active set, else derived from the
    /// patient activity series.
    pub achievement: Option<f64>,
    /// Mean of the intervention trend values, else the patient reference
    /// average.
    pub intervention: Option<f64>,
    /// Mean of the review trend values, else the patient reference
    /// average.
    pub review: Option<f64>,
}

/// Everything the aggregator derives from one active practice set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    /// Headline KPI scalars.
    pub kpis: Kpis,
    /// Achievement trend dataset.
    pub achievement: TrendDataset,
    /// Intervention trend dataset.
    pub intervention: TrendDataset,
    /// Review trend dataset.
    pub review: TrendDataset,
    /// Summary-panel averages.
    pub averages: SummaryAverages,
    /// Winning practice for the banner; the patient's reference record
    /// when no practice qualifies.
    pub top_practice: Option<ReferencePractice>,
}
