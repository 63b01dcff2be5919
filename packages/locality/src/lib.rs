#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Locality resolution: free-text postcode to centre coordinate.
//!
//! Resolution follows a strict precedence chain, each step an explicit
//! candidate strategy tried in order:
//!
//! 1. exact match in the curated sample-locality table;
//! 2. practices indexed at that exact postcode (centre synthesized from
//!    their mean coordinate);
//! 3. no match: the caller keeps the default centre under a "no data"
//!    label.
//!
//! Empty input short-circuits to the default area, which is itself
//! resolved through the same chain for the patient's home postcode.

mod index;

pub use index::PracticeIndex;

use care_map_practice_models::{Coordinate, Practice};
use serde::{Deserialize, Serialize};

/// Centre used when nothing at all can be resolved (central London).
pub const FALLBACK_CENTRE: Coordinate = Coordinate {
    lat: 51.509865,
    lng: -0.118092,
};

/// Label shown with [`FALLBACK_CENTRE`] when even the sample table is
/// empty.
const FALLBACK_LABEL: &str = "United Kingdom overview";

/// A curated sample locality: a town-level label with a precise centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleLocality {
    /// Canonical display postcode (e.g. "EC1A 1BB").
    pub postcode: String,
    /// Town-level display label (e.g. "Barbican, London").
    pub label: String,
    /// Precise centre.
    pub coordinates: Coordinate,
}

/// A resolved locality: what the map and the summary header render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    /// Display label.
    pub label: String,
    /// Centre coordinate.
    pub centre: Coordinate,
    /// Canonical display postcode to echo into the input, when known.
    pub display_postcode: Option<String>,
}

/// Which strategy in the precedence chain produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// Exact match in the sample-locality table.
    Sample,
    /// Synthesized from practices sharing the exact postcode.
    Practices,
    /// Nothing matched; the area is the default with a "no data" label.
    NotFound,
    /// Empty input resolved to the default area.
    Default,
}

/// Outcome of resolving one postcode submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The area to display.
    pub area: Area,
    /// Which strategy matched.
    pub kind: ResolutionKind,
    /// Postcode to write back into the input field, if the resolution
    /// canonicalizes it. `None` leaves the user's text untouched.
    pub echo_postcode: Option<String>,
}

/// Insertion-ordered sample-locality table with normalized-key lookup.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    entries: Vec<SampleLocality>,
}

impl SampleTable {
    /// Builds the table, preserving entry order. The first entry doubles
    /// as the last-resort default locality.
    #[must_use]
    pub fn new(entries: Vec<SampleLocality>) -> Self {
        Self { entries }
    }

    /// Looks up a sample locality by normalized postcode key.
    #[must_use]
    pub fn get(&self, normalized_key: &str) -> Option<&SampleLocality> {
        self.entries
            .iter()
            .find(|entry| care_map_postcode::normalize(&entry.postcode) == normalized_key)
    }

    /// First entry in insertion order.
    #[must_use]
    pub fn first(&self) -> Option<&SampleLocality> {
        self.entries.first()
    }
}

/// Resolves normalized postcode keys to areas.
pub struct AreaResolver {
    samples: SampleTable,
    index: PracticeIndex,
    default_area: Area,
    home_key: String,
}

impl AreaResolver {
    /// Builds a resolver and precomputes the default area for the
    /// patient's home postcode.
    #[must_use]
    pub fn new(samples: SampleTable, index: PracticeIndex, home_postcode: &str) -> Self {
        let home_key = care_map_postcode::normalize(home_postcode);
        let default_area = Self::resolve_default(&samples, &index, &home_key, home_postcode);
        log::info!(
            "default area \"{}\" at {:.4},{:.4}",
            default_area.label,
            default_area.centre.lat,
            default_area.centre.lng
        );
        Self {
            samples,
            index,
            default_area,
            home_key,
        }
    }

    /// The precomputed default area (home postcode, else first sample
    /// entry, else the fixed fallback centre).
    #[must_use]
    pub const fn default_area(&self) -> &Area {
        &self.default_area
    }

    /// Normalized home-postcode key, used for default weather resolution.
    #[must_use]
    pub fn home_key(&self) -> &str {
        &self.home_key
    }

    /// Resolves a normalized postcode key through the precedence chain.
    #[must_use]
    pub fn resolve(&self, normalized_key: &str) -> Resolved {
        if normalized_key.is_empty() {
            return Resolved {
                area: self.default_area.clone(),
                kind: ResolutionKind::Default,
                echo_postcode: Some(care_map_postcode::format(&self.home_key)),
            };
        }

        if let Some(sample) = self.samples.get(normalized_key) {
            return Resolved {
                area: sample_area(sample),
                kind: ResolutionKind::Sample,
                echo_postcode: Some(care_map_postcode::format(normalized_key)),
            };
        }

        if let Some(practices) = self.index.get(normalized_key) {
            if let Some(area) = area_from_practices(practices, normalized_key) {
                let echo = area.display_postcode.clone();
                return Resolved {
                    area,
                    kind: ResolutionKind::Practices,
                    echo_postcode: echo,
                };
            }
        }

        log::debug!("no locality match for key {normalized_key}");
        Resolved {
            area: Area {
                label: format!(
                    "No GP data found for {}",
                    care_map_postcode::format(normalized_key)
                ),
                centre: self.default_area.centre,
                display_postcode: None,
            },
            kind: ResolutionKind::NotFound,
            echo_postcode: None,
        }
    }

    fn resolve_default(
        samples: &SampleTable,
        index: &PracticeIndex,
        home_key: &str,
        home_postcode: &str,
    ) -> Area {
        if let Some(sample) = samples.get(home_key) {
            return sample_area(sample);
        }
        if let Some(practices) = index.get(home_key) {
            if let Some(area) = area_from_practices(practices, home_postcode) {
                return area;
            }
        }
        if let Some(first) = samples.first() {
            return sample_area(first);
        }
        Area {
            label: FALLBACK_LABEL.to_string(),
            centre: FALLBACK_CENTRE,
            display_postcode: None,
        }
    }
}

fn sample_area(sample: &SampleLocality) -> Area {
    Area {
        label: sample.label.clone(),
        centre: sample.coordinates,
        display_postcode: Some(care_map_postcode::format(&sample.postcode)),
    }
}

/// Synthesizes an area from the practices sharing one exact postcode:
/// centre is their mean coordinate, display postcode is the first
/// practice's recorded postcode (or the formatted input when absent),
/// label is `"{postcode} · {N} GP"`.
#[must_use]
pub fn area_from_practices(practices: &[Practice], raw_postcode: &str) -> Option<Area> {
    let coordinates: Vec<_> = practices.iter().map(|p| p.coordinates).collect();
    let centre = care_map_spatial::stats::centroid(&coordinates)?;
    let postcode = practices
        .first()
        .and_then(|p| p.postcode.clone())
        .unwrap_or_else(|| care_map_postcode::format(raw_postcode));
    Some(Area {
        label: format!("{postcode} · {} GP", practices.len()),
        centre,
        display_postcode: Some(postcode),
    })
}
