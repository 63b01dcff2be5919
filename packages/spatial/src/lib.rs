#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Distance computation and the practice filter chain.
//!
//! Computes great-circle distances from a resolved centre to every
//! practice, retains those inside the configured radius, and applies the
//! secondary rating threshold with its any-results fallback. Every
//! distance figure is derived here on the fly; nothing is stored back on
//! the practice records.

pub mod stats;

use care_map_practice_models::{Coordinate, Practice};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres for the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres via the
/// haversine formula.
#[must_use]
pub fn haversine_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let r_lat1 = from.lat.to_radians();
    let r_lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + r_lat1.cos() * r_lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// A practice annotated with its derived distance from the current centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPractice {
    /// The underlying immutable practice record.
    #[serde(flatten)]
    pub practice: Practice,
    /// Distance from the resolved centre in kilometres.
    pub distance_km: f64,
}

/// Computes the within-distance set: every practice at most `radius_km`
/// from `centre` (inclusive boundary), sorted ascending by distance.
///
/// The sort is stable, so practices at identical distances keep their
/// input order.
#[must_use]
pub fn within_distance(
    practices: &[Practice],
    centre: &Coordinate,
    radius_km: f64,
) -> Vec<RankedPractice> {
    let mut ranked: Vec<RankedPractice> = practices
        .iter()
        .map(|practice| RankedPractice {
            practice: practice.clone(),
            distance_km: haversine_km(centre, &practice.coordinates),
        })
        .filter(|ranked| ranked.distance_km <= radius_km)
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    log::debug!(
        "{} of {} practices within {radius_km} km",
        ranked.len(),
        practices.len()
    );
    ranked
}

/// Filters the within-distance set to practices whose rating (absent
/// treated as 0) meets the minimum.
#[must_use]
pub fn filter_by_rating(within: &[RankedPractice], min_rating: f64) -> Vec<RankedPractice> {
    within
        .iter()
        .filter(|ranked| ranked.practice.rating.unwrap_or(0.0) >= min_rating)
        .cloned()
        .collect()
}

/// The shared active-set selection: the rating-filtered set, or the full
/// within-distance set when rating-filtering emptied it. The rating
/// threshold never produces a no-results state on its own; only an empty
/// within-distance set is a true empty state.
///
/// Every downstream consumer (list, map targets, aggregation) must use
/// this one selection so they cannot disagree.
#[must_use]
pub const fn select_active<'a>(
    filtered: &'a [RankedPractice],
    within: &'a [RankedPractice],
) -> &'a [RankedPractice] {
    if filtered.is_empty() { within } else { filtered }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn practice(id: &str, lat: f64, lng: f64, rating: Option<f64>) -> Practice {
        Practice {
            id: id.to_string(),
            name: Some(id.to_string()),
            practice_code: None,
            postcode: None,
            coordinates: Coordinate { lat, lng },
            rating,
            achievement_percent: None,
            prevalence_percent: None,
            intervention_percent: None,
            review_percent: None,
            register: None,
            list_size: None,
            pca_rate: None,
            is_nhs: true,
            phone: None,
        }
    }

    const BARBICAN: Coordinate = Coordinate {
        lat: 51.5202,
        lng: -0.0977,
    };

    #[test]
    fn haversine_matches_known_distance() {
        // Barbican to Westminster is roughly 3.3 km.
        let westminster = Coordinate {
            lat: 51.501,
            lng: -0.1416,
        };
        let distance = haversine_km(&BARBICAN, &westminster);
        assert!((distance - 3.7).abs() < 0.5, "got {distance}");
    }

    #[test]
    fn haversine_zero_for_same_point() {
        assert!(haversine_km(&BARBICAN, &BARBICAN).abs() < 1e-9);
    }

    #[test]
    fn within_distance_sorted_ascending_and_bounded() {
        let practices = vec![
            practice("far", 53.4808, -2.2374, None),
            practice("near", 51.5272, -0.0866, None),
            practice("nearer", 51.5202, -0.0977, None),
        ];
        let ranked = within_distance(&practices, &BARBICAN, 10.0);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].practice.id, "nearer");
        assert_eq!(ranked[1].practice.id, "near");
        assert!(ranked.iter().all(|r| r.distance_km <= 10.0));
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let practices = vec![practice("exact", 51.5202, -0.0977, None)];
        let ranked = within_distance(&practices, &BARBICAN, 0.0);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn rating_filter_treats_missing_as_zero() {
        let within = within_distance(
            &[
                practice("rated", 51.52, -0.097, Some(4.5)),
                practice("unrated", 51.521, -0.098, None),
            ],
            &BARBICAN,
            10.0,
        );

        let filtered = filter_by_rating(&within, 4.0);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].practice.id, "rated");

        // Threshold 0 keeps unrated practices.
        assert_eq!(filter_by_rating(&within, 0.0).len(), 2);
    }

    #[test]
    fn active_set_falls_back_to_within_distance() {
        let within = within_distance(
            &[
                practice("a", 51.52, -0.097, Some(4.1)),
                practice("b", 51.521, -0.098, Some(4.2)),
                practice("c", 51.522, -0.099, Some(4.3)),
            ],
            &BARBICAN,
            10.0,
        );
        let filtered = filter_by_rating(&within, 4.9);

        assert!(filtered.is_empty());
        let active = select_active(&filtered, &within);
        assert_eq!(active.len(), 3);
    }

    #[test]
    fn active_set_prefers_filtered_when_nonempty() {
        let within = within_distance(
            &[
                practice("a", 51.52, -0.097, Some(4.1)),
                practice("b", 51.521, -0.098, Some(4.8)),
            ],
            &BARBICAN,
            10.0,
        );
        let filtered = filter_by_rating(&within, 4.5);

        let active = select_active(&filtered, &within);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].practice.id, "b");
    }
}
