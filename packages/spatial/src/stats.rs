//! Shared numeric helpers.
//!
//! [`mean`] is the single averaging helper used across the engine. It
//! returns `None` for an empty input rather than 0, so "no value" and
//! "average of nothing" can never be confused at a call site.

use care_map_practice_models::Coordinate;

/// Arithmetic mean of a slice, `None` when the slice is empty.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    Some(values.iter().sum::<f64>() / count)
}

/// Arithmetic-mean centre of a set of coordinates, `None` when empty.
#[must_use]
pub fn centroid(coordinates: &[Coordinate]) -> Option<Coordinate> {
    let lats: Vec<f64> = coordinates.iter().map(|c| c.lat).collect();
    let lngs: Vec<f64> = coordinates.iter().map(|c| c.lng).collect();
    Some(Coordinate {
        lat: mean(&lats)?,
        lng: mean(&lngs)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[4.6, 4.2]), Some(4.4));
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_of_single_value() {
        assert_eq!(mean(&[3.0]), Some(3.0));
    }

    #[test]
    fn centroid_averages_each_axis() {
        let centre = centroid(&[
            Coordinate { lat: 51.0, lng: -0.2 },
            Coordinate { lat: 53.0, lng: 0.0 },
        ])
        .unwrap();
        assert!((centre.lat - 52.0).abs() < 1e-9);
        assert!((centre.lng - -0.1).abs() < 1e-9);
    }

    #[test]
    fn centroid_of_empty_is_none() {
        assert!(centroid(&[]).is_none());
    }
}
