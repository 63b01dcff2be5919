//! Marker view-models for the map widget.
//!
//! The engine does not render the map; it prepares one marker per active
//! practice (tone from the rating band, radius from the register size)
//! for whatever widget draws them. Rendering markers before the layer is
//! initialized is a sequencing bug in the caller, not a data condition,
//! and fails fast.

use care_map_practice_models::Coordinate;
use care_map_spatial::RankedPractice;

/// Most markers a single render pass will emit.
const MAX_MARKERS: usize = 300;

/// Base marker radius in pixels.
const BASE_RADIUS: f64 = 7.0;

/// Cap on the register-driven radius boost.
const MAX_REGISTER_BOOST: f64 = 13.0;

/// Rating band a marker is tinted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTone {
    /// Rating 4.5 and above.
    High,
    /// Rating 4.0 to 4.5, or no rating.
    Medium,
    /// Rating below 4.0.
    Low,
}

impl MarkerTone {
    /// Hex colour for this band.
    #[must_use]
    pub const fn colour(self) -> &'static str {
        match self {
            Self::High => "#2a9d8f",
            Self::Medium => "#f4a261",
            Self::Low => "#e76f51",
        }
    }

    fn for_rating(rating: Option<f64>) -> Self {
        match rating {
            None => Self::Medium,
            Some(r) if r >= 4.5 => Self::High,
            Some(r) if r >= 4.0 => Self::Medium,
            Some(_) => Self::Low,
        }
    }
}

/// One map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Practice id the marker points at.
    pub id: String,
    /// Marker position.
    pub position: Coordinate,
    /// Rating band tint.
    pub tone: MarkerTone,
    /// Circle radius in pixels.
    pub radius: f64,
}

/// Marker layer that must be initialized before rendering.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    initialised: bool,
}

impl MarkerLayer {
    /// A fresh, uninitialized layer.
    #[must_use]
    pub const fn new() -> Self {
        Self { initialised: false }
    }

    /// Marks the layer ready. Idempotent.
    pub const fn init(&mut self) {
        self.initialised = true;
    }

    /// Whether [`init`](Self::init) has run.
    #[must_use]
    pub const fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Builds markers for the target set, capped at the layer's display
    /// limit.
    ///
    /// # Panics
    ///
    /// Panics if the layer has not been initialized; calling render
    /// first is a programming-sequence error.
    #[must_use]
    pub fn render(&self, targets: &[RankedPractice]) -> Vec<Marker> {
        assert!(self.initialised, "map is not initialised");
        targets
            .iter()
            .take(MAX_MARKERS)
            .map(|ranked| {
                let practice = &ranked.practice;
                Marker {
                    id: practice.id.clone(),
                    position: practice.coordinates,
                    tone: MarkerTone::for_rating(practice.rating),
                    radius: BASE_RADIUS + register_boost(practice.register),
                }
            })
            .collect()
    }
}

/// Register-size contribution to the marker radius.
#[allow(clippy::cast_precision_loss)]
fn register_boost(register: Option<i64>) -> f64 {
    register
        .filter(|count| *count > 0)
        .map_or(0.0, |count| MAX_REGISTER_BOOST.min((count as f64).sqrt() / 10.0))
}
