use serde::{Deserialize, Serialize};

use crate::spot::{LocationType, ParkingSpot, ParkingType, PriceUnit};

/// User-selected constraints for narrowing the spot list. Every field has an
/// inactive sentinel (None, empty set, false, 0.0); an inactive criterion is
/// skipped entirely, so a default-constructed value filters nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Inclusive [min, max] band on the listed price
    pub price_range: Option<(f64, f64)>,
    pub max_distance_km: Option<f64>,
    /// All-of amenity tags, substring-matched case-insensitively against the
    /// spot's feature list
    pub amenities: Vec<String>,
    pub available_only: bool,
    /// 0.0 means no rating floor
    pub min_rating: f64,
    /// Case-insensitive substring of the spot address
    pub location: Option<String>,
    pub location_type: Option<LocationType>,
    pub price_unit: Option<PriceUnit>,
    pub parking_type: Option<ParkingType>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            price_range: None,
            max_distance_km: None,
            amenities: Vec::new(),
            available_only: false,
            min_rating: 0.0,
            location: None,
            location_type: None,
            price_unit: None,
            parking_type: None,
        }
    }
}

impl FilterCriteria {
    /// The storefront's initial filter state: 0-5000 price band, 10 km
    /// radius, available spots only, no rating floor.
    pub fn storefront_defaults() -> Self {
        Self {
            price_range: Some((0.0, 5000.0)),
            max_distance_km: Some(10.0),
            available_only: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterPolicy {
    /// When set, a parking-type criterion decides inclusion on its own at the
    /// point it is evaluated: the classification verdict is returned directly
    /// and the amenity criterion (evaluated after it) is skipped. Off, the
    /// verdict is ANDed with every other active criterion.
    pub legacy_parking_type_short_circuit: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            legacy_parking_type_short_circuit: false,
        }
    }
}

/// Applies a [`FilterCriteria`] to a candidate set of spots. Stateless; the
/// policy only selects between the two parking-type behaviors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine {
    policy: FilterPolicy,
}

impl FilterEngine {
    pub fn new(policy: FilterPolicy) -> Self {
        Self { policy }
    }

    /// The ordered subsequence of `spots` satisfying every active criterion.
    /// Relative order is preserved; the result is never null, may be empty.
    pub fn apply(&self, spots: &[ParkingSpot], criteria: &FilterCriteria) -> Vec<ParkingSpot> {
        spots
            .iter()
            .filter(|spot| self.matches(spot, criteria))
            .cloned()
            .collect()
    }

    /// Conjunction over the active criteria, short-circuiting on the first
    /// failure. Evaluation order matters only for the legacy parking-type
    /// policy, which returns its verdict mid-sequence.
    pub fn matches(&self, spot: &ParkingSpot, criteria: &FilterCriteria) -> bool {
        if let Some((min, max)) = criteria.price_range {
            if spot.price < min || spot.price > max {
                return false;
            }
        }

        // Spots without a distance value are never excluded by this criterion
        if let (Some(distance), Some(max_km)) = (spot.distance_km, criteria.max_distance_km) {
            if distance > max_km {
                return false;
            }
        }

        if criteria.available_only && !spot.available {
            return false;
        }

        if criteria.min_rating > 0.0 && spot.rating < criteria.min_rating {
            return false;
        }

        if let Some(needle) = &criteria.location {
            if !spot
                .address
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }

        if let Some(location_type) = criteria.location_type {
            if spot.location_type != Some(location_type) {
                return false;
            }
        }

        if let Some(unit) = criteria.price_unit {
            if spot.price_unit != unit {
                return false;
            }
        }

        if let Some(wanted) = criteria.parking_type {
            let classified = spot.classification() == Some(wanted);
            if self.policy.legacy_parking_type_short_circuit {
                // Verdict is final here; the amenity criterion below never runs
                return classified;
            }
            if !classified {
                return false;
            }
        }

        if !criteria.amenities.is_empty() {
            let has_all = criteria.amenities.iter().all(|amenity| {
                let amenity = amenity.to_lowercase();
                spot.features
                    .iter()
                    .any(|feature| feature.to_lowercase().contains(&amenity))
            });
            if !has_all {
                return false;
            }
        }

        true
    }
}
