use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing unit for a spot's listed rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceUnit {
    Hour,
    Day,
    Month,
}

impl PriceUnit {
    /// Parse the wire literal ("hour" | "day" | "month"). Anything else is
    /// an unrecognized unit and the caller decides the fallback.
    pub fn parse(unit: &str) -> Option<Self> {
        match unit {
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Commercial,
    Residential,
}

/// Marketplace classification: instant parking is short-term commercial,
/// lease parking is monthly residential.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParkingType {
    Instant,
    Lease,
}

/// A listed parking space. Reference data for the filter and pricing logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub price: f64,
    pub price_unit: PriceUnit,
    pub rating: f64,
    pub reviews: i32,
    /// Distance from the searching user, precomputed externally. Absent for
    /// listings with no location fix.
    pub distance_km: Option<f64>,
    /// Free-form amenity tags ("CCTV Surveillance", "EV Charging", ...)
    pub features: Vec<String>,
    pub location_type: Option<LocationType>,
    pub available: bool,
    pub total_slots: i32,
    pub available_slots: i32,
    pub is_popular: bool,
    pub owner_id: Option<String>,
}

impl ParkingSpot {
    /// instant ⇔ (hour | day) ∧ commercial; lease ⇔ month ∧ residential.
    /// A spot with an inconsistent combination classifies as neither and is
    /// excluded from both classifications by the filter.
    pub fn classification(&self) -> Option<ParkingType> {
        match (self.price_unit, self.location_type) {
            (PriceUnit::Hour | PriceUnit::Day, Some(LocationType::Commercial)) => {
                Some(ParkingType::Instant)
            }
            (PriceUnit::Month, Some(LocationType::Residential)) => Some(ParkingType::Lease),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(unit: PriceUnit, location_type: Option<LocationType>) -> ParkingSpot {
        ParkingSpot {
            id: Uuid::new_v4(),
            name: "Test Spot".to_string(),
            address: "Hitech City, Hyderabad".to_string(),
            description: None,
            images: vec![],
            price: 80.0,
            price_unit: unit,
            rating: 4.5,
            reviews: 12,
            distance_km: Some(1.2),
            features: vec!["CCTV Surveillance".to_string()],
            location_type,
            available: true,
            total_slots: 10,
            available_slots: 10,
            is_popular: false,
            owner_id: None,
        }
    }

    #[test]
    fn test_classification_invariant() {
        assert_eq!(
            spot(PriceUnit::Hour, Some(LocationType::Commercial)).classification(),
            Some(ParkingType::Instant)
        );
        assert_eq!(
            spot(PriceUnit::Day, Some(LocationType::Commercial)).classification(),
            Some(ParkingType::Instant)
        );
        assert_eq!(
            spot(PriceUnit::Month, Some(LocationType::Residential)).classification(),
            Some(ParkingType::Lease)
        );

        // Inconsistent combinations belong to neither classification
        assert_eq!(spot(PriceUnit::Month, Some(LocationType::Commercial)).classification(), None);
        assert_eq!(spot(PriceUnit::Hour, Some(LocationType::Residential)).classification(), None);
        assert_eq!(spot(PriceUnit::Hour, None).classification(), None);
    }

    #[test]
    fn test_spot_deserialization() {
        let json = r#"
            {
                "id": "7f0a1e1a-3b5e-4a4b-9d2e-111111111111",
                "name": "Downtown Secure Parking",
                "address": "Hitech City, Hyderabad",
                "description": null,
                "images": [],
                "price": 80.0,
                "price_unit": "hour",
                "rating": 4.5,
                "reviews": 124,
                "distance_km": 1.2,
                "features": ["CCTV Surveillance", "EV Charging"],
                "location_type": "commercial",
                "available": true,
                "total_slots": 24,
                "available_slots": 11,
                "is_popular": true,
                "owner_id": null
            }
        "#;
        let spot: ParkingSpot = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(spot.price_unit, PriceUnit::Hour);
        assert_eq!(spot.location_type, Some(LocationType::Commercial));
        assert_eq!(spot.classification(), Some(ParkingType::Instant));
    }
}
