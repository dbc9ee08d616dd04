use parkeasy_catalog::spot::{LocationType, ParkingSpot, PriceUnit};
use uuid::Uuid;

struct SeedSpot {
    name: &'static str,
    address: &'static str,
    description: &'static str,
    price: f64,
    price_unit: PriceUnit,
    rating: f64,
    reviews: i32,
    distance_km: Option<f64>,
    features: &'static [&'static str],
    location_type: LocationType,
    total_slots: i32,
    available_slots: i32,
    is_popular: bool,
}

/// The sandbox catalog: instant (hourly/daily commercial) lots and lease
/// (monthly residential) spaces around Hyderabad. A real deployment replaces
/// this with a catalog fetch.
pub fn seed_spots() -> Vec<ParkingSpot> {
    let seeds = [
        SeedSpot {
            name: "Downtown Secure Parking",
            address: "Hitech City, Hyderabad",
            description: "Covered multi-level parking with round-the-clock security staff.",
            price: 80.0,
            price_unit: PriceUnit::Hour,
            rating: 4.5,
            reviews: 124,
            distance_km: Some(1.2),
            features: &["CCTV Surveillance", "24/7 Security", "Covered Parking", "EV Charging"],
            location_type: LocationType::Commercial,
            total_slots: 24,
            available_slots: 11,
            is_popular: true,
        },
        SeedSpot {
            name: "Central Park Garage",
            address: "Banjara Hills, Hyderabad",
            description: "Basement garage under the Central Park mall, valet on request.",
            price: 60.0,
            price_unit: PriceUnit::Hour,
            rating: 4.2,
            reviews: 86,
            distance_km: Some(3.4),
            features: &["CCTV Surveillance", "Valet Service", "Covered Parking"],
            location_type: LocationType::Commercial,
            total_slots: 40,
            available_slots: 17,
            is_popular: false,
        },
        SeedSpot {
            name: "Riverside Parking Lot",
            address: "Jubilee Hills, Hyderabad",
            description: "Open-air lot next to the lakefront promenade.",
            price: 40.0,
            price_unit: PriceUnit::Hour,
            rating: 3.9,
            reviews: 41,
            distance_km: Some(5.1),
            features: &["Well Lit", "Security Guard"],
            location_type: LocationType::Commercial,
            total_slots: 60,
            available_slots: 48,
            is_popular: false,
        },
        SeedSpot {
            name: "Tech Park Basement",
            address: "Gachibowli, Hyderabad",
            description: "Reserved basement bays inside the DLF tech park.",
            price: 100.0,
            price_unit: PriceUnit::Hour,
            rating: 4.7,
            reviews: 203,
            distance_km: Some(7.8),
            features: &["CCTV Surveillance", "24/7 Security", "Covered Parking", "Car Wash"],
            location_type: LocationType::Commercial,
            total_slots: 120,
            available_slots: 0,
            is_popular: true,
        },
        SeedSpot {
            name: "Airport Long Stay",
            address: "Shamshabad, Hyderabad",
            description: "Daily-rate lot with shuttle service to the terminal.",
            price: 400.0,
            price_unit: PriceUnit::Day,
            rating: 4.1,
            reviews: 57,
            distance_km: Some(28.0),
            features: &["Shuttle Service", "CCTV Surveillance", "24/7 Security"],
            location_type: LocationType::Commercial,
            total_slots: 300,
            available_slots: 212,
            is_popular: false,
        },
        SeedSpot {
            name: "Green Meadows Residency",
            address: "Kondapur, Hyderabad",
            description: "Covered stilt parking in a gated residential community.",
            price: 3000.0,
            price_unit: PriceUnit::Month,
            rating: 4.4,
            reviews: 19,
            distance_km: Some(4.6),
            features: &["Gated Community", "Covered Parking", "Security Guard"],
            location_type: LocationType::Residential,
            total_slots: 6,
            available_slots: 2,
            is_popular: false,
        },
        SeedSpot {
            name: "Lakeview Apartments Basement",
            address: "Madhapur, Hyderabad",
            description: "Spare basement bay, monthly lease only.",
            price: 2500.0,
            price_unit: PriceUnit::Month,
            rating: 4.0,
            reviews: 8,
            distance_km: None,
            features: &["Covered Parking", "Power Backup"],
            location_type: LocationType::Residential,
            total_slots: 1,
            available_slots: 1,
            is_popular: false,
        },
    ];

    seeds
        .into_iter()
        .map(|seed| ParkingSpot {
            id: Uuid::new_v4(),
            name: seed.name.to_string(),
            address: seed.address.to_string(),
            description: Some(seed.description.to_string()),
            images: vec![],
            price: seed.price,
            price_unit: seed.price_unit,
            rating: seed.rating,
            reviews: seed.reviews,
            distance_km: seed.distance_km,
            features: seed.features.iter().map(|f| f.to_string()).collect(),
            location_type: Some(seed.location_type),
            available: seed.available_slots > 0,
            total_slots: seed.total_slots,
            available_slots: seed.available_slots,
            is_popular: seed.is_popular,
            owner_id: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkeasy_catalog::spot::ParkingType;

    #[test]
    fn test_seed_catalog_is_classifiable() {
        let spots = seed_spots();
        assert!(!spots.is_empty());

        // Every seeded spot belongs to exactly one classification
        for spot in &spots {
            assert!(spot.classification().is_some(), "{} unclassified", spot.name);
        }
        assert!(spots
            .iter()
            .any(|s| s.classification() == Some(ParkingType::Instant)));
        assert!(spots
            .iter()
            .any(|s| s.classification() == Some(ParkingType::Lease)));
    }

    #[test]
    fn test_availability_flag_follows_slots() {
        for spot in seed_spots() {
            assert_eq!(spot.available, spot.available_slots > 0);
        }
    }
}
