use async_trait::async_trait;
use parkeasy_catalog::repository::SpotRepository;
use parkeasy_catalog::spot::ParkingSpot;
use std::sync::RwLock;
use uuid::Uuid;

use crate::seed;

/// In-memory spot catalog. Insertion order is preserved so the filter
/// engine's "input order" is stable across requests.
pub struct InMemorySpotRepository {
    spots: RwLock<Vec<ParkingSpot>>,
}

impl InMemorySpotRepository {
    pub fn with_spots(spots: Vec<ParkingSpot>) -> Self {
        Self {
            spots: RwLock::new(spots),
        }
    }

    pub fn seeded() -> Self {
        Self::with_spots(seed::seed_spots())
    }
}

#[async_trait]
impl SpotRepository for InMemorySpotRepository {
    async fn list_spots(
        &self,
    ) -> Result<Vec<ParkingSpot>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.spots.read().expect("spot lock poisoned").clone())
    }

    async fn get_spot(
        &self,
        id: Uuid,
    ) -> Result<Option<ParkingSpot>, Box<dyn std::error::Error + Send + Sync>> {
        let spots = self.spots.read().expect("spot lock poisoned");
        Ok(spots.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_spot(
        &self,
        spot: ParkingSpot,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!(spot_id = %spot.id, name = %spot.name, "Spot listed");
        // New listings surface at the front, like the app's provider flow
        self.spots.write().expect("spot lock poisoned").insert(0, spot);
        Ok(())
    }

    async fn set_available_slots(
        &self,
        id: Uuid,
        available_slots: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut spots = self.spots.write().expect("spot lock poisoned");
        if let Some(spot) = spots.iter_mut().find(|s| s.id == id) {
            spot.available_slots = available_slots;
            spot.available = available_slots > 0;
        }
        Ok(())
    }
}
