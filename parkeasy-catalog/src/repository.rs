use async_trait::async_trait;
use uuid::Uuid;

use crate::spot::ParkingSpot;

/// Data-access seam for the spot catalog. The engine ships an in-memory
/// implementation seeded with mock data; a real deployment backs this with a
/// network or database fetch.
#[async_trait]
pub trait SpotRepository: Send + Sync {
    async fn list_spots(
        &self,
    ) -> Result<Vec<ParkingSpot>, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_spot(
        &self,
        id: Uuid,
    ) -> Result<Option<ParkingSpot>, Box<dyn std::error::Error + Send + Sync>>;

    async fn insert_spot(
        &self,
        spot: ParkingSpot,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Sync the catalog's availability counts after a booking-side change;
    /// the derived `available` flag follows the count.
    async fn set_available_slots(
        &self,
        id: Uuid,
        available_slots: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
