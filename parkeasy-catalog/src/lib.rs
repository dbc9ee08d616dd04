pub mod filter;
pub mod pricing;
pub mod repository;
pub mod slots;
pub mod spot;

pub use filter::{FilterCriteria, FilterEngine, FilterPolicy};
pub use pricing::{calculate_price, calculate_price_for_unit};
pub use repository::SpotRepository;
pub use slots::SlotTracker;
pub use spot::{LocationType, ParkingSpot, ParkingType, PriceUnit};
