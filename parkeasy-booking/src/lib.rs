pub mod manager;
pub mod models;
pub mod pass;

pub use manager::{BookingError, BookingManager};
pub use models::{Booking, BookingStatus, PaymentState, VehicleInfo};
pub use pass::{ParkingPass, PassService};
