pub mod card;
pub mod identity;
pub mod payment;

pub use identity::{IdentityError, IdentityProvider, MockDirectory, UserProfile};
pub use payment::{PaymentGateway, PaymentRecord, PaymentStatus, SimulatedGateway};
