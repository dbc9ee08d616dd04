pub mod app_config;
pub mod recent;
pub mod seed;
pub mod spot_repo;
pub mod user_repo;

pub use recent::{RecentSearch, RecentSearches};
pub use spot_repo::InMemorySpotRepository;
pub use user_repo::{InMemoryUserStore, UserAccount, UserStoreError};
