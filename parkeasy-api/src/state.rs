use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use parkeasy_booking::{BookingManager, PassService};
use parkeasy_catalog::filter::{FilterEngine, FilterPolicy};
use parkeasy_catalog::repository::SpotRepository;
use parkeasy_catalog::slots::SlotTracker;
use parkeasy_catalog::spot::ParkingSpot;
use parkeasy_core::identity::IdentityProvider;
use parkeasy_core::payment::PaymentGateway;
use parkeasy_offer::{QuoteBook, QuoteGenerator};
use parkeasy_shared::models::events::DomainEvent;
use parkeasy_store::app_config::{BusinessRules, Config};
use parkeasy_store::{InMemorySpotRepository, InMemoryUserStore, RecentSearches};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub spots: Arc<dyn SpotRepository>,
    pub users: Arc<InMemoryUserStore>,
    pub recent: Arc<RecentSearches>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub identity: Arc<dyn IdentityProvider>,
    pub bookings: Arc<Mutex<BookingManager>>,
    pub passes: Arc<Mutex<PassService>>,
    pub quotes: Arc<Mutex<QuoteBook>>,
    pub slots: Arc<Mutex<SlotTracker>>,
    pub quote_generator: Arc<QuoteGenerator>,
    pub filter_engine: FilterEngine,
    pub events_tx: broadcast::Sender<DomainEvent>,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

impl AppState {
    /// Wire up the in-memory engine around an initial catalog and the two
    /// injectable capabilities (gateway, identity). Tests pass deterministic
    /// implementations; the binary passes the simulated ones.
    pub fn new(
        config: &Config,
        catalog: Vec<ParkingSpot>,
        gateway: Arc<dyn PaymentGateway>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let filter_engine = FilterEngine::new(FilterPolicy {
            legacy_parking_type_short_circuit: config
                .business_rules
                .legacy_parking_type_short_circuit,
        });

        let mut slots = SlotTracker::new();
        for spot in &catalog {
            slots.initialize(spot.id, spot.total_slots, spot.available_slots);
        }

        let (events_tx, _) = broadcast::channel(100);

        Self {
            spots: Arc::new(InMemorySpotRepository::with_spots(catalog)),
            users: Arc::new(InMemoryUserStore::with_demo_accounts()),
            recent: Arc::new(RecentSearches::new(config.business_rules.recent_search_cap)),
            gateway,
            identity,
            bookings: Arc::new(Mutex::new(BookingManager::new())),
            passes: Arc::new(Mutex::new(PassService::new())),
            quotes: Arc::new(Mutex::new(QuoteBook::new())),
            slots: Arc::new(Mutex::new(slots)),
            quote_generator: Arc::new(QuoteGenerator::new(
                filter_engine,
                config.business_rules.quote_hold_seconds,
            )),
            filter_engine,
            events_tx,
            auth: AuthConfig {
                secret: config.auth.jwt_secret.clone(),
                expiration: config.auth.jwt_expiration_seconds,
            },
            business_rules: config.business_rules.clone(),
        }
    }
}
