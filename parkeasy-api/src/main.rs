use std::net::SocketAddr;
use std::sync::Arc;

use parkeasy_api::{app, AppState};
use parkeasy_core::identity::MockDirectory;
use parkeasy_core::payment::SimulatedGateway;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parkeasy_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = parkeasy_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting ParkEasy API on port {}", config.server.port);

    let gateway = Arc::new(SimulatedGateway::new(
        config.business_rules.payment_success_rate,
    ));
    let identity = Arc::new(MockDirectory::with_demo_users());

    let app_state = AppState::new(
        &config,
        parkeasy_store::seed::seed_spots(),
        gateway,
        identity,
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
