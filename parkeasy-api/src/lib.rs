use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod error;
pub mod events;
pub mod middleware;
pub mod payments;
pub mod quotes;
pub mod spots;
pub mod state;
pub mod users;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let public = Router::new()
        .merge(auth::routes())
        .merge(spots::public_routes())
        .merge(quotes::routes())
        .merge(events::routes());

    let protected = Router::new()
        .merge(spots::protected_routes())
        .merge(bookings::routes())
        .merge(payments::routes())
        .merge(users::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::customer_auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
