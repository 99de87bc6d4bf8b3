//! Rutas HTTP
//!
//! Handlers delgados que delegan en `HomepageController`.

pub mod homepage_routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Router completo de la aplicación con CORS y trazas
pub fn create_router(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .merge(homepage_routes::create_homepage_router())
        .nest("/admin", homepage_routes::create_admin_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
