//! Bookstore inventory server
//!
//! A REST JSON API for managing a bookstore's book inventory: create, read,
//! partially update, delete and search books backed by PostgreSQL.

use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let base_path = state.config.server.base_path.trim_matches('/').to_string();
    let routes = api::routes().with_state(state);
    let app = if base_path.is_empty() {
        routes
    } else {
        Router::new().nest(&format!("/{}", base_path), routes)
    };

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    app.merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
