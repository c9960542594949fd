//! # GangaWatch Dashboard
//!
//! Browser dashboard for pre-computed river water quality forecasts. A user
//! picks a city, a disturbance scenario and a parameter; the page shows the
//! matching forecast table and charts if the offline forecasting job produced
//! them, and a warning for each one it did not.
//!
//! ## Endpoints
//!
//! - `GET /` - Dashboard page (`city`, `scenario`, `parameter` query values)
//! - `GET /charts/{kind}` - Chart image, `kind` is `forecast` or `predictions`
//! - `GET /api/catalog` - Cities and scenarios
//! - `GET /api/forecast` - Availability and forecast table as JSON
//! - `GET /health` - Liveness

pub mod artifacts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod forecast;
pub mod handlers;
pub mod page;

use axum::{http::Method, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::artifacts::ArtifactStore;
use crate::config::Config;

pub use crate::catalog::{Scenario, Selection};
pub use crate::error::AppError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: ArtifactStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = ArtifactStore::new(config.data_root.clone());
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Dashboard
        .route("/", get(handlers::dashboard))
        .route("/charts/{kind}", get(handlers::chart))
        // JSON API
        .route("/api/catalog", get(handlers::get_catalog))
        .route("/api/forecast", get(handlers::get_forecast))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
