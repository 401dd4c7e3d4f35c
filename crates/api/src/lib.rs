//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Tenant resolution for company-scoped requests
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod request;
pub mod routes;
pub mod tenant;

use axum::Router;
use iltizam_db::TenantRegistry;
use iltizam_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Master store: companies, users, currencies.
    pub master: Arc<DatabaseConnection>,
    /// Per-company tenant stores.
    pub tenants: Arc<TenantRegistry>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Username of the bootstrap administrator, which cannot be deleted.
    pub bootstrap_admin: Arc<str>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
