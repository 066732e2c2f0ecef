//! HTTP surface: routing, auth middleware and request/response mapping.

pub mod auth;
pub mod contact;
pub mod cors;
pub mod experiences;
pub mod extract;
pub mod projects;
pub mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::config::toml_config::ServerConfig;
use crate::utils::error::PortfolioError;

pub use state::{AppState, Store};

/// Assembles the full `/api` router. Write routes sit behind the admin token check.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let public = Router::new()
        .route("/api/test", get(test))
        .route("/api/health", get(health))
        .route("/api/login", post(auth::login))
        .route("/api/projects", get(projects::list))
        .route("/api/projects/{id}", get(projects::get))
        .route("/api/experiences", get(experiences::list))
        .route("/api/experiences/{id}", get(experiences::get))
        .route("/api/contact", post(contact::send));

    let admin = Router::new()
        .route("/api/projects", post(projects::create))
        .route(
            "/api/projects/{id}",
            put(projects::update).delete(projects::delete),
        )
        .route("/api/experiences", post(experiences::create))
        .route(
            "/api/experiences/{id}",
            put(experiences::update).delete(experiences::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let origins = cors::AllowedOrigins::from_config(config);

    public
        .merge(admin)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(middleware::from_fn_with_state(
            origins.clone(),
            cors::reject_foreign_origin,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(&origins))
        .with_state(state)
}

async fn test() -> Json<Value> {
    Json(json!({ "message": "Hello from the backend server!" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> PortfolioError {
    PortfolioError::NotFound { resource: "Route" }
}
