//! Route definitions for the LicenseHub HTTP API.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::ApiErrorResponse;
use crate::handlers;
use crate::middleware::cors::{allow_origin_header, build_cors_layer};
use crate::state::AppState;

/// Build the router with all routes, threading `AppState` through
/// every handler.
///
/// The CORS layer is a route layer: it answers OPTIONS on known paths and
/// decorates their responses, while unknown paths (OPTIONS included) fall
/// through to the JSON 404.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(license_routes())
        .merge(health_routes())
        .route_layer(cors)
        .fallback(route_not_found)
        .with_state(state)
}

/// Verify, activate and deactivate. POST only; OPTIONS is answered by the
/// CORS layer.
fn license_routes() -> Router<AppState> {
    Router::new()
        .route("/verify", post(handlers::license::verify))
        .route("/activate", post(handlers::license::activate))
        .route("/deactivate", post(handlers::license::deactivate))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

async fn route_not_found(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut response = (
        StatusCode::NOT_FOUND,
        Json(ApiErrorResponse::new("NOT_FOUND", "Route not found")),
    )
        .into_response();

    if let Some(origin) =
        allow_origin_header(&state.config.server.cors, headers.get(header::ORIGIN))
    {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    response
}
