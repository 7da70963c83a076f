//! Route definitions for the APIBoy API
//!
//! Operations are mounted RPC style under `/api/v1/<group>/<operation>`,
//! each one an endpoint built by the request pipeline.

use crate::error::ApiError;
use crate::pipeline::Pipeline;
use crate::state::AppState;
use axum::{
    http::{header, HeaderMap, Method, Uri, Version},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod collections;
mod health;
mod projects;
mod rpc;
mod users;


pub use auth::auth_routes;
pub use collections::{environment_routes, folder_routes, request_routes};
pub use projects::{project_routes, project_user_routes};
pub use rpc::rpc;
pub use users::user_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let pipeline = Pipeline::new(state.clone());

    Router::new()
        .route("/", get(request_metadata))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes(&pipeline))
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes(pipeline: &Pipeline) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes(pipeline))
        .nest("/users", user_routes(pipeline))
        .nest("/projects", project_routes(pipeline))
        .nest("/projects-users", project_user_routes(pipeline))
        .nest("/folders", folder_routes(pipeline))
        .nest("/requests", request_routes(pipeline))
        .nest("/environments", environment_routes(pipeline))
}

/// What the server saw of the incoming request
#[derive(Debug, Serialize)]
pub struct RequestMetadata {
    pub path: String,
    pub method: String,
    pub protocol: String,
    pub host: Option<String>,
}

async fn request_metadata(
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
) -> Json<RequestMetadata> {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    Json(RequestMetadata {
        path: uri.path().to_string(),
        method: method.to_string(),
        protocol: format!("{:?}", version),
        host,
    })
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route")
}
