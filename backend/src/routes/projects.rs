//! Project and sharing routes

use super::rpc::rpc;
use crate::pipeline::Pipeline;
use crate::services::{ProjectService, ProjectUserService};
use crate::state::AppState;
use axum::Router;

pub fn project_routes(pipeline: &Pipeline) -> Router<AppState> {
    Router::new()
        .route("/create", rpc(pipeline.authenticated(ProjectService::create)))
        .route("/update", rpc(pipeline.authenticated(ProjectService::update)))
        .route("/delete", rpc(pipeline.authenticated(ProjectService::delete)))
}

/// Membership routes, mounted under `/projects-users`
pub fn project_user_routes(pipeline: &Pipeline) -> Router<AppState> {
    Router::new()
        .route(
            "/create",
            rpc(pipeline.authenticated(ProjectUserService::create)),
        )
        .route(
            "/delete",
            rpc(pipeline.authenticated(ProjectUserService::delete)),
        )
}
