//! Account routes

use super::rpc::rpc;
use crate::pipeline::Pipeline;
use crate::services::UserService;
use crate::state::AppState;
use axum::Router;

pub fn user_routes(pipeline: &Pipeline) -> Router<AppState> {
    Router::new()
        .route("/update", rpc(pipeline.authenticated(UserService::update)))
        .route("/delete", rpc(pipeline.authenticated(UserService::delete)))
}
