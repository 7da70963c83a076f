//! Folder, saved request and environment routes

use super::rpc::rpc;
use crate::pipeline::Pipeline;
use crate::services::{EnvironmentService, FolderService, RequestService};
use crate::state::AppState;
use axum::Router;

pub fn folder_routes(pipeline: &Pipeline) -> Router<AppState> {
    Router::new()
        .route("/create", rpc(pipeline.authenticated(FolderService::create)))
        .route("/update", rpc(pipeline.authenticated(FolderService::update)))
        .route("/delete", rpc(pipeline.authenticated(FolderService::delete)))
}

pub fn request_routes(pipeline: &Pipeline) -> Router<AppState> {
    Router::new()
        .route("/create", rpc(pipeline.authenticated(RequestService::create)))
        .route("/update", rpc(pipeline.authenticated(RequestService::update)))
        .route("/delete", rpc(pipeline.authenticated(RequestService::delete)))
        .route(
            "/duplicate",
            rpc(pipeline.authenticated(RequestService::duplicate)),
        )
}

pub fn environment_routes(pipeline: &Pipeline) -> Router<AppState> {
    Router::new()
        .route(
            "/create",
            rpc(pipeline.authenticated(EnvironmentService::create)),
        )
        .route(
            "/update",
            rpc(pipeline.authenticated(EnvironmentService::update)),
        )
        .route(
            "/delete",
            rpc(pipeline.authenticated(EnvironmentService::delete)),
        )
        .route(
            "/duplicate",
            rpc(pipeline.authenticated(EnvironmentService::duplicate)),
        )
}
