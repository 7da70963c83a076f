//! Authentication routes
//!
//! Signup, login and password reset are public; logout and `me` need a
//! live session.

use super::rpc::rpc;
use crate::pipeline::Pipeline;
use crate::services::AuthService;
use crate::state::AppState;
use axum::Router;

/// Create auth routes
pub fn auth_routes(pipeline: &Pipeline) -> Router<AppState> {
    Router::new()
        .route("/signup", rpc(pipeline.public(AuthService::signup)))
        .route("/login", rpc(pipeline.public(AuthService::login)))
        .route("/logout", rpc(pipeline.authenticated(AuthService::logout)))
        .route("/me", rpc(pipeline.authenticated(AuthService::me)))
        .route(
            "/reset-password",
            rpc(pipeline.public(AuthService::reset_password)),
        )
        .route(
            "/set-new-password",
            rpc(pipeline.public(AuthService::set_new_password)),
        )
}
