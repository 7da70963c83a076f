//! Business logic services
//!
//! One service per resource. Every operation has the shape
//! `(AppState, RequestContext, Input) -> ApiResult<Output>` so it can be
//! mounted on the request pipeline; authenticated operations read the caller
//! from the context.

pub mod auth;
pub mod environments;
pub mod folders;
pub mod project_users;
pub mod projects;
pub mod requests;
pub mod users;

pub use auth::AuthService;
pub use environments::EnvironmentService;
pub use folders::FolderService;
pub use project_users::ProjectUserService;
pub use projects::ProjectService;
pub use requests::RequestService;
pub use users::UserService;

use crate::error::ApiError;

/// `map_err` adapter wrapping a failure as `Internal` with operator context
pub(crate) fn fail<E>(context: impl Into<String>) -> impl FnOnce(E) -> ApiError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let context = context.into();
    move |err| ApiError::internal(context, err)
}

/// Trimmed value, or `None` when blank
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
