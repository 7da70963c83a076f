//! User account service

use super::{fail, non_blank};
use crate::auth::{AccessControl, PasswordService};
use crate::error::{ApiError, ApiResult};
use crate::pipeline::RequestContext;
use crate::repositories::UserRepository;
use crate::state::AppState;
use crate::store::DocumentStore;
use apiboy_shared::{DeleteUserInput, Identity, UpdateUserInput, User, UserOutput};
use tracing::info;

/// User service for account management
pub struct UserService;

impl UserService {
    /// Update an account; blank fields keep their current value
    pub async fn update(
        state: AppState,
        ctx: RequestContext,
        input: UpdateUserInput,
    ) -> ApiResult<UserOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut user = Self::find_target(store, identity, input.id.as_deref()).await?;

        if let Some(name) = non_blank(input.name.as_deref()) {
            user.name = name.to_string();
        }

        if let Some(email) = non_blank(input.email.as_deref()) {
            if email != user.email {
                let taken = UserRepository::find_by_email(store, email)
                    .await
                    .map_err(fail("Could not get user"))?;
                if taken.is_some() {
                    return Err(ApiError::BadRequest("User already exists".to_string()));
                }
                user.email = email.to_string();
            }
        }

        if let Some(password) = non_blank(input.password.as_deref()) {
            user.password = PasswordService::hash_async(password.to_string())
                .await
                .map_err(fail("Could not hash password"))?;
        }

        UserRepository::update(store, &identity.user_id, &mut user)
            .await
            .map_err(fail(format!("Could not update user {}", user.id)))?;

        info!(user_id = %user.id, updated_by = %identity.user_id, "User updated");
        Ok(UserOutput { user: user.into() })
    }

    /// Soft-delete an account
    pub async fn delete(
        state: AppState,
        ctx: RequestContext,
        input: DeleteUserInput,
    ) -> ApiResult<UserOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut user = Self::find_target(store, identity, input.id.as_deref()).await?;

        UserRepository::soft_delete(store, &identity.user_id, &mut user)
            .await
            .map_err(fail(format!("Could not delete user {}", user.id)))?;

        info!(user_id = %user.id, deleted_by = %identity.user_id, "User deleted");
        Ok(UserOutput { user: user.into() })
    }

    /// The addressed account, defaulting to the caller's own, once it is
    /// known to exist and the caller may act on it
    async fn find_target(
        store: &dyn DocumentStore,
        caller: &Identity,
        id: Option<&str>,
    ) -> ApiResult<User> {
        let target_id = non_blank(id).unwrap_or(caller.user_id.as_str());

        let user = UserRepository::find_by_id(store, target_id)
            .await
            .map_err(fail(format!("Could not get user {}", target_id)))?
            .ok_or(ApiError::NotFound("User"))?;

        AccessControl::check_account_access(&caller.user_id, caller.role, &user.id)?;
        Ok(user)
    }
}
