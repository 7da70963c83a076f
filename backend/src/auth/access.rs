//! Authorization rules
//!
//! Two rules cover every resource: project resources require a membership,
//! accounts require being the account holder or an admin. Callers check that
//! the resource exists before asking.

use crate::error::{ApiError, ApiResult};
use crate::repositories::ProjectUserRepository;
use crate::store::DocumentStore;
use apiboy_shared::UserRole;

pub struct AccessControl;

impl AccessControl {
    /// Allow when `user_id` is a member of `project_id`
    pub async fn check_project_access(
        store: &dyn DocumentStore,
        user_id: &str,
        project_id: &str,
    ) -> ApiResult<()> {
        let membership = ProjectUserRepository::find(store, project_id, user_id)
            .await
            .map_err(|e| {
                ApiError::internal(
                    format!("Could not get membership of {} in {}", user_id, project_id),
                    e,
                )
            })?;

        match membership {
            Some(_) => Ok(()),
            None => Err(ApiError::Unauthorized(format!(
                "{} is not a member of {}",
                user_id, project_id
            ))),
        }
    }

    /// Allow the account holder, or any caller with an elevated role
    pub fn check_account_access(
        caller_id: &str,
        caller_role: UserRole,
        target_user_id: &str,
    ) -> ApiResult<()> {
        if caller_id == target_user_id || caller_role.is_elevated() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(format!(
                "{} may not act on account {}",
                caller_id, target_user_id
            )))
        }
    }
}
