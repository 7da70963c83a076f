//! Project sharing service
//!
//! Sharing is pull-based: a member hands out the project id and their own
//! user id, and the recipient joins by presenting both.

use super::{fail, ProjectService};
use crate::auth::AccessControl;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::RequestContext;
use crate::repositories::ProjectUserRepository;
use crate::state::AppState;
use apiboy_shared::{CreateProjectUserInput, DeleteProjectUserInput, EmptyOutput, ProjectUserOutput};
use tracing::info;

pub struct ProjectUserService;

impl ProjectUserService {
    /// Join a project shared by one of its members
    pub async fn create(
        state: AppState,
        ctx: RequestContext,
        input: CreateProjectUserInput,
    ) -> ApiResult<ProjectUserOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let project = ProjectService::find(store, &input.project_id).await?;
        AccessControl::check_project_access(store, &input.shared_by_user_id, &project.id).await?;

        let existing = ProjectUserRepository::find(store, &project.id, &identity.user_id)
            .await
            .map_err(fail(format!("Could not get membership in {}", project.id)))?;
        let project_user = match existing {
            Some(project_user) => project_user,
            None => {
                let created = ProjectUserRepository::create(store, &project.id, &identity.user_id)
                    .await
                    .map_err(fail(format!("Could not create membership in {}", project.id)))?;
                info!(
                    project_id = %project.id,
                    user_id = %identity.user_id,
                    shared_by = %input.shared_by_user_id,
                    "Project shared"
                );
                created
            }
        };

        Ok(ProjectUserOutput { project_user })
    }

    /// Revoke a user's membership; the caller must be a member
    pub async fn delete(
        state: AppState,
        ctx: RequestContext,
        input: DeleteProjectUserInput,
    ) -> ApiResult<EmptyOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let project = ProjectService::find(store, &input.project_id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &project.id).await?;

        let membership = ProjectUserRepository::find(store, &project.id, &input.user_id)
            .await
            .map_err(fail(format!("Could not get membership in {}", project.id)))?;
        if membership.is_none() {
            return Err(ApiError::Unauthorized(format!(
                "{} is not a member of {}",
                input.user_id, project.id
            )));
        }

        ProjectUserRepository::delete(store, &project.id, &input.user_id)
            .await
            .map_err(fail(format!("Could not delete membership in {}", project.id)))?;

        info!(project_id = %project.id, user_id = %input.user_id, "Project access revoked");
        Ok(EmptyOutput {})
    }
}
