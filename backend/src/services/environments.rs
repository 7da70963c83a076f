//! Environment service

use super::{fail, ProjectService};
use crate::auth::AccessControl;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::RequestContext;
use crate::repositories::EnvironmentRepository;
use crate::state::AppState;
use crate::store::DocumentStore;
use apiboy_shared::{
    CreateEnvironmentInput, Environment, EnvironmentOutput, IdInput, UpdateEnvironmentInput,
};

pub struct EnvironmentService;

impl EnvironmentService {
    pub async fn create(
        state: AppState,
        ctx: RequestContext,
        input: CreateEnvironmentInput,
    ) -> ApiResult<EnvironmentOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let project = ProjectService::find(store, &input.project_id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &project.id).await?;

        let mut environment = Environment {
            id: String::new(),
            name: input.name.trim().to_string(),
            variables: input.variables,
            project_id: project.id,
            created: None,
            updated: None,
            deleted: None,
        };
        EnvironmentRepository::create(store, &identity.user_id, &mut environment)
            .await
            .map_err(fail("Could not create environment"))?;

        Ok(EnvironmentOutput { environment })
    }

    pub async fn update(
        state: AppState,
        ctx: RequestContext,
        input: UpdateEnvironmentInput,
    ) -> ApiResult<EnvironmentOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut environment = Self::find(store, &input.id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &environment.project_id)
            .await?;

        environment.name = input.name.trim().to_string();
        environment.variables = input.variables;
        EnvironmentRepository::update(store, &identity.user_id, &mut environment)
            .await
            .map_err(fail(format!("Could not update environment {}", environment.id)))?;

        Ok(EnvironmentOutput { environment })
    }

    pub async fn delete(
        state: AppState,
        ctx: RequestContext,
        input: IdInput,
    ) -> ApiResult<EnvironmentOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut environment = Self::find(store, &input.id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &environment.project_id)
            .await?;

        EnvironmentRepository::soft_delete(store, &identity.user_id, &mut environment)
            .await
            .map_err(fail(format!("Could not delete environment {}", environment.id)))?;

        Ok(EnvironmentOutput { environment })
    }

    pub async fn duplicate(
        state: AppState,
        ctx: RequestContext,
        input: IdInput,
    ) -> ApiResult<EnvironmentOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let original = Self::find(store, &input.id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &original.project_id)
            .await?;

        let environment =
            EnvironmentRepository::duplicate(store, &identity.user_id, &original, |copy| {
                copy.name.push_str(" Copy")
            })
            .await
            .map_err(fail(format!("Could not duplicate environment {}", original.id)))?;

        Ok(EnvironmentOutput { environment })
    }

    async fn find(store: &dyn DocumentStore, id: &str) -> ApiResult<Environment> {
        EnvironmentRepository::find_by_id(store, id)
            .await
            .map_err(fail(format!("Could not get environment {}", id)))?
            .ok_or(ApiError::NotFound("Environment"))
    }
}
