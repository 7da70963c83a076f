//! Project service

use super::fail;
use crate::auth::AccessControl;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::RequestContext;
use crate::repositories::{
    FolderRepository, ProjectRepository, ProjectUserRepository, RequestRepository,
};
use crate::state::AppState;
use crate::store::DocumentStore;
use apiboy_shared::{
    CreateProjectInput, Folder, IdInput, Project, ProjectOutput, Request, RequestType,
    UpdateProjectInput,
};
use std::collections::HashMap;
use tracing::info;

const EXAMPLE_PROJECT_NAME: &str = "Example Project";
const EXAMPLE_FOLDER_NAME: &str = "Test Folder";
const EXAMPLE_REQUEST_NAME: &str = "Test Request";
const EXAMPLE_REQUEST_URL: &str = "https://httpbin.org/anything";
const EXAMPLE_REQUEST_BODY: &str = "{\n  \"key1\": \"value1\",\n  \"key2\": \"value2\"\n}";

pub struct ProjectService;

impl ProjectService {
    pub async fn create(
        state: AppState,
        ctx: RequestContext,
        input: CreateProjectInput,
    ) -> ApiResult<ProjectOutput> {
        let identity = ctx.identity()?;
        let project = Self::create_owned(state.store(), &identity.user_id, input.name.trim()).await?;
        Ok(ProjectOutput { project })
    }

    pub async fn update(
        state: AppState,
        ctx: RequestContext,
        input: UpdateProjectInput,
    ) -> ApiResult<ProjectOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut project = Self::find(store, &input.id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &project.id).await?;

        project.name = input.name.trim().to_string();
        ProjectRepository::update(store, &identity.user_id, &mut project)
            .await
            .map_err(fail(format!("Could not update project {}", project.id)))?;

        Ok(ProjectOutput { project })
    }

    /// Only the creator may delete a project; its memberships go with it
    pub async fn delete(
        state: AppState,
        ctx: RequestContext,
        input: IdInput,
    ) -> ApiResult<ProjectOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut project = Self::find(store, &input.id).await?;

        let owner = project.created.as_ref().map(|event| event.by.as_str());
        if owner != Some(identity.user_id.as_str()) {
            return Err(ApiError::Unauthorized(format!(
                "{} is not the owner of {}",
                identity.user_id, project.id
            )));
        }

        ProjectRepository::soft_delete(store, &identity.user_id, &mut project)
            .await
            .map_err(fail(format!("Could not delete project {}", project.id)))?;
        let revoked = ProjectUserRepository::delete_all_for_project(store, &project.id)
            .await
            .map_err(fail(format!("Could not delete memberships of {}", project.id)))?;

        info!(project_id = %project.id, memberships = revoked, "Project deleted");
        Ok(ProjectOutput { project })
    }

    /// Seed a new account with a project, a folder and a sample request
    pub async fn create_example(state: &AppState, user_id: &str) -> ApiResult<Project> {
        let store = state.store();
        let project = Self::create_owned(store, user_id, EXAMPLE_PROJECT_NAME).await?;

        let mut folder = Folder {
            id: String::new(),
            name: EXAMPLE_FOLDER_NAME.to_string(),
            project_id: project.id.clone(),
            created: None,
            updated: None,
            deleted: None,
        };
        FolderRepository::create(store, user_id, &mut folder)
            .await
            .map_err(fail("Could not create example folder"))?;

        let mut request = Request {
            id: String::new(),
            name: EXAMPLE_REQUEST_NAME.to_string(),
            folder_id: folder.id.clone(),
            project_id: project.id.clone(),
            request_type: Some(RequestType::Post),
            url: EXAMPLE_REQUEST_URL.to_string(),
            headers: HashMap::from([("Accept".to_string(), "application/json".to_string())]),
            body: EXAMPLE_REQUEST_BODY.to_string(),
            created: None,
            updated: None,
            deleted: None,
        };
        RequestRepository::create(store, user_id, &mut request)
            .await
            .map_err(fail("Could not create example request"))?;

        Ok(project)
    }

    /// Visible project by id, `NotFound` otherwise
    pub(crate) async fn find(store: &dyn DocumentStore, id: &str) -> ApiResult<Project> {
        ProjectRepository::find_by_id(store, id)
            .await
            .map_err(fail(format!("Could not get project {}", id)))?
            .ok_or(ApiError::NotFound("Project"))
    }

    /// Create a project and make `user_id` its first member
    async fn create_owned(store: &dyn DocumentStore, user_id: &str, name: &str) -> ApiResult<Project> {
        let mut project = Project {
            id: String::new(),
            name: name.to_string(),
            created: None,
            updated: None,
            deleted: None,
        };
        ProjectRepository::create(store, user_id, &mut project)
            .await
            .map_err(fail("Could not create project"))?;
        ProjectUserRepository::create(store, &project.id, user_id)
            .await
            .map_err(fail(format!("Could not create membership for {}", project.id)))?;

        Ok(project)
    }
}
