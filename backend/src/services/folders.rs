//! Folder service

use super::{fail, ProjectService};
use crate::auth::AccessControl;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::RequestContext;
use crate::repositories::FolderRepository;
use crate::state::AppState;
use crate::store::DocumentStore;
use apiboy_shared::{CreateFolderInput, Folder, FolderOutput, IdInput, UpdateFolderInput};

pub struct FolderService;

impl FolderService {
    pub async fn create(
        state: AppState,
        ctx: RequestContext,
        input: CreateFolderInput,
    ) -> ApiResult<FolderOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let project = ProjectService::find(store, &input.project_id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &project.id).await?;

        let mut folder = Folder {
            id: String::new(),
            name: input.name.trim().to_string(),
            project_id: project.id,
            created: None,
            updated: None,
            deleted: None,
        };
        FolderRepository::create(store, &identity.user_id, &mut folder)
            .await
            .map_err(fail("Could not create folder"))?;

        Ok(FolderOutput { folder })
    }

    pub async fn update(
        state: AppState,
        ctx: RequestContext,
        input: UpdateFolderInput,
    ) -> ApiResult<FolderOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut folder = Self::find(store, &input.id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &folder.project_id).await?;

        folder.name = input.name.trim().to_string();
        FolderRepository::update(store, &identity.user_id, &mut folder)
            .await
            .map_err(fail(format!("Could not update folder {}", folder.id)))?;

        Ok(FolderOutput { folder })
    }

    pub async fn delete(
        state: AppState,
        ctx: RequestContext,
        input: IdInput,
    ) -> ApiResult<FolderOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut folder = Self::find(store, &input.id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &folder.project_id).await?;

        FolderRepository::soft_delete(store, &identity.user_id, &mut folder)
            .await
            .map_err(fail(format!("Could not delete folder {}", folder.id)))?;

        Ok(FolderOutput { folder })
    }

    pub(crate) async fn find(store: &dyn DocumentStore, id: &str) -> ApiResult<Folder> {
        FolderRepository::find_by_id(store, id)
            .await
            .map_err(fail(format!("Could not get folder {}", id)))?
            .ok_or(ApiError::NotFound("Folder"))
    }
}
