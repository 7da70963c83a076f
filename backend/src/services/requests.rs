//! Saved request service

use super::{fail, non_blank, FolderService};
use crate::auth::AccessControl;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::RequestContext;
use crate::repositories::RequestRepository;
use crate::state::AppState;
use crate::store::DocumentStore;
use apiboy_shared::{
    CreateRequestInput, IdInput, Request, RequestOutput, RequestType, UpdateRequestInput,
};

pub struct RequestService;

impl RequestService {
    /// Save a request in a folder; its project is the folder's
    pub async fn create(
        state: AppState,
        ctx: RequestContext,
        input: CreateRequestInput,
    ) -> ApiResult<RequestOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let folder = FolderService::find(store, &input.folder_id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &folder.project_id).await?;

        let mut request = Request {
            id: String::new(),
            name: input.name.trim().to_string(),
            folder_id: folder.id,
            project_id: folder.project_id,
            request_type: parse_request_type(input.request_type.as_deref())?,
            url: input.url,
            headers: input.headers,
            body: input.body,
            created: None,
            updated: None,
            deleted: None,
        };
        RequestRepository::create(store, &identity.user_id, &mut request)
            .await
            .map_err(fail("Could not create request"))?;

        Ok(RequestOutput { request })
    }

    /// Replace a request's content, optionally moving it to another folder
    /// of the same project
    pub async fn update(
        state: AppState,
        ctx: RequestContext,
        input: UpdateRequestInput,
    ) -> ApiResult<RequestOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut request = Self::find(store, &input.id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &request.project_id).await?;

        if request.folder_id != input.folder_id {
            let folder = FolderService::find(store, &input.folder_id).await?;
            if folder.project_id != request.project_id {
                return Err(ApiError::BadRequest("Invalid folder for project".to_string()));
            }
            request.folder_id = folder.id;
        }

        request.name = input.name.trim().to_string();
        request.request_type = parse_request_type(input.request_type.as_deref())?;
        request.url = input.url;
        request.headers = input.headers;
        request.body = input.body;

        RequestRepository::update(store, &identity.user_id, &mut request)
            .await
            .map_err(fail(format!("Could not update request {}", request.id)))?;

        Ok(RequestOutput { request })
    }

    pub async fn delete(
        state: AppState,
        ctx: RequestContext,
        input: IdInput,
    ) -> ApiResult<RequestOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let mut request = Self::find(store, &input.id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &request.project_id).await?;

        RequestRepository::soft_delete(store, &identity.user_id, &mut request)
            .await
            .map_err(fail(format!("Could not delete request {}", request.id)))?;

        Ok(RequestOutput { request })
    }

    pub async fn duplicate(
        state: AppState,
        ctx: RequestContext,
        input: IdInput,
    ) -> ApiResult<RequestOutput> {
        let identity = ctx.identity()?;
        let store = state.store();
        let original = Self::find(store, &input.id).await?;
        AccessControl::check_project_access(store, &identity.user_id, &original.project_id)
            .await?;

        let request = RequestRepository::duplicate(store, &identity.user_id, &original, |copy| {
            copy.name.push_str(" Copy")
        })
        .await
        .map_err(fail(format!("Could not duplicate request {}", original.id)))?;

        Ok(RequestOutput { request })
    }

    async fn find(store: &dyn DocumentStore, id: &str) -> ApiResult<Request> {
        RequestRepository::find_by_id(store, id)
            .await
            .map_err(fail(format!("Could not get request {}", id)))?
            .ok_or(ApiError::NotFound("Request"))
    }
}

/// Blank means no verb
fn parse_request_type(value: Option<&str>) -> ApiResult<Option<RequestType>> {
    non_blank(value)
        .map(|v| v.parse::<RequestType>())
        .transpose()
        .map_err(|_| ApiError::InvalidArguments(vec!["type".to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{signed_up, state};
    use crate::services::ProjectService;
    use apiboy_shared::{CreateFolderInput, CreateProjectInput, Folder};
    use std::collections::HashMap;

    async fn folder(state: &AppState, ctx: &RequestContext, project: &str) -> Folder {
        crate::services::FolderService::create(
            state.clone(),
            ctx.clone(),
            CreateFolderInput {
                name: "Folder".to_string(),
                project_id: project.to_string(),
            },
        )
        .await
        .unwrap()
        .folder
    }

    async fn project(state: &AppState, ctx: &RequestContext) -> String {
        ProjectService::create(
            state.clone(),
            ctx.clone(),
            CreateProjectInput {
                name: "API".to_string(),
            },
        )
        .await
        .unwrap()
        .project
        .id
    }

    fn create_input(folder_id: &str) -> CreateRequestInput {
        CreateRequestInput {
            name: "Ping".to_string(),
            folder_id: folder_id.to_string(),
            request_type: Some("GET".to_string()),
            url: "https://example.com/ping".to_string(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    fn update_input(request: &Request, folder_id: &str) -> UpdateRequestInput {
        UpdateRequestInput {
            id: request.id.clone(),
            name: request.name.clone(),
            folder_id: folder_id.to_string(),
            request_type: Some("PUT".to_string()),
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: "{}".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_derives_project_from_folder() {
        let state = state();
        let ctx = signed_up(&state, "Ada", "a@x.com").await;
        let project_id = project(&state, &ctx).await;
        let folder = folder(&state, &ctx, &project_id).await;

        let request = RequestService::create(state.clone(), ctx, create_input(&folder.id))
            .await
            .unwrap()
            .request;

        assert!(request.id.starts_with("req-"));
        assert_eq!(request.project_id, project_id);
        assert_eq!(request.request_type, Some(RequestType::Get));
    }

    #[tokio::test]
    async fn test_create_in_missing_folder_is_not_found() {
        let state = state();
        let ctx = signed_up(&state, "Ada", "a@x.com").await;

        let err = RequestService::create(state.clone(), ctx, create_input("fol-missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Folder")));
    }

    #[tokio::test]
    async fn test_move_within_project_only() {
        let state = state();
        let ctx = signed_up(&state, "Ada", "a@x.com").await;
        let first_project = project(&state, &ctx).await;
        let second_project = project(&state, &ctx).await;
        let home = folder(&state, &ctx, &first_project).await;
        let sibling = folder(&state, &ctx, &first_project).await;
        let foreign = folder(&state, &ctx, &second_project).await;

        let request = RequestService::create(state.clone(), ctx.clone(), create_input(&home.id))
            .await
            .unwrap()
            .request;

        let err = RequestService::update(state.clone(), ctx.clone(), update_input(&request, &foreign.id))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let moved = RequestService::update(state.clone(), ctx, update_input(&request, &sibling.id))
            .await
            .unwrap()
            .request;
        assert_eq!(moved.folder_id, sibling.id);
        assert_eq!(moved.request_type, Some(RequestType::Put));
        assert_eq!(moved.body, "{}");
    }

    #[tokio::test]
    async fn test_duplicate_and_delete() {
        let state = state();
        let ctx = signed_up(&state, "Ada", "a@x.com").await;
        let project_id = project(&state, &ctx).await;
        let folder = folder(&state, &ctx, &project_id).await;
        let request = RequestService::create(state.clone(), ctx.clone(), create_input(&folder.id))
            .await
            .unwrap()
            .request;

        let id = IdInput {
            id: request.id.clone(),
        };
        let copy = RequestService::duplicate(state.clone(), ctx.clone(), id.clone())
            .await
            .unwrap()
            .request;
        assert_ne!(copy.id, request.id);
        assert_eq!(copy.name, "Ping Copy");
        assert_eq!(copy.folder_id, request.folder_id);
        assert!(copy.updated.is_none());

        RequestService::delete(state.clone(), ctx.clone(), id.clone()).await.unwrap();
        let err = RequestService::duplicate(state.clone(), ctx, id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Request")));
    }

    #[test]
    fn test_parse_request_type() {
        assert_eq!(parse_request_type(None).unwrap(), None);
        assert_eq!(parse_request_type(Some("")).unwrap(), None);
        assert_eq!(parse_request_type(Some("PATCH")).unwrap(), Some(RequestType::Patch));
        assert!(parse_request_type(Some("patch")).is_err());
    }
}
