//! API request and response types
//!
//! Every operation input declares its validation rules with the `validator`
//! derive; the backend runs them before anything else touches the input.

use crate::models::{Environment, Event, Folder, Project, ProjectUser, Request, User, UserRole};
use crate::validation::{
    validate_optional_email, validate_optional_password, validate_optional_request_type,
    validate_required,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    /// Offending input fields, for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Authenticated caller, as carried by the session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub session_id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginInput {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EmptyInput {}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordInput {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetNewPasswordInput {
    #[serde(default)]
    #[validate(length(min = 6))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub temp_code: String,
}

/// Session token issued on signup and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtOutput {
    pub jwt: String,
}

/// Output of operations with nothing to return
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyOutput {}

// ============================================================================
// Users
// ============================================================================

/// Update an account; `id` defaults to the caller and blank fields keep
/// their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_optional_email"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_optional_password"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DeleteUserInput {
    #[serde(default)]
    pub id: Option<String>,
}

/// Public view of a user account, without credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created: Option<Event>,
    pub updated: Option<Event>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created: user.created,
            updated: user.updated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserOutput {
    pub user: UserProfile,
}

// ============================================================================
// Projects
// ============================================================================

/// Input addressing a single resource by id
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IdInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProjectInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectOutput {
    pub project: Project,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectUserInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub project_id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub shared_by_user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteProjectUserInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub project_id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectUserOutput {
    #[serde(rename = "projectuser")]
    pub project_user: ProjectUser,
}

// ============================================================================
// Folders
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFolderInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderOutput {
    pub folder: Folder,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRequestInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub folder_id: String,
    #[serde(default, rename = "type")]
    #[validate(custom(function = "validate_optional_request_type"))]
    pub request_type: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRequestInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub folder_id: String,
    #[serde(default, rename = "type")]
    #[validate(custom(function = "validate_optional_request_type"))]
    pub request_type: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOutput {
    pub request: Request,
}

// ============================================================================
// Environments
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEnvironmentInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
    #[serde(default)]
    pub variables: HashMap<String, String>,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEnvironmentInput {
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub id: String,
    #[serde(default)]
    #[validate(custom(function = "validate_required"))]
    pub name: String,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentOutput {
    pub environment: Environment,
}
