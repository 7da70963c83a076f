//! Account and session service
//!
//! Signup, login and logout manage sessions; a password reset goes through a
//! single-use code stored on the user.

use super::{fail, ProjectService};
use crate::auth::PasswordService;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::RequestContext;
use crate::repositories::{SessionRepository, UserRepository};
use crate::state::AppState;
use apiboy_shared::{
    EmptyInput, EmptyOutput, Identity, JwtOutput, LoginInput, ResetPasswordInput,
    SetNewPasswordInput, SignupInput, User, UserRole,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

/// How long a password reset code stays valid
pub const RESET_CODE_VALIDITY_HOURS: i64 = 24;

const RESET_CODE_SEPARATOR: char = '|';

pub struct AuthService;

impl AuthService {
    /// Register an account with an example project and start a session
    pub async fn signup(
        state: AppState,
        _ctx: RequestContext,
        input: SignupInput,
    ) -> ApiResult<JwtOutput> {
        let store = state.store();
        let email = input.email.trim();

        let existing = UserRepository::find_by_email(store, email)
            .await
            .map_err(fail("Could not get user"))?;
        if existing.is_some() {
            return Err(ApiError::BadRequest("User already exists".to_string()));
        }

        let password = PasswordService::hash_async(input.password.trim().to_string())
            .await
            .map_err(fail("Could not hash password"))?;

        let id = UserRepository::new_id();
        let mut user = User {
            id: id.clone(),
            name: input.name.trim().to_string(),
            email: email.to_string(),
            password,
            role: UserRole::User,
            temp_code: None,
            created: None,
            updated: None,
            deleted: None,
        };
        UserRepository::create(store, &id, &mut user)
            .await
            .map_err(fail("Could not create user"))?;

        ProjectService::create_example(&state, &user.id).await?;

        info!(user_id = %user.id, "User signed up");
        Self::start_session(&state, &user).await
    }

    /// Start a new session for valid credentials
    pub async fn login(
        state: AppState,
        _ctx: RequestContext,
        input: LoginInput,
    ) -> ApiResult<JwtOutput> {
        let user = UserRepository::find_by_email(state.store(), input.email.trim())
            .await
            .map_err(fail("Could not get user"))?
            .ok_or_else(|| ApiError::Unauthorized("Invalid user".to_string()))?;

        let valid =
            PasswordService::verify_async(input.password.trim().to_string(), user.password.clone())
                .await
                .map_err(fail(format!("Could not verify password of {}", user.id)))?;
        if !valid {
            return Err(ApiError::Unauthorized("Invalid password".to_string()));
        }

        Self::start_session(&state, &user).await
    }

    /// Revoke the caller's session
    pub async fn logout(
        state: AppState,
        ctx: RequestContext,
        _input: EmptyInput,
    ) -> ApiResult<EmptyOutput> {
        let identity = ctx.identity()?;
        SessionRepository::delete(state.store(), &identity.session_id)
            .await
            .map_err(fail(format!("Could not delete session {}", identity.session_id)))?;

        info!(user_id = %identity.user_id, "User logged out");
        Ok(EmptyOutput {})
    }

    /// The authenticated caller
    pub async fn me(
        _state: AppState,
        ctx: RequestContext,
        _input: EmptyInput,
    ) -> ApiResult<Identity> {
        ctx.identity().cloned()
    }

    /// Store a fresh reset code on the account
    ///
    /// Delivering the code to the account holder happens outside this
    /// service; the code is never returned or logged.
    pub async fn reset_password(
        state: AppState,
        _ctx: RequestContext,
        input: ResetPasswordInput,
    ) -> ApiResult<EmptyOutput> {
        let store = state.store();
        let mut user = UserRepository::find_by_email(store, input.email.trim())
            .await
            .map_err(fail("Could not get user"))?
            .ok_or_else(|| ApiError::Unauthorized("Invalid user".to_string()))?;

        user.temp_code = Some(issue_reset_code(&user.id, Utc::now()));
        let user_id = user.id.clone();
        UserRepository::update(store, &user_id, &mut user)
            .await
            .map_err(fail(format!("Could not store reset code for {}", user_id)))?;

        info!(user_id = %user_id, "Password reset requested");
        Ok(EmptyOutput {})
    }

    /// Replace the password of the account a valid reset code belongs to
    pub async fn set_new_password(
        state: AppState,
        _ctx: RequestContext,
        input: SetNewPasswordInput,
    ) -> ApiResult<EmptyOutput> {
        let store = state.store();
        let code = input.temp_code.trim();

        let (user_id, issued_at) = parse_reset_code(code)
            .ok_or_else(|| ApiError::Unauthorized("Invalid code".to_string()))?;
        if Utc::now() - issued_at > Duration::hours(RESET_CODE_VALIDITY_HOURS) {
            return Err(ApiError::Unauthorized("Expired code".to_string()));
        }

        let mut user = UserRepository::find_by_id(store, &user_id)
            .await
            .map_err(fail(format!("Could not get user {}", user_id)))?
            .ok_or(ApiError::NotFound("User"))?;

        if user.temp_code.as_deref() != Some(code) {
            return Err(ApiError::Unauthorized("Invalid code".to_string()));
        }

        user.password = PasswordService::hash_async(input.password.trim().to_string())
            .await
            .map_err(fail("Could not hash password"))?;
        user.temp_code = None;
        UserRepository::update(store, &user_id, &mut user)
            .await
            .map_err(fail(format!("Could not update user {}", user_id)))?;

        info!(user_id = %user_id, "Password reset completed");
        Ok(EmptyOutput {})
    }

    /// Record a new session for `user` and sign its token
    async fn start_session(state: &AppState, user: &User) -> ApiResult<JwtOutput> {
        let session_id = SessionRepository::new_id();
        SessionRepository::create(state.store(), &session_id, &user.id)
            .await
            .map_err(fail(format!("Could not create session for {}", user.id)))?;

        let jwt = state
            .tokens()
            .issue_for(&session_id, user)
            .map_err(fail("Could not sign session token"))?;

        Ok(JwtOutput { jwt })
    }
}

/// Opaque reset code: base64 of `user id | issue time | random uuid`
fn issue_reset_code(user_id: &str, issued_at: DateTime<Utc>) -> String {
    let raw = format!(
        "{}{sep}{}{sep}{}",
        user_id,
        issued_at.to_rfc3339(),
        Uuid::new_v4(),
        sep = RESET_CODE_SEPARATOR
    );
    STANDARD.encode(raw)
}

/// User id and issue time of a well-formed reset code
fn parse_reset_code(code: &str) -> Option<(String, DateTime<Utc>)> {
    let decoded = String::from_utf8(STANDARD.decode(code).ok()?).ok()?;
    let parts: Vec<&str> = decoded.split(RESET_CODE_SEPARATOR).collect();
    if parts.len() != 3 || parts[0].is_empty() {
        return None;
    }
    let issued_at = DateTime::parse_from_rfc3339(parts[1]).ok()?.with_timezone(&Utc);
    Some((parts[0].to_string(), issued_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{as_caller, signed_up, state, user_id};
    use crate::store;
    use apiboy_shared::{Folder, Project, ProjectUser, Request, RequestType};

    fn login_input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn stored_code(state: &AppState, email: &str) -> String {
        UserRepository::find_by_email(state.store(), email)
            .await
            .unwrap()
            .unwrap()
            .temp_code
            .unwrap()
    }

    #[tokio::test]
    async fn test_signup_issues_session_for_new_user() {
        let state = state();
        let ctx = signed_up(&state, " Ada ", " a@x.com ").await;
        let identity = ctx.identity().unwrap();

        assert_eq!(identity.name, "Ada");
        assert_eq!(identity.email, "a@x.com");
        assert_eq!(identity.role, UserRole::User);

        let user = UserRepository::find_by_id(state.store(), &identity.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password, "secret1");
        assert_eq!(user.created.unwrap().by, user.id);

        let session = SessionRepository::find_by_id(state.store(), &identity.session_id)
            .await
            .unwrap();
        assert!(session.is_some());
    }

    #[tokio::test]
    async fn test_signup_creates_example_project() {
        let state = state();
        let ctx = signed_up(&state, "Ada", "a@x.com").await;
        let uid = user_id(&ctx);

        let memberships: Vec<ProjectUser> =
            store::find_all(state.store(), "user_id", &uid).await.unwrap();
        assert_eq!(memberships.len(), 1);

        let project: Project = store::get(state.store(), &memberships[0].project_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(project.name, "Example Project");

        let folder: Folder = store::find_one(state.store(), "project_id", &project.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(folder.name, "Test Folder");

        let request: Request = store::find_one(state.store(), "folder_id", &folder.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.request_type, Some(RequestType::Post));
        assert_eq!(request.url, "https://httpbin.org/anything");
        assert_eq!(request.project_id, project.id);
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let state = state();
        signed_up(&state, "Ada", "a@x.com").await;

        let err = AuthService::signup(
            state.clone(),
            RequestContext::default(),
            SignupInput {
                name: "Other".to_string(),
                email: "a@x.com".to_string(),
                password: "secret2".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_login_creates_distinct_session() {
        let state = state();
        let first = signed_up(&state, "Ada", "a@x.com").await;

        let output = AuthService::login(
            state.clone(),
            RequestContext::default(),
            login_input("a@x.com", "secret1"),
        )
        .await
        .unwrap();
        let second = as_caller(&state, &output.jwt);

        assert_eq!(user_id(&first), user_id(&second));
        assert_ne!(
            first.identity().unwrap().session_id,
            second.identity().unwrap().session_id
        );
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let state = state();
        signed_up(&state, "Ada", "a@x.com").await;

        let wrong_password = AuthService::login(
            state.clone(),
            RequestContext::default(),
            login_input("a@x.com", "secret2"),
        )
        .await
        .unwrap_err();
        assert!(matches!(wrong_password, ApiError::Unauthorized(_)));

        let unknown = AuthService::login(
            state.clone(),
            RequestContext::default(),
            login_input("b@x.com", "secret1"),
        )
        .await
        .unwrap_err();
        assert!(matches!(unknown, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let state = state();
        let ctx = signed_up(&state, "Ada", "a@x.com").await;
        let session_id = ctx.identity().unwrap().session_id.clone();

        AuthService::logout(state.clone(), ctx.clone(), EmptyInput {}).await.unwrap();
        assert!(SessionRepository::find_by_id(state.store(), &session_id)
            .await
            .unwrap()
            .is_none());
        AuthService::logout(state.clone(), ctx, EmptyInput {}).await.unwrap();
    }

    #[tokio::test]
    async fn test_me_requires_identity() {
        let err = AuthService::me(state(), RequestContext::default(), EmptyInput {})
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let state = state();
        signed_up(&state, "Ada", "a@x.com").await;

        AuthService::reset_password(
            state.clone(),
            RequestContext::default(),
            ResetPasswordInput {
                email: "a@x.com".to_string(),
            },
        )
        .await
        .unwrap();
        let code = stored_code(&state, "a@x.com").await;

        AuthService::set_new_password(
            state.clone(),
            RequestContext::default(),
            SetNewPasswordInput {
                password: "newpass1".to_string(),
                temp_code: code.clone(),
            },
        )
        .await
        .unwrap();

        AuthService::login(
            state.clone(),
            RequestContext::default(),
            login_input("a@x.com", "newpass1"),
        )
        .await
        .unwrap();

        // The code is single-use
        let reused = AuthService::set_new_password(
            state.clone(),
            RequestContext::default(),
            SetNewPasswordInput {
                password: "another1".to_string(),
                temp_code: code,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(reused, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_reset_for_unknown_email_is_unauthorized() {
        let err = AuthService::reset_password(
            state(),
            RequestContext::default(),
            ResetPasswordInput {
                email: "nobody@x.com".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_expired_reset_code_is_unauthorized() {
        let state = state();
        let ctx = signed_up(&state, "Ada", "a@x.com").await;
        let uid = user_id(&ctx);

        let code = issue_reset_code(&uid, Utc::now() - Duration::hours(25));
        let mut user = UserRepository::find_by_id(state.store(), &uid).await.unwrap().unwrap();
        user.temp_code = Some(code.clone());
        UserRepository::update(state.store(), &uid, &mut user).await.unwrap();

        let err = AuthService::set_new_password(
            state.clone(),
            RequestContext::default(),
            SetNewPasswordInput {
                password: "newpass1".to_string(),
                temp_code: code,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_reset_code_for_unknown_user_is_not_found() {
        let code = issue_reset_code("usr-missing", Utc::now());
        let err = AuthService::set_new_password(
            state(),
            RequestContext::default(),
            SetNewPasswordInput {
                password: "newpass1".to_string(),
                temp_code: code,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("User")));
    }

    #[test]
    fn test_reset_code_round_trip() {
        let now = Utc::now();
        let code = issue_reset_code("usr-1", now);
        let (user_id, issued_at) = parse_reset_code(&code).unwrap();

        assert_eq!(user_id, "usr-1");
        assert_eq!(issued_at.timestamp(), now.timestamp());
        assert!(!code.contains("usr-1"));
    }

    #[test]
    fn test_malformed_reset_codes() {
        assert!(parse_reset_code("not base64!").is_none());
        assert!(parse_reset_code(&STANDARD.encode("usr-1|yesterday|x")).is_none());
        assert!(parse_reset_code(&STANDARD.encode("usr-1|2024-01-01T00:00:00Z")).is_none());
        assert!(parse_reset_code(&STANDARD.encode("|2024-01-01T00:00:00Z|x")).is_none());
    }
}
