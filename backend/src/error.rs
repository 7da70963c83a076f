//! Application error handling
//!
//! Every failure leaving the business layer is one of the [`ApiError`] kinds.
//! Store and cryptographic failures are wrapped where they occur with
//! operator context; that context is logged and never sent to the caller.

use crate::auth::AuthError;
use apiboy_shared::validation::wire_field_name;
use apiboy_shared::{ErrorDetail, ErrorResponse};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error};
use validator::ValidationErrors;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    /// Input failed its declared rules; carries the offending field names
    #[error("Invalid arguments: {}", .0.join(", "))]
    InvalidArguments(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Wrap a store or crypto failure with the operation it interrupted
    pub fn internal<E>(context: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ApiError::Internal(anyhow::Error::new(err).context(context.into()))
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidArguments(_) => "INVALID_ARGUMENTS",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArguments(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| wire_field_name(field).to_string())
            .collect();
        fields.sort();
        ApiError::InvalidArguments(fields)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(reason) => {
                ApiError::Unauthenticated(format!("Invalid session token: {}", reason))
            }
            other => ApiError::internal("Credential operation failed", other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut fields = None;

        let message = match &self {
            ApiError::InvalidArguments(invalid) => {
                fields = Some(invalid.clone());
                "Invalid arguments".to_string()
            }
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Unauthenticated(reason) => {
                debug!(reason = %reason, "Request rejected: unauthenticated");
                "Unauthenticated".to_string()
            }
            ApiError::Unauthorized(reason) => {
                debug!(reason = %reason, "Request rejected: unauthorized");
                "Unauthorized action".to_string()
            }
            ApiError::NotFound(what) => format!("{} not found", what),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                "An internal error occurred".to_string()
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
                fields,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use axum::body::to_bytes;

    async fn body_of(error: ApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidArguments(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthenticated("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("Project").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_invalid_arguments_lists_fields() {
        let (status, body) =
            body_of(ApiError::InvalidArguments(vec!["email".into(), "name".into()])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "INVALID_ARGUMENTS");
        assert_eq!(body.error.fields, Some(vec!["email".to_string(), "name".to_string()]));
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let err = ApiError::internal(
            "Could not get user usr-1",
            StoreError::Unavailable("password=hunter2 host=db".to_string()),
        );
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.message.contains("hunter2"));
        assert!(!body.error.message.contains("usr-1"));
    }

    #[tokio::test]
    async fn test_rejection_reasons_are_not_leaked() {
        let (_, body) = body_of(ApiError::Unauthenticated("session tok-1 missing".into())).await;
        assert_eq!(body.error.message, "Unauthenticated");

        let (_, body) = body_of(ApiError::Unauthorized("not a member of pro-1".into())).await;
        assert_eq!(body.error.message, "Unauthorized action");
    }

    #[test]
    fn test_validation_failures_use_json_field_names() {
        use apiboy_shared::CreateRequestInput;
        use validator::Validate;

        let input: CreateRequestInput = serde_json::from_value(serde_json::json!({
            "folder_id": "fol-1",
            "type": "FETCH"
        }))
        .unwrap();
        let err = ApiError::from(input.validate().unwrap_err());
        assert!(
            matches!(&err, ApiError::InvalidArguments(fields) if fields == &["name", "type"]),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_invalid_token_maps_to_unauthenticated() {
        let err = ApiError::from(AuthError::InvalidToken("ExpiredSignature".into()));
        assert!(matches!(err, ApiError::Unauthenticated(_)));

        let err = ApiError::from(AuthError::Hashing("out of memory".into()));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
