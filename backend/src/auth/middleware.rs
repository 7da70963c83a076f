//! Authentication stage
//!
//! Resolves the caller from the `Authorization: Bearer <token>` header. A
//! token is accepted only while its server-side session record exists and
//! belongs to the token's subject, so deleting the record revokes the token
//! before it expires.

use super::SessionTokenCodec;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::{Call, Endpoint, Stage};
use crate::repositories::SessionRepository;
use crate::store::{DocumentStore, SharedStore};
use apiboy_shared::Identity;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use futures::future::FutureExt;
use std::sync::Arc;
use tracing::warn;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolve the identity behind the request's session token
///
/// Every failure, including a failed session lookup, is `Unauthenticated`.
pub async fn authenticate(
    codec: &SessionTokenCodec,
    store: &dyn DocumentStore,
    headers: &HeaderMap,
) -> ApiResult<Identity> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthenticated("Missing authorization header".to_string()))?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated("Invalid authorization format".to_string()))?;

    let claims = codec.parse(token)?;

    let session = match SessionRepository::find_by_id(store, &claims.jti).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return Err(ApiError::Unauthenticated(format!(
                "Session {} does not exist",
                claims.jti
            )))
        }
        Err(e) => {
            warn!(session_id = %claims.jti, error = %e, "Session lookup failed");
            return Err(ApiError::Unauthenticated("Session lookup failed".to_string()));
        }
    };

    if session.user_id != claims.sub {
        return Err(ApiError::Unauthenticated(format!(
            "Session {} does not belong to the token subject",
            claims.jti
        )));
    }

    Ok(claims.identity())
}

/// Pipeline stage attaching the caller's identity to the request context
pub struct AuthenticationStage {
    codec: SessionTokenCodec,
    store: SharedStore,
}

impl AuthenticationStage {
    pub fn new(codec: SessionTokenCodec, store: SharedStore) -> Self {
        Self { codec, store }
    }
}

impl<I, O> Stage<I, O> for AuthenticationStage
where
    I: Send + 'static,
    O: Send + 'static,
{
    fn wrap(&self, next: Endpoint<I, O>) -> Endpoint<I, O> {
        let codec = self.codec.clone();
        let store = self.store.clone();
        Arc::new(move |mut call: Call<I>| {
            let codec = codec.clone();
            let store = store.clone();
            let next = next.clone();
            async move {
                let identity = authenticate(&codec, store.as_ref(), call.context.headers()).await?;
                call.context.set_identity(identity);
                next(call).await
            }
            .boxed()
        })
    }
}
