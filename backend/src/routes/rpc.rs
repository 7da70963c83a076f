//! RPC adapter between axum and pipeline endpoints
//!
//! Every operation is a `POST` with a JSON body. The adapter decodes the body,
//! hands it to the endpoint together with the request headers and encodes
//! the output as JSON.

use crate::error::ApiError;
use crate::pipeline::{Call, Endpoint, RequestContext};
use crate::state::AppState;
use axum::{
    extract::rejection::JsonRejection,
    http::HeaderMap,
    routing::{post, MethodRouter},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

/// Mount an endpoint as a `POST` handler
pub fn rpc<I, O>(endpoint: Endpoint<I, O>) -> MethodRouter<AppState>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
{
    post(
        move |headers: HeaderMap, body: Result<Json<I>, JsonRejection>| async move {
            let Json(input) =
                body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            let call = Call {
                context: RequestContext::new(headers),
                input,
            };
            let output = endpoint(call).await?;
            Ok::<_, ApiError>(Json(output))
        },
    )
}
