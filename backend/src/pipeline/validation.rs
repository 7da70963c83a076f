//! Input validation stage

use super::{Call, Endpoint, Stage};
use crate::error::ApiError;
use futures::future::FutureExt;
use std::sync::Arc;
use validator::Validate;

/// Runs the input's declared rules before anything else sees it
///
/// Rejects with `InvalidArguments` listing every offending field.
pub struct ValidationStage;

impl<I, O> Stage<I, O> for ValidationStage
where
    I: Validate + Send + 'static,
    O: Send + 'static,
{
    fn wrap(&self, next: Endpoint<I, O>) -> Endpoint<I, O> {
        Arc::new(move |call: Call<I>| {
            if let Err(errors) = call.input.validate() {
                let err = ApiError::from(errors);
                return async move { Err::<O, _>(err) }.boxed();
            }
            next(call)
        })
    }
}
