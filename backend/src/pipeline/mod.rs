//! Request pipeline
//!
//! Every operation runs as an [`Endpoint`] built from a business function
//! wrapped in stages. Public operations run `validate → business`,
//! authenticated ones `validate → authenticate → business`. A stage either
//! short-circuits with an error or hands the call to the next one.

mod validation;

pub use validation::ValidationStage;

use crate::auth::AuthenticationStage;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use apiboy_shared::Identity;
use axum::http::HeaderMap;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use validator::Validate;

/// Per-request context handed down the pipeline
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    headers: HeaderMap,
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            headers,
            identity: None,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The authenticated caller
    ///
    /// Fails with `Unauthenticated` when no authentication stage ran.
    pub fn identity(&self) -> ApiResult<&Identity> {
        self.identity
            .as_ref()
            .ok_or_else(|| ApiError::Unauthenticated("No authenticated identity".to_string()))
    }

    pub(crate) fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }
}

/// One invocation of an operation
pub struct Call<I> {
    pub context: RequestContext,
    pub input: I,
}

/// A callable operation, possibly wrapped in stages
pub type Endpoint<I, O> = Arc<dyn Fn(Call<I>) -> BoxFuture<'static, ApiResult<O>> + Send + Sync>;

/// A pipeline stage wrapping the rest of the chain
pub trait Stage<I, O>: Send + Sync {
    fn wrap(&self, next: Endpoint<I, O>) -> Endpoint<I, O>;
}

/// Builds endpoints with the stage chains every operation runs through
#[derive(Clone)]
pub struct Pipeline {
    state: AppState,
}

impl Pipeline {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// `validate → business`
    pub fn public<I, O, F, Fut>(&self, operation: F) -> Endpoint<I, O>
    where
        I: Validate + Send + 'static,
        O: Send + 'static,
        F: Fn(AppState, RequestContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<O>> + Send + 'static,
    {
        let stages: Vec<Box<dyn Stage<I, O>>> = vec![Box::new(ValidationStage)];
        compose(stages, self.business(operation))
    }

    /// `validate → authenticate → business`
    pub fn authenticated<I, O, F, Fut>(&self, operation: F) -> Endpoint<I, O>
    where
        I: Validate + Send + 'static,
        O: Send + 'static,
        F: Fn(AppState, RequestContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<O>> + Send + 'static,
    {
        let stages: Vec<Box<dyn Stage<I, O>>> = vec![
            Box::new(ValidationStage),
            Box::new(AuthenticationStage::new(
                self.state.tokens().clone(),
                self.state.store.clone(),
            )),
        ];
        compose(stages, self.business(operation))
    }

    fn business<I, O, F, Fut>(&self, operation: F) -> Endpoint<I, O>
    where
        I: Send + 'static,
        O: Send + 'static,
        F: Fn(AppState, RequestContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<O>> + Send + 'static,
    {
        let state = self.state.clone();
        Arc::new(move |call: Call<I>| operation(state.clone(), call.context, call.input).boxed())
    }
}

/// Wrap `business` so that `stages[0]` runs first
pub fn compose<I, O>(stages: Vec<Box<dyn Stage<I, O>>>, business: Endpoint<I, O>) -> Endpoint<I, O> {
    stages
        .iter()
        .rev()
        .fold(business, |next, stage| stage.wrap(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Stage recording its name on the way in
    struct Trace {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        reject: bool,
    }

    impl Stage<(), ()> for Trace {
        fn wrap(&self, next: Endpoint<(), ()>) -> Endpoint<(), ()> {
            let name = self.name;
            let log = self.log.clone();
            let reject = self.reject;
            Arc::new(move |call: Call<()>| {
                log.lock().unwrap().push(name);
                if reject {
                    return async move { Err::<(), _>(ApiError::BadRequest(name.to_string())) }
                        .boxed();
                }
                next(call)
            })
        }
    }

    fn chain(log: &Arc<Mutex<Vec<&'static str>>>, reject_first: bool) -> Endpoint<(), ()> {
        let business_log = log.clone();
        let business: Endpoint<(), ()> = Arc::new(move |_: Call<()>| {
            business_log.lock().unwrap().push("business");
            async { Ok::<(), ApiError>(()) }.boxed()
        });
        let stages: Vec<Box<dyn Stage<(), ()>>> = vec![
            Box::new(Trace {
                name: "first",
                log: log.clone(),
                reject: reject_first,
            }),
            Box::new(Trace {
                name: "second",
                log: log.clone(),
                reject: false,
            }),
        ];
        compose(stages, business)
    }

    fn call() -> Call<()> {
        Call {
            context: RequestContext::default(),
            input: (),
        }
    }

    #[tokio::test]
    async fn test_stages_run_in_declared_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        chain(&log, false)(call()).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "business"]);
    }

    #[tokio::test]
    async fn test_rejecting_stage_short_circuits() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let result = chain(&log, true)(call()).await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
    }

    #[test]
    fn test_context_without_identity_is_unauthenticated() {
        let context = RequestContext::default();
        assert!(matches!(context.identity(), Err(ApiError::Unauthenticated(_))));
    }
}
