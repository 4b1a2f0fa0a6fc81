//! Tower integration.
//!
//! [`StrategyLayer`] binds every request passing through a service to one shared strategy and
//! hands the strategy an operation over the inner service. The first attempt is served by the
//! instance readied through `poll_ready`; every later attempt drives a fresh clone. This is the
//! "configure a client once, issue many requests" shape expressed as middleware.
//!
//! ```rust
//! use fluent_retry::{Operation, RetryStrategy, StrategyLayer};
//! use futures::future::BoxFuture;
//! use tower::{service_fn, ServiceBuilder, ServiceExt};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! type Attempt = BoxFuture<'static, Result<String, std::io::Error>>;
//!
//! let strategy = RetryStrategy::from_async(|req: String, op: Operation<String, Attempt>| async move {
//!     match op.call(req.clone()).await {
//!         Ok(resp) => Ok(resp),
//!         Err(_) => op.call(req).await,
//!     }
//! });
//!
//! let svc = ServiceBuilder::new()
//!     .layer(StrategyLayer::new(strategy))
//!     .service(service_fn(|req: String| async move { Ok::<_, std::io::Error>(req.to_uppercase()) }));
//!
//! assert_eq!(svc.oneshot("ping".to_string()).await.unwrap(), "PING");
//! # });
//! ```

use crate::{Operation, RetryContext, RetryStrategy};
use futures::future::{BoxFuture, FutureExt};
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};
use tower::ServiceExt;
use tower_layer::Layer;
use tower_service::Service;

/// Strategy shape accepted by [`StrategyLayer`].
pub type ServiceStrategy<Req, Resp, E> = RetryStrategy<Req, BoxFuture<'static, Result<Resp, E>>>;

/// Tower layer that routes every call through a retry strategy.
pub struct StrategyLayer<Req, Resp, E> {
    strategy: ServiceStrategy<Req, Resp, E>,
}

impl<Req, Resp, E> StrategyLayer<Req, Resp, E> {
    pub fn new(strategy: ServiceStrategy<Req, Resp, E>) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &ServiceStrategy<Req, Resp, E> {
        &self.strategy
    }
}

impl<Req, Resp, E> Clone for StrategyLayer<Req, Resp, E> {
    fn clone(&self) -> Self {
        Self { strategy: self.strategy.clone() }
    }
}

impl<Req, Resp, E> std::fmt::Debug for StrategyLayer<Req, Resp, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyLayer").field("strategy", &self.strategy).finish()
    }
}

impl<S, Req, Resp, E> Layer<S> for StrategyLayer<Req, Resp, E> {
    type Service = StrategyService<S, Req, Resp, E>;

    fn layer(&self, inner: S) -> Self::Service {
        StrategyService { inner, strategy: self.strategy.clone() }
    }
}

/// Service produced by [`StrategyLayer`].
pub struct StrategyService<S, Req, Resp, E> {
    inner: S,
    strategy: ServiceStrategy<Req, Resp, E>,
}

impl<S: Clone, Req, Resp, E> Clone for StrategyService<S, Req, Resp, E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), strategy: self.strategy.clone() }
    }
}

/// Services available to one call's attempts.
struct Attempts<S> {
    readied: Option<S>,
    template: S,
}

impl<S: Clone> Attempts<S> {
    /// The readied service on first use, a fresh clone afterwards (`Err`).
    fn next(&mut self) -> Result<S, S> {
        match self.readied.take() {
            Some(readied) => Ok(readied),
            None => Err(self.template.clone()),
        }
    }
}

impl<S, Req, Resp, E> Service<Req> for StrategyService<S, Req, Resp, E>
where
    S: Service<Req, Response = Resp, Error = E> + Clone + Send + 'static,
    S::Future: Send + 'static,
    Req: Send + 'static,
    Resp: Send + 'static,
    E: Send + 'static,
{
    type Response = Resp;
    type Error = E;
    type Future = BoxFuture<'static, Result<Resp, E>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        // `self.inner` holds whatever `poll_ready` reserved; it goes to the first attempt.
        let clone = self.inner.clone();
        let readied = std::mem::replace(&mut self.inner, clone);
        let attempts =
            Mutex::new(Attempts { readied: Some(readied), template: self.inner.clone() });

        let operation = Operation::new(move |req: Req| -> BoxFuture<'static, Result<Resp, E>> {
            let next = attempts.lock().unwrap_or_else(PoisonError::into_inner).next();
            match next {
                Ok(mut readied) => readied.call(req).boxed(),
                Err(fresh) => fresh.oneshot(req).boxed(),
            }
        });
        RetryContext::new(req, self.strategy.clone()).run(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use tower::limit::ConcurrencyLimitLayer;
    use tower::util::BoxCloneService;
    use tower::{service_fn, ServiceBuilder};

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[error("TestError: {0}")]
    struct TestError(String);

    type Attempt = BoxFuture<'static, Result<String, TestError>>;

    fn up_to(attempts: usize) -> ServiceStrategy<&'static str, String, TestError> {
        RetryStrategy::from_async(move |req: &'static str, op: Operation<&'static str, Attempt>| async move {
            let mut result = op.call(req).await;
            for _ in 1..attempts {
                if result.is_ok() {
                    break;
                }
                result = op.call(req).await;
            }
            result
        })
    }

    #[tokio::test]
    async fn layer_retries_inner_service() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let svc = ServiceBuilder::new().layer(StrategyLayer::new(up_to(3))).service(service_fn(
            move |req: &'static str| {
                let n = calls_clone.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(TestError(format!("attempt {}", n)))
                    } else {
                        Ok(format!("{} ok", req))
                    }
                }
            },
        ));

        let resp = svc.oneshot("get").await;

        assert_eq!(resp, Ok("get ok".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn layer_returns_inner_error_unchanged_when_exhausted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let mut svc = StrategyLayer::new(up_to(2)).layer(service_fn(move |_req: &'static str| {
            let n = calls_clone.fetch_add(1, Ordering::SeqCst);
            async move { Err::<String, _>(TestError(format!("attempt {}", n))) }
        }));

        let err = svc.ready().await.unwrap().call("get").await.unwrap_err();

        assert_eq!(err, TestError("attempt 1".into()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn one_layer_serves_many_requests() {
        let layer = StrategyLayer::new(up_to(1));
        let svc = layer.layer(service_fn(|req: &'static str| async move {
            Ok::<_, TestError>(req.to_uppercase())
        }));

        for req in ["a", "b", "c"] {
            let resp = svc.clone().oneshot(req).await.unwrap();
            assert_eq!(resp, req.to_uppercase());
        }
        assert!(layer.strategy().ptr_eq(layer.clone().strategy()));
    }

    #[tokio::test]
    async fn readied_capacity_serves_the_first_attempt() {
        let mut svc = ServiceBuilder::new()
            .layer(StrategyLayer::new(up_to(1)))
            .layer(ConcurrencyLimitLayer::new(1))
            .service(service_fn(|req: &'static str| async move {
                Ok::<_, TestError>(req.to_uppercase())
            }));

        for req in ["first", "second"] {
            let ready = timeout(Duration::from_secs(2), svc.ready())
                .await
                .expect("capacity released by the previous call");
            let fut = ready.unwrap().call(req);
            let resp = timeout(Duration::from_secs(2), fut).await.expect("call completes");
            assert_eq!(resp, Ok(req.to_uppercase()));
        }
    }

    #[tokio::test]
    async fn later_attempts_reacquire_capacity_on_clones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let mut svc = ServiceBuilder::new()
            .layer(StrategyLayer::new(up_to(3)))
            .layer(ConcurrencyLimitLayer::new(1))
            .service(service_fn(move |req: &'static str| {
                let n = calls_clone.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(TestError(format!("attempt {}", n)))
                    } else {
                        Ok(req.to_string())
                    }
                }
            }));

        let fut = svc.ready().await.unwrap().call("limited");
        let resp = timeout(Duration::from_secs(2), fut).await.expect("retries complete");

        assert_eq!(resp, Ok("limited".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn wraps_services_that_are_not_sync() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let inner = BoxCloneService::new(service_fn(move |req: &'static str| {
            let n = calls_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(TestError("cold start".into()))
                } else {
                    Ok(format!("{} ok", req))
                }
            }
        }));

        let resp = StrategyLayer::new(up_to(2)).layer(inner).oneshot("boxed").await;

        assert_eq!(resp, Ok("boxed ok".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
