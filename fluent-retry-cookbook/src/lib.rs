//! Ready-to-use strategy recipes (“cookbook”) for fluent-retry.
//! Each function returns a `RetryStrategy` you can bind with `with_retry_strategy`, hand to
//! `bind`, or wrap in a `StrategyLayer`.
//!
//! Every recipe re-invokes immediately: no delays, no randomisation. Bring your own policy
//! crate when you need backoff; these exist to cover the common "try a few more times" case and
//! to show how a strategy is written.
//!
//! **Ladder:**
//! - Simple: [`retry_on_err`], [`retry_on_err_async`]
//! - Selective: [`retry_on_err_if`], [`retry_on_err_if_async`]

use fluent_retry::{Operation, RetryStrategy};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Async attempt shape used by the async recipes.
pub type Attempt<T, E> = BoxFuture<'static, Result<T, E>>;

/// Re-invoke on any `Err`, at most `retries` extra times; the last failure is returned.
pub fn retry_on_err<A, T, E>(retries: usize) -> RetryStrategy<A, Result<T, E>>
where
    A: Clone + 'static,
    T: 'static,
    E: 'static,
{
    retry_on_err_if(retries, |_: &E| true)
}

/// Like [`retry_on_err`], but only failures accepted by `predicate` are retried; others are
/// returned immediately.
pub fn retry_on_err_if<A, T, E, P>(retries: usize, predicate: P) -> RetryStrategy<A, Result<T, E>>
where
    A: Clone + 'static,
    T: 'static,
    E: 'static,
    P: Fn(&E) -> bool + Send + Sync + 'static,
{
    RetryStrategy::new(move |argument: A, op: Operation<A, Result<T, E>>| {
        let mut attempt = 0;
        loop {
            match op.call(argument.clone()) {
                Err(e) if attempt < retries && predicate(&e) => {
                    attempt += 1;
                    tracing::debug!(attempt, retries, "operation failed; re-invoking");
                }
                other => return other,
            }
        }
    })
}

/// Async counterpart of [`retry_on_err`].
pub fn retry_on_err_async<A, T, E>(retries: usize) -> RetryStrategy<A, Attempt<T, E>>
where
    A: Clone + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    retry_on_err_if_async(retries, |_: &E| true)
}

/// Async counterpart of [`retry_on_err_if`].
pub fn retry_on_err_if_async<A, T, E, P>(retries: usize, predicate: P) -> RetryStrategy<A, Attempt<T, E>>
where
    A: Clone + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    P: Fn(&E) -> bool + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    RetryStrategy::from_async(move |argument: A, op: Operation<A, Attempt<T, E>>| {
        let predicate = predicate.clone();
        async move {
            let mut attempt = 0;
            loop {
                match op.call(argument.clone()).await {
                    Err(e) if attempt < retries && (*predicate)(&e) => {
                        attempt += 1;
                        tracing::debug!(attempt, retries, "operation failed; re-invoking");
                    }
                    other => return other,
                }
            }
        }
    })
}
