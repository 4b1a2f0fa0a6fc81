//! Retry strategies as first-class values.
//!
//! A strategy receives the bound argument together with the operation and is solely
//! responsible for invoking the operation zero or more times. Whatever it returns is what the
//! caller of `retry`/`invoke` sees; this crate never looks inside.
//!
//! Any closure `Fn(A, Operation<A, R>) -> R + Send + Sync` is a [`Strategy`]. Types that carry
//! their own configuration can implement the trait directly and be wrapped with
//! [`RetryStrategy::from_strategy`].
//!
//! ```rust
//! use fluent_retry::{Operation, RetryStrategy};
//!
//! // Re-invoke once on failure, then give up with whatever the second attempt produced.
//! let once_more = RetryStrategy::new(|n: u32, op: Operation<u32, Result<u32, String>>| {
//!     op.call(n).or_else(|_| op.call(n))
//! });
//!
//! let result = once_more.execute(7, Operation::new(|n: u32| Ok::<_, String>(n + 1)));
//! assert_eq!(result, Ok(8));
//! ```

use crate::Operation;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

/// Decides how, and how many times, an operation runs against its argument.
pub trait Strategy<A, R>: Send + Sync {
    fn execute(&self, argument: A, operation: Operation<A, R>) -> R;
}

impl<A, R, F> Strategy<A, R> for F
where
    F: Fn(A, Operation<A, R>) -> R + Send + Sync,
{
    fn execute(&self, argument: A, operation: Operation<A, R>) -> R {
        self(argument, operation)
    }
}

/// Shared handle to a strategy; cloning keeps the same underlying function.
pub struct RetryStrategy<A, R> {
    inner: Arc<dyn Strategy<A, R>>,
}

impl<A, R> RetryStrategy<A, R> {
    /// Wrap a strategy closure.
    pub fn new<F>(strategy: F) -> Self
    where
        F: Fn(A, Operation<A, R>) -> R + Send + Sync + 'static,
    {
        Self::from_strategy(strategy)
    }

    /// Wrap any [`Strategy`] implementation.
    pub fn from_strategy<S>(strategy: S) -> Self
    where
        S: Strategy<A, R> + 'static,
    {
        Self { inner: Arc::new(strategy) }
    }

    /// Run `operation` against `argument` under this strategy.
    pub fn execute(&self, argument: A, operation: Operation<A, R>) -> R {
        self.inner.execute(argument, operation)
    }

    /// True when both handles share the same underlying strategy.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A, T> RetryStrategy<A, BoxFuture<'static, T>>
where
    A: 'static,
    T: 'static,
{
    /// Wrap an async strategy closure, boxing each future it produces.
    pub fn from_async<F, Fut>(strategy: F) -> Self
    where
        F: Fn(A, Operation<A, BoxFuture<'static, T>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::new(move |argument, operation| strategy(argument, operation).boxed())
    }
}

impl<A, R> Clone for RetryStrategy<A, R> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<A, R> std::fmt::Debug for RetryStrategy<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryStrategy").field("strategy", &"<strategy>").finish()
    }
}
