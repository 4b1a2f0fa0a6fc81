//! Bind and invoke: the public two-phase surface.
//!
//! `bind` attaches a strategy to an argument; `invoke` runs an operation through the bound
//! strategy. The checked free functions mirror inputs that may be absent at runtime and reject
//! them with [`FluentError::InvalidArgument`]. The [`WithRetry`] extension trait is the fluent
//! form for call sites where every input is statically present.
//!
//! ```rust
//! use fluent_retry::{Operation, RetryStrategy, WithRetry};
//!
//! fn twice(base: u32, op: Operation<u32, Result<u32, String>>) -> Result<u32, String> {
//!     op.call(base).or_else(|_| op.call(base))
//! }
//!
//! let value = 40_u32.with_retry(twice).retry(|base| Ok(base + 2));
//! assert_eq!(value, Ok(42));
//!
//! let ctx = fluent_retry::bind(40_u32, Some(RetryStrategy::new(twice))).unwrap();
//! let value = fluent_retry::invoke(Some(ctx), Some(Operation::new(|base: u32| Ok(base + 2))));
//! assert_eq!(value, Ok(Ok(42)));
//! ```

use crate::error::{self, FluentError};
use crate::{Operation, RetryContext, RetryContextAsync, RetryStrategy};
use futures::future::BoxFuture;
use std::future::Future;

/// Bind `strategy` to `argument`. Fails only when the strategy is absent; the argument is
/// never inspected.
pub fn bind<A, R>(
    argument: A,
    strategy: Option<RetryStrategy<A, R>>,
) -> Result<RetryContext<A, R>, FluentError> {
    RetryContext::try_new(argument, strategy)
}

/// Run `operation` through the context's strategy.
///
/// `context` is checked before `operation`. On success the strategy's output is returned
/// as-is inside `Ok`, including any failure the operation produced.
pub fn invoke<A, R>(
    context: Option<RetryContext<A, R>>,
    operation: Option<Operation<A, R>>,
) -> Result<R, FluentError> {
    let context = context.ok_or_else(|| FluentError::missing(error::CONTEXT))?;
    let operation = operation.ok_or_else(|| FluentError::missing(error::OPERATION))?;
    Ok(context.run(operation))
}

/// Fluent binding available on every sized type.
pub trait WithRetry: Sized {
    /// Attach a strategy closure, producing a context ready for `retry`.
    fn with_retry<R, F>(self, strategy: F) -> RetryContext<Self, R>
    where
        F: Fn(Self, Operation<Self, R>) -> R + Send + Sync + 'static,
    {
        RetryContext::new(self, RetryStrategy::new(strategy))
    }

    /// Attach an existing (possibly shared) strategy.
    fn with_retry_strategy<R>(self, strategy: RetryStrategy<Self, R>) -> RetryContext<Self, R> {
        RetryContext::new(self, strategy)
    }

    /// Attach an async strategy closure, producing a context ready for `retry_async`.
    fn with_retry_async<T, F, Fut>(self, strategy: F) -> RetryContextAsync<Self, T>
    where
        Self: 'static,
        T: 'static,
        F: Fn(Self, Operation<Self, BoxFuture<'static, T>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        RetryContext::new(self, RetryStrategy::from_async(strategy))
    }
}

impl<A> WithRetry for A {}
