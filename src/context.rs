//! Retry contexts: an argument paired with the strategy that will drive it.
//!
//! Semantics:
//! - A context holds exactly two things, the argument and the strategy, and never changes
//!   after construction.
//! - Invocation consumes the context. Clone it first (possible when the argument is `Clone`)
//!   to run another operation under the same binding.
//! - Dispatch is a single delegated call: `strategy.execute(argument, operation)`. The result,
//!   success or failure, is returned untouched.
//!
//! All four shapes (sync or async, value or effect-only) are instantiations of
//! [`RetryContext`]; see the aliases below.

use crate::error::{self, FluentError};
use crate::{Operation, RetryStrategy};
use futures::future::BoxFuture;
use std::any::type_name;
use std::future::Future;

/// Argument bound to a retry strategy, waiting for an operation.
pub struct RetryContext<A, R> {
    argument: A,
    strategy: RetryStrategy<A, R>,
}

/// Sync context for effect-only operations; failures surface as `Err(E)`.
pub type ActionContext<A, E> = RetryContext<A, Result<(), E>>;

/// Async context for value-returning operations.
pub type RetryContextAsync<A, T> = RetryContext<A, BoxFuture<'static, T>>;

/// Async context for effect-only operations; failures surface as `Err(E)`.
pub type ActionContextAsync<A, E> = RetryContextAsync<A, Result<(), E>>;

impl<A, R> RetryContext<A, R> {
    pub fn new(argument: A, strategy: RetryStrategy<A, R>) -> Self {
        tracing::trace!(argument = type_name::<A>(), "retry strategy bound");
        Self { argument, strategy }
    }

    /// Checked constructor for strategies that may be absent (e.g. looked up at runtime).
    pub fn try_new(
        argument: A,
        strategy: Option<RetryStrategy<A, R>>,
    ) -> Result<Self, FluentError> {
        let strategy = strategy.ok_or_else(|| FluentError::missing(error::STRATEGY))?;
        Ok(Self::new(argument, strategy))
    }

    pub fn argument(&self) -> &A {
        &self.argument
    }

    pub fn strategy(&self) -> &RetryStrategy<A, R> {
        &self.strategy
    }

    pub fn into_parts(self) -> (A, RetryStrategy<A, R>) {
        (self.argument, self.strategy)
    }

    /// Hand `operation` and the bound argument to the strategy and return what it produces.
    pub fn run(self, operation: Operation<A, R>) -> R {
        tracing::trace!(
            argument = type_name::<A>(),
            result = type_name::<R>(),
            "dispatching operation through retry strategy"
        );
        let Self { argument, strategy } = self;
        strategy.execute(argument, operation)
    }

    /// Fluent form of [`run`](Self::run) taking a plain closure.
    pub fn retry<F>(self, operation: F) -> R
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        self.run(Operation::new(operation))
    }
}

impl<A, T> RetryContextAsync<A, T>
where
    A: 'static,
    T: 'static,
{
    /// Like [`retry`](RetryContext::retry) but takes a future-returning closure.
    pub fn retry_async<F, Fut>(self, operation: F) -> BoxFuture<'static, T>
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.run(Operation::from_async(operation))
    }
}

impl<A: Clone, R> Clone for RetryContext<A, R> {
    fn clone(&self) -> Self {
        Self { argument: self.argument.clone(), strategy: self.strategy.clone() }
    }
}

impl<A: std::fmt::Debug, R> std::fmt::Debug for RetryContext<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryContext")
            .field("argument", &self.argument)
            .field("strategy", &"<strategy>")
            .finish()
    }
}
