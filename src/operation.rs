//! Caller-supplied operations.
//!
//! An [`Operation`] is the function a strategy re-invokes. It is handed over at invocation
//! time, never at bind time, which lets one bound strategy wrap many different operations over
//! the same argument type.

use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

/// Shared, re-invocable function from an argument to a result.
///
/// Cloning is cheap and yields a handle to the same function.
pub struct Operation<A, R> {
    inner: Arc<dyn Fn(A) -> R + Send + Sync>,
}

impl<A, R> Operation<A, R> {
    /// Wrap a closure or function item.
    pub fn new<F>(operation: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self { inner: Arc::new(operation) }
    }

    /// Invoke the operation once.
    pub fn call(&self, argument: A) -> R {
        (self.inner)(argument)
    }

    /// True when both handles share the same underlying function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A, T> Operation<A, BoxFuture<'static, T>>
where
    A: 'static,
    T: 'static,
{
    /// Wrap a future-returning closure, boxing each future it produces.
    pub fn from_async<F, Fut>(operation: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::new(move |argument| operation(argument).boxed())
    }
}

impl<A, R> Clone for Operation<A, R> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<A, R> std::fmt::Debug for Operation<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation").field("operation", &"<fn>").finish()
    }
}
