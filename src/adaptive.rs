//! Live-swappable strategies.
//!
//! Default uses `ArcSwap` for lock-free reads; feature `adaptive-rwlock` (or building without
//! `arc-swap`) switches to RwLock.
//!
//! A context bound to [`DynamicStrategy::strategy`] resolves the current strategy when it is
//! invoked, not when it is bound, so replacing the strategy affects contexts that are already
//! waiting for an operation.

use crate::{Operation, RetryStrategy, Strategy};
use std::sync::Arc;

#[cfg(any(feature = "adaptive-rwlock", not(feature = "arc-swap")))]
use std::sync::{PoisonError, RwLock};

#[cfg(all(feature = "arc-swap", not(feature = "adaptive-rwlock")))]
use arc_swap::ArcSwap;

/// `DynamicStrategy` gives cheap reads and controlled replacement of a shared strategy.
pub struct DynamicStrategy<A, R> {
    #[cfg(all(feature = "arc-swap", not(feature = "adaptive-rwlock")))]
    inner: Arc<ArcSwap<RetryStrategy<A, R>>>,
    #[cfg(any(feature = "adaptive-rwlock", not(feature = "arc-swap")))]
    inner: Arc<RwLock<RetryStrategy<A, R>>>,
}

impl<A, R> Clone for DynamicStrategy<A, R> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

#[cfg(all(feature = "arc-swap", not(feature = "adaptive-rwlock")))]
const BACKEND: &str = "arc-swap";
#[cfg(any(feature = "adaptive-rwlock", not(feature = "arc-swap")))]
const BACKEND: &str = "rwlock";

impl<A, R> std::fmt::Debug for DynamicStrategy<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicStrategy")
            .field("backend", &BACKEND)
            .field("current", &"<strategy>")
            .finish()
    }
}

impl<A, R> DynamicStrategy<A, R> {
    pub fn new(initial: RetryStrategy<A, R>) -> Self {
        #[cfg(all(feature = "arc-swap", not(feature = "adaptive-rwlock")))]
        {
            Self { inner: Arc::new(ArcSwap::from_pointee(initial)) }
        }
        #[cfg(any(feature = "adaptive-rwlock", not(feature = "arc-swap")))]
        {
            Self { inner: Arc::new(RwLock::new(initial)) }
        }
    }

    /// Snapshot the current strategy.
    pub fn get(&self) -> RetryStrategy<A, R> {
        #[cfg(all(feature = "arc-swap", not(feature = "adaptive-rwlock")))]
        {
            RetryStrategy::clone(&self.inner.load())
        }
        #[cfg(any(feature = "adaptive-rwlock", not(feature = "arc-swap")))]
        {
            self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
        }
    }

    /// Replace the strategy entirely.
    pub fn set(&self, strategy: RetryStrategy<A, R>) {
        tracing::debug!("retry strategy replaced");
        #[cfg(all(feature = "arc-swap", not(feature = "adaptive-rwlock")))]
        {
            self.inner.store(Arc::new(strategy));
        }
        #[cfg(any(feature = "adaptive-rwlock", not(feature = "arc-swap")))]
        {
            *self.inner.write().unwrap_or_else(PoisonError::into_inner) = strategy;
        }
    }

    /// Derive a replacement from the current strategy.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&RetryStrategy<A, R>) -> RetryStrategy<A, R>,
    {
        let next = f(&self.get());
        self.set(next);
    }
}

impl<A, R> DynamicStrategy<A, R>
where
    A: 'static,
    R: 'static,
{
    /// Strategy handle that follows every later `set`/`update`.
    pub fn strategy(&self) -> RetryStrategy<A, R> {
        RetryStrategy::from_strategy(self.clone())
    }
}

impl<A, R> Strategy<A, R> for DynamicStrategy<A, R> {
    fn execute(&self, argument: A, operation: Operation<A, R>) -> R {
        self.get().execute(argument, operation)
    }
}
