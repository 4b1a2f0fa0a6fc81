//! Convenient re-exports for common fluent-retry types.
pub use crate::{
    adaptive::DynamicStrategy,
    binding::{bind, invoke, WithRetry},
    context::{ActionContext, ActionContextAsync, RetryContext, RetryContextAsync},
    error::FluentError,
    layer::{ServiceStrategy, StrategyLayer, StrategyService},
    operation::Operation,
    strategy::{RetryStrategy, Strategy},
};
