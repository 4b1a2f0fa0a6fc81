#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::all))]

//! # fluent-retry
//!
//! Attach a retry strategy to any argument, then run operations through it. The strategy is
//! yours: this crate only defines the shape through which it is invoked.
//!
//! ## Features
//!
//! - **Bind/invoke split**: configure a strategy once per argument (a request, a client
//!   handle), vary the operation per call site
//! - **One generic core** covering sync and async, value-returning and effect-only operations
//! - **Pass-through dispatch**: whatever the strategy returns reaches the caller untouched
//! - **Live-swappable strategies** via [`DynamicStrategy`]
//! - **Tower middleware** via [`StrategyLayer`]
//!
//! ## Quick Start
//!
//! ```rust
//! use fluent_retry::{Operation, WithRetry};
//! use futures::future::BoxFuture;
//!
//! #[derive(Debug)]
//! struct Unavailable;
//!
//! type Attempt = BoxFuture<'static, Result<&'static str, Unavailable>>;
//!
//! #[tokio::main]
//! async fn main() {
//!     let response = "https://example.com/health"
//!         .with_retry_async(|url: &'static str, op: Operation<&'static str, Attempt>| async move {
//!             let mut last = op.call(url).await;
//!             for _ in 0..2 {
//!                 if last.is_ok() {
//!                     break;
//!                 }
//!                 last = op.call(url).await;
//!             }
//!             last
//!         })
//!         .retry_async(|_url| async { Ok::<_, Unavailable>("Ok") })
//!         .await;
//!
//!     assert_eq!(response.unwrap(), "Ok");
//! }
//! ```

pub mod adaptive;
pub mod binding;
pub mod context;
pub mod error;
pub mod layer;
pub mod operation;
pub mod prelude;
pub mod strategy;

// Re-exports
pub use adaptive::DynamicStrategy;
pub use binding::{bind, invoke, WithRetry};
pub use context::{ActionContext, ActionContextAsync, RetryContext, RetryContextAsync};
pub use error::FluentError;
pub use layer::{ServiceStrategy, StrategyLayer, StrategyService};
pub use operation::Operation;
pub use strategy::{RetryStrategy, Strategy};
