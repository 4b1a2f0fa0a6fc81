//! One strategy, many requests: `StrategyLayer` in a tower stack.

use fluent_retry::StrategyLayer;
use fluent_retry_cookbook::retry_on_err_if_async;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::{Service, ServiceBuilder, ServiceExt};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum MyError {
    #[error("retryable: {0}")]
    Retryable(&'static str),
    #[error("fatal: {0}")]
    Fatal(&'static str),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== fluent-retry: tower layer ===\n");

    let strategy = retry_on_err_if_async(3, |e: &MyError| matches!(e, MyError::Retryable(_)));

    let attempt = Arc::new(AtomicUsize::new(0));
    let attempt_clone = attempt.clone();
    let mut svc = ServiceBuilder::new().layer(StrategyLayer::new(strategy)).service_fn(
        move |req: &'static str| {
            let n = attempt_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                if req == "fatal" {
                    return Err(MyError::Fatal("do not retry"));
                }
                match n {
                    0 | 1 => Err(MyError::Retryable("transient upstream")),
                    _ => Ok::<_, MyError>(format!("ok on attempt {}", n + 1)),
                }
            }
        },
    );

    println!("Calling flaky service (should succeed after retries)...");
    let ok = svc.ready().await?.call("happy").await?;
    println!("✓ Result: {}", ok);

    println!("\nCalling fatal path (should NOT retry)...");
    let err = svc.ready().await?.call("fatal").await.unwrap_err();
    println!("✗ Fatal error returned immediately: {}", err);

    Ok(())
}
