//! Sync fluent chain: bind a recipe to a client handle, then run different operations through it.

use fluent_retry::WithRetry;
use fluent_retry_cookbook::retry_on_err_if;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum FetchError {
    #[error("retryable: {0}")]
    Retryable(&'static str),
    #[error("fatal: {0}")]
    Fatal(&'static str),
}

/// Stand-in for a blocking client handle.
#[derive(Debug, Clone)]
struct Client {
    attempts: Arc<AtomicUsize>,
}

impl Client {
    fn get(&self, path: &str) -> Result<String, FetchError> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst);
        match (path, n) {
            ("fatal", _) => Err(FetchError::Fatal("do not retry")),
            (_, 0) | (_, 1) => Err(FetchError::Retryable("transient upstream")),
            _ => Ok(format!("{} ok on attempt {}", path, n + 1)),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== fluent-retry: sync fluent chain ===\n");

    let client = Client { attempts: Arc::new(AtomicUsize::new(0)) };
    let strategy = retry_on_err_if(3, |e: &FetchError| matches!(e, FetchError::Retryable(_)));

    println!("Calling flaky endpoint (should succeed after retries)...");
    let ok = client.clone().with_retry_strategy(strategy.clone()).retry(|c| c.get("happy"))?;
    println!("✓ Result: {}", ok);

    println!("\nCalling fatal path (should NOT retry)...");
    let err = client.with_retry_strategy(strategy).retry(|c| c.get("fatal")).unwrap_err();
    println!("✗ Fatal error returned immediately: {}", err);

    Ok(())
}
