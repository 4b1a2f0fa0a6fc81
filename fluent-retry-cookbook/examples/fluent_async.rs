//! Async effect-only chain: a side-effecting send retried by a recipe.

use fluent_retry::{ActionContextAsync, WithRetry};
use fluent_retry_cookbook::retry_on_err_async;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

#[derive(Debug, thiserror::Error)]
#[error("broker unavailable (attempt {0})")]
struct Unavailable(usize);

#[tokio::main]
async fn main() -> Result<(), Unavailable> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== fluent-retry: async effect-only chain ===\n");

    let sent = Arc::new(AtomicUsize::new(0));
    let sent_clone = sent.clone();

    let ctx: ActionContextAsync<&'static str, Unavailable> =
        "orders.created".with_retry_strategy(retry_on_err_async(2));

    ctx.retry_async(move |topic| {
        let sent = sent_clone.clone();
        async move {
            let n = sent.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                return Err(Unavailable(n + 1));
            }
            println!("published to {}", topic);
            Ok(())
        }
    })
    .await?;

    println!("✓ Publish attempts: {}", sent.load(Ordering::SeqCst));
    Ok(())
}
