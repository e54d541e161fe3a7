//! Caller-supplied deadlines for remote calls.

use anyhow::{anyhow, Result};
use std::future::Future;
use tokio::time::Instant;

/// Await `fut`, failing if `deadline` passes first. `None` waits indefinitely.
pub async fn with_deadline<T, F>(deadline: Option<Instant>, operation: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        None => fut.await,
        Some(deadline) => tokio::time::timeout_at(deadline, fut)
            .await
            .map_err(|_| anyhow!("{} exceeded its deadline", operation))?,
    }
}
