//! Offloading synchronous work (SQLite, bcrypt) from the async workers.

use crate::error::ApiError;

/// Run `f` on the blocking thread pool
pub async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("Blocking task failed")))
}
