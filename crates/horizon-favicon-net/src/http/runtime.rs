//! Runtime management for async HTTP operations.
//!
//! The connection factory exposes a blocking API to the background executor,
//! and drives reqwest's async client on a small shared tokio runtime.

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::Runtime;

use crate::error::{NetworkError, Result};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get the shared runtime, creating it on first use.
pub fn get() -> Result<&'static Runtime> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("horizon-favicon-net")
        .enable_all()
        .build()
        .map_err(|e| NetworkError::Config(format!("failed to create tokio runtime: {e}")))?;
    Ok(RUNTIME.get_or_init(|| runtime))
}

/// Block on a future using the shared runtime.
///
/// # Warning
///
/// Do not call this from within an async context or on the UI thread; it
/// blocks the current thread until the future completes.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    Ok(get()?.block_on(future))
}
