//! Worker pool for favicon fetches.
//!
//! Network requests and image decoding block for a long time compared to a
//! frame, so they run on a rayon pool. [`ThreadPool`] implements
//! [`Executor`] and is what `FaviconSupport` falls back to when no executor
//! is configured.
//!
//! # Example
//!
//! ```no_run
//! use horizon_favicon_core::{Executor, ThreadPool, ThreadPoolConfig};
//!
//! let pool = ThreadPool::new(ThreadPoolConfig::with_threads(2))?;
//! pool.execute(Box::new(|| {
//!     // fetch and decode
//! }));
//! # Ok::<(), horizon_favicon_core::CoreError>(())
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::error::{CoreError, Result};
use crate::executor::{Executor, Task};
use crate::logging::targets;

static SHARED: OnceLock<Arc<ThreadPool>> = OnceLock::new();

/// Settings for [`ThreadPool::new`].
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// Worker count. Rayon picks one per logical CPU when unset.
    pub num_threads: Option<usize>,
    /// Workers are named `{thread_name}-{index}`.
    pub thread_name: String,
    /// Per-worker stack in bytes; rayon's default when unset.
    pub stack_size: Option<usize>,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name: String::from("horizon-favicon"),
            stack_size: None,
        }
    }
}

impl ThreadPoolConfig {
    /// Default settings with a fixed worker count.
    pub fn with_threads(count: usize) -> Self {
        Self {
            num_threads: Some(count),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_thread_name(self, name: impl Into<String>) -> Self {
        Self {
            thread_name: name.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_stack_size(self, bytes: usize) -> Self {
        Self {
            stack_size: Some(bytes),
            ..self
        }
    }

    fn rayon_builder(&self) -> rayon::ThreadPoolBuilder {
        let prefix = self.thread_name.clone();
        let builder = rayon::ThreadPoolBuilder::new()
            .thread_name(move |index| format!("{prefix}-{index}"))
            .panic_handler(|_| {
                tracing::error!(target: targets::POOL, "favicon task panicked on a worker");
            });
        let builder = match self.num_threads {
            Some(count) => builder.num_threads(count),
            None => builder,
        };
        match self.stack_size {
            Some(bytes) => builder.stack_size(bytes),
            None => builder,
        }
    }
}

/// Rayon-backed [`Executor`].
///
/// Tracks how many submitted tasks are still queued or running, which tests
/// and diagnostics use to see whether fetches are outstanding.
pub struct ThreadPool {
    workers: rayon::ThreadPool,
    in_flight: Arc<AtomicUsize>,
}

impl ThreadPool {
    /// The process-wide pool, created with [`ThreadPoolConfig::default`] on
    /// first use.
    pub fn global() -> Result<Arc<ThreadPool>> {
        if let Some(pool) = SHARED.get() {
            return Ok(Arc::clone(pool));
        }
        let pool = Arc::new(ThreadPool::new(ThreadPoolConfig::default())?);
        // Another thread may have initialized it meanwhile; either pool works.
        Ok(Arc::clone(SHARED.get_or_init(|| pool)))
    }

    pub fn new(config: ThreadPoolConfig) -> Result<Self> {
        let workers = config
            .rayon_builder()
            .build()
            .map_err(|e| CoreError::ThreadPoolCreation(e.to_string()))?;

        tracing::debug!(
            target: targets::POOL,
            threads = workers.current_num_threads(),
            name = %config.thread_name,
            "favicon worker pool started"
        );

        Ok(Self {
            workers,
            in_flight: Arc::default(),
        })
    }

    /// Worker count.
    pub fn num_threads(&self) -> usize {
        self.workers.current_num_threads()
    }

    /// Submitted tasks that have not returned yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Executor for ThreadPool {
    fn execute(&self, task: Task) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlight(Arc::clone(&self.in_flight));
        self.workers.spawn(move || {
            let _guard = guard;
            task();
        });
    }
}

/// Decrements the in-flight count when dropped, including during unwinding.
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("threads", &self.num_threads())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
