//! Core systems for Horizon Favicon.
//!
//! This crate provides the execution seams the favicon orchestrator is built on:
//!
//! - **Executor**: runs background work (network fetches, image decoding)
//! - **Dispatcher**: runs work on the single UI/event thread
//! - **Thread Pool**: rayon-backed default [`Executor`]
//! - **Dispatch Thread**: dedicated single-thread default [`Dispatcher`]
//! - **Invocation Queue**: manually drained queue for event-loop hosts and tests
//!
//! # Example
//!
//! ```no_run
//! use horizon_favicon_core::{DispatchThread, Dispatcher, Executor, ThreadPool};
//! use std::sync::Arc;
//!
//! let pool = ThreadPool::global()?;
//! let ui = Arc::new(DispatchThread::new()?);
//!
//! let ui_for_task = ui.clone();
//! pool.execute(Box::new(move || {
//!     let result = "decoded".to_string();
//!     ui_for_task.dispatch(Box::new(move || println!("on UI thread: {result}")));
//! }));
//! # Ok::<(), horizon_favicon_core::CoreError>(())
//! ```

mod dispatch;
mod error;
mod executor;
pub mod invocation;
pub mod logging;
pub mod threadpool;

pub use dispatch::{DispatchThread, DispatchThreadConfig};
pub use error::{CoreError, Result};
pub use executor::{Dispatcher, Executor, InlineExecutor, Task};
pub use invocation::{InvocationQueue, QueuedInvocation};
pub use threadpool::{ThreadPool, ThreadPoolConfig};
