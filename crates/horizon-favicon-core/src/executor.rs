//! Execution seams for background work and UI-thread delivery.
//!
//! Two traits separate *where* work runs from *what* the work is:
//!
//! - [`Executor`] runs a unit of work, eventually, off the calling thread
//!   (a thread pool in production, a manually drained queue in tests).
//! - [`Dispatcher`] runs a unit of work, eventually, on the single UI/event
//!   thread. Everything dispatched is executed in submission order.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_favicon_core::{Dispatcher, Executor, InvocationQueue};
//!
//! let background = Arc::new(InvocationQueue::new());
//! let ui = Arc::new(InvocationQueue::new());
//!
//! let ui_for_task = ui.clone();
//! background.execute(Box::new(move || {
//!     let answer = 6 * 7;
//!     ui_for_task.dispatch(Box::new(move || assert_eq!(answer, 42)));
//! }));
//!
//! assert_eq!(background.process_pending(), 1);
//! assert_eq!(ui.process_pending(), 1);
//! ```

use std::sync::Arc;

/// A type-erased unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks, possibly on another thread.
pub trait Executor: Send + Sync {
    /// Submit a task for execution.
    ///
    /// Must not block waiting for the task to finish.
    fn execute(&self, task: Task);
}

/// Runs tasks on the UI thread, one at a time, in submission order.
pub trait Dispatcher: Send + Sync {
    /// Submit a task to run on the UI thread.
    fn dispatch(&self, task: Task);
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, task: Task) {
        (**self).execute(task);
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    fn dispatch(&self, task: Task) {
        (**self).dispatch(task);
    }
}

/// Runs every task immediately on the calling thread.
///
/// Useful for command-line hosts without an event loop. Used as an executor
/// it makes the caller block for the duration of the task.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, task: Task) {
        task();
    }
}

impl Dispatcher for InlineExecutor {
    fn dispatch(&self, task: Task) {
        task();
    }
}
