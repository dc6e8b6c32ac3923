//! Queued invocations drained by their owning thread.
//!
//! An [`InvocationQueue`] stores deferred closures until the owning thread
//! calls [`InvocationQueue::process_pending`]. It serves two roles:
//!
//! 1. As a [`Dispatcher`] for hosts whose event loop already has an idle hook:
//!    the loop drains the queue once per iteration, so every dispatched task
//!    runs on the UI thread.
//!
//! 2. As an [`Executor`] or [`Dispatcher`] in tests, where the test itself
//!    decides when background work and UI-thread work happen.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::executor::{Dispatcher, Executor, Task};
use crate::logging::targets;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A closure waiting in an [`InvocationQueue`], tagged with a process-unique id.
pub struct QueuedInvocation {
    id: u64,
    invoke: Task,
}

impl QueuedInvocation {
    pub fn new(invoke: Task) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            invoke,
        }
    }

    /// Ids increase in submission order across all queues.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Consume the invocation and run its closure.
    pub fn execute(self) {
        tracing::trace!(target: targets::DISPATCH, invocation = self.id, "running queued invocation");
        (self.invoke)();
    }
}

impl std::fmt::Debug for QueuedInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedInvocation")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// FIFO queue of invocations, executed only when explicitly drained.
#[derive(Default)]
pub struct InvocationQueue {
    invocations: Mutex<VecDeque<QueuedInvocation>>,
}

impl InvocationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an invocation and return its ID.
    pub fn push(&self, task: Task) -> u64 {
        let invocation = QueuedInvocation::new(task);
        let id = invocation.id();
        self.invocations.lock().push_back(invocation);
        id
    }

    /// Number of invocations waiting to run.
    pub fn pending_count(&self) -> usize {
        self.invocations.lock().len()
    }

    /// Returns `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.invocations.lock().is_empty()
    }

    /// Run the oldest queued invocation, if any.
    ///
    /// The queue lock is released before the invocation runs, so the
    /// invocation may push more work onto this same queue.
    pub fn process_one(&self) -> bool {
        let next = self.invocations.lock().pop_front();
        match next {
            Some(invocation) => {
                invocation.execute();
                true
            }
            None => false,
        }
    }

    /// Run every invocation queued at the time of the call.
    ///
    /// Invocations queued while draining are left for the next call.
    /// Returns the number of invocations executed.
    pub fn process_pending(&self) -> usize {
        let batch: Vec<QueuedInvocation> = self.invocations.lock().drain(..).collect();
        let count = batch.len();
        for invocation in batch {
            invocation.execute();
        }
        count
    }

    /// Drain repeatedly until the queue stays empty.
    ///
    /// Returns the total number of invocations executed.
    pub fn process_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.process_pending();
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }

    /// Drop all queued invocations without running them.
    pub fn clear(&self) {
        self.invocations.lock().clear();
    }
}

impl Executor for InvocationQueue {
    fn execute(&self, task: Task) {
        self.push(task);
    }
}

impl Dispatcher for InvocationQueue {
    fn dispatch(&self, task: Task) {
        self.push(task);
    }
}

impl std::fmt::Debug for InvocationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationQueue")
            .field("pending", &self.pending_count())
            .finish()
    }
}
