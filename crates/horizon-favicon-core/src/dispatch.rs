//! A dedicated single thread acting as the UI/event thread.
//!
//! [`DispatchThread`] owns one named thread that executes dispatched tasks
//! sequentially, in submission order. Hosts without their own event loop use
//! it as the default [`Dispatcher`]; all favicon cache writes and repaint
//! notifications then happen on this thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

use crate::error::{CoreError, Result};
use crate::executor::{Dispatcher, Task};
use crate::logging::targets;

/// Configuration for a [`DispatchThread`].
#[derive(Debug, Clone)]
pub struct DispatchThreadConfig {
    /// Name of the dispatch thread.
    pub name: String,
    /// Stack size in bytes. `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for DispatchThreadConfig {
    fn default() -> Self {
        Self {
            name: "horizon-favicon-dispatch".to_string(),
            stack_size: None,
        }
    }
}

impl DispatchThreadConfig {
    /// Create a configuration with the given thread name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

enum DispatchMessage {
    Run(Task),
    Shutdown,
}

/// A single thread that runs dispatched tasks in order.
pub struct DispatchThread {
    sender: Sender<DispatchMessage>,
    handle: Mutex<Option<JoinHandle<()>>>,
    running: Arc<AtomicBool>,
    thread_id: ThreadId,
}

impl DispatchThread {
    /// Start a dispatch thread with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(DispatchThreadConfig::default())
    }

    /// Start a dispatch thread with custom configuration.
    pub fn with_config(config: DispatchThreadConfig) -> Result<Self> {
        let (sender, receiver) = unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = running.clone();

        let mut builder = thread::Builder::new().name(config.name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let handle = builder
            .spawn(move || {
                dispatch_loop(receiver);
                thread_running.store(false, Ordering::Release);
            })
            .map_err(|source| CoreError::ThreadSpawn {
                name: config.name,
                source,
            })?;

        Ok(Self {
            sender,
            thread_id: handle.thread().id(),
            handle: Mutex::new(Some(handle)),
            running,
        })
    }

    /// Returns `true` while the thread accepts work.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns `true` when called from the dispatch thread itself.
    pub fn is_dispatch_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Finish queued tasks, then stop the thread and wait for it.
    ///
    /// Returns `false` if already joined or the thread panicked.
    pub fn stop_and_join(&self) -> bool {
        self.running.store(false, Ordering::Release);
        let _ = self.sender.send(DispatchMessage::Shutdown);
        match self.handle.lock().take() {
            Some(handle) if !self.is_dispatch_thread() => handle.join().is_ok(),
            _ => false,
        }
    }
}

fn dispatch_loop(receiver: Receiver<DispatchMessage>) {
    while let Ok(message) = receiver.recv() {
        match message {
            DispatchMessage::Run(task) => {
                // A panicking task must not take the UI thread down with it.
                if std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)).is_err() {
                    tracing::error!(target: targets::DISPATCH, "dispatched task panicked");
                }
            }
            DispatchMessage::Shutdown => break,
        }
    }
    tracing::debug!(target: targets::DISPATCH, "dispatch thread exiting");
}

impl Dispatcher for DispatchThread {
    fn dispatch(&self, task: Task) {
        if !self.is_running() {
            tracing::warn!(target: targets::DISPATCH, "dispatch after shutdown; task dropped");
            return;
        }
        if self.sender.send(DispatchMessage::Run(task)).is_err() {
            tracing::warn!(target: targets::DISPATCH, "dispatch thread gone; task dropped");
        }
    }
}

impl Drop for DispatchThread {
    fn drop(&mut self) {
        let _ = self.sender.send(DispatchMessage::Shutdown);
    }
}

impl std::fmt::Debug for DispatchThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchThread")
            .field("running", &self.is_running())
            .field("thread_id", &self.thread_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::time::Duration;

    #[test]
    fn test_tasks_run_in_order_on_one_thread() {
        let dispatcher = DispatchThread::new().unwrap();
        let (tx, rx) = bounded(10);

        for i in 0..10 {
            let tx = tx.clone();
            dispatcher.dispatch(Box::new(move || {
                let _ = tx.send((i, std::thread::current().id()));
            }));
        }

        let received: Vec<_> = (0..10)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        let order: Vec<_> = received.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
        assert!(received.iter().all(|(_, id)| *id == received[0].1));
        assert_ne!(received[0].1, std::thread::current().id());
    }

    #[test]
    fn test_panic_does_not_stop_thread() {
        let dispatcher = DispatchThread::new().unwrap();
        dispatcher.dispatch(Box::new(|| panic!("boom")));

        let (tx, rx) = bounded(1);
        dispatcher.dispatch(Box::new(move || {
            let _ = tx.send(7);
        }));
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
    }

    #[test]
    fn test_stop_and_join() {
        let dispatcher = DispatchThread::with_config(DispatchThreadConfig::with_name("ui")).unwrap();
        assert!(dispatcher.is_running());
        assert!(!dispatcher.is_dispatch_thread());
        assert!(dispatcher.stop_and_join());
        assert!(!dispatcher.is_running());
        assert!(!dispatcher.stop_and_join());
    }
}
