//! Integration tests for background-to-UI-thread handoff.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::bounded;
use horizon_favicon_core::{
    DispatchThread, DispatchThreadConfig, Dispatcher, Executor, InvocationQueue, ThreadPool,
    ThreadPoolConfig,
};

#[test]
fn test_pool_result_delivered_on_dispatch_thread() {
    let pool = ThreadPool::new(ThreadPoolConfig::with_threads(2)).unwrap();
    let ui = Arc::new(DispatchThread::with_config(DispatchThreadConfig::with_name("test-ui")).unwrap());
    let (tx, rx) = bounded(1);

    let ui_for_task = ui.clone();
    pool.execute(Box::new(move || {
        let computed = 21 * 2;
        ui_for_task.dispatch(Box::new(move || {
            let name = std::thread::current().name().map(str::to_string);
            let _ = tx.send((computed, name));
        }));
    }));

    let (value, thread_name) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(value, 42);
    assert_eq!(thread_name.as_deref(), Some("test-ui"));
}

#[test]
fn test_manual_queues_give_deterministic_control() {
    let background = Arc::new(InvocationQueue::new());
    let ui = Arc::new(InvocationQueue::new());
    let log = Arc::new(parking_lot::Mutex::new(Vec::new()));

    for i in 0..3 {
        let ui = ui.clone();
        let log = log.clone();
        background.execute(Box::new(move || {
            log.lock().push(format!("bg-{i}"));
            let log = log.clone();
            ui.dispatch(Box::new(move || log.lock().push(format!("ui-{i}"))));
        }));
    }

    assert!(log.lock().is_empty());
    assert_eq!(background.process_pending(), 3);
    assert_eq!(ui.pending_count(), 3);
    assert_eq!(ui.process_pending(), 3);

    assert_eq!(
        *log.lock(),
        vec!["bg-0", "bg-1", "bg-2", "ui-0", "ui-1", "ui-2"]
    );
}
