use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use webindexer_concurrent::BoundedQueue;

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Per-worker behavior, realized as a trait rather than the base-class-with-virtuals shape of
/// the original: a worker carries its own local state and is told how to fold it into a shared
/// aggregate exactly once, after its loop exits.
pub trait FileWorker: Send {
    fn process(&mut self, path: &str) -> bool;
    fn merge_thread_resources(&mut self);
}

/// A running worker thread. `wait()` clears `waitingForInput` and joins, matching the
/// finder/worker-pool lifecycle: start finder, start N workers, `finder.wait()`, `workers.wait()`.
pub struct WorkerHandle {
    waiting_for_input: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    join: JoinHandle<usize>,
}

impl WorkerHandle {
    /// Clears `waitingForInput` and blocks until the worker has drained the queue and merged
    /// its local state. Returns the number of items this worker processed.
    pub fn wait(self) -> usize {
        self.waiting_for_input.store(false, Ordering::SeqCst);
        self.join.join().expect("worker thread panicked")
    }

    /// Hard stop: worker exits at the next loop head without draining the queue.
    pub fn stop(&self) {
        self.waiting_for_input.store(false, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Spawns a worker thread running:
/// ```text
/// while running && (waitingForInput || !queue.empty()):
///     p <- queue.blocking_pop(100ms)
///     if p: if process(p): processedCount++
/// merge_thread_resources()
/// ```
pub fn spawn_worker<W>(mut worker: W, queue: Arc<BoundedQueue<String>>) -> WorkerHandle
where
    W: FileWorker + 'static,
{
    let waiting_for_input = Arc::new(AtomicBool::new(true));
    let running = Arc::new(AtomicBool::new(true));
    let wfi = waiting_for_input.clone();
    let run_flag = running.clone();

    let join = thread::spawn(move || {
        let mut processed = 0usize;
        while run_flag.load(Ordering::SeqCst) && (wfi.load(Ordering::SeqCst) || !queue.is_empty())
        {
            if let Some(path) = queue.blocking_pop(POLL_TIMEOUT) {
                if worker.process(&path) {
                    processed += 1;
                }
            }
        }
        worker.merge_thread_resources();
        processed
    });

    WorkerHandle {
        waiting_for_input,
        running,
        join,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CountingWorker {
        local: Vec<String>,
        shared: Arc<Mutex<Vec<String>>>,
    }

    impl FileWorker for CountingWorker {
        fn process(&mut self, path: &str) -> bool {
            self.local.push(path.to_string());
            true
        }
        fn merge_thread_resources(&mut self) {
            self.shared.lock().unwrap().extend(self.local.drain(..));
        }
    }

    #[test]
    fn worker_drains_queue_and_merges_on_wait() {
        let queue = Arc::new(BoundedQueue::new());
        queue.push("a".to_string());
        queue.push("b".to_string());
        let shared = Arc::new(Mutex::new(Vec::new()));

        let worker = CountingWorker {
            local: Vec::new(),
            shared: shared.clone(),
        };
        let handle = spawn_worker(worker, queue);
        let processed = handle.wait();

        assert_eq!(processed, 2);
        let mut items = shared.lock().unwrap().clone();
        items.sort();
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }
}
