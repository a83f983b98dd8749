use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Thread-safe FIFO queue with a blocking pull that honors a timeout.
///
/// `push` is never blocking and wakes exactly one waiter. `try_pop` never blocks.
/// `blocking_pop` waits up to `timeout` for a producer signal, then gives up.
pub struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,
    not_empty: Condvar,
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BoundedQueue<T> {
    pub fn new() -> Self {
        BoundedQueue {
            items: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Push a single item. Never blocks; wakes exactly one waiter.
    pub fn push(&self, item: T) {
        let mut items = self.items.lock().unwrap();
        items.push_back(item);
        self.not_empty.notify_one();
    }

    /// Non-blocking pop; `None` if the queue is currently empty.
    pub fn try_pop(&self) -> Option<T> {
        let mut items = self.items.lock().unwrap();
        items.pop_front()
    }

    /// Waits up to `timeout` for an item to appear, then pops it. `None` on timeout.
    pub fn blocking_pop(&self, timeout: Duration) -> Option<T> {
        let items = self.items.lock().unwrap();
        let (mut items, _timeout_result) = self
            .not_empty
            .wait_timeout_while(items, timeout, |q| q.is_empty())
            .unwrap();
        items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn push_then_try_pop_returns_fifo_order() {
        let q = BoundedQueue::new();
        q.push(1);
        q.push(2);
        assert_eq!(q.try_pop(), Some(1));
        assert_eq!(q.try_pop(), Some(2));
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn blocking_pop_times_out_on_empty_queue() {
        let q: BoundedQueue<i32> = BoundedQueue::new();
        let got = q.blocking_pop(Duration::from_millis(20));
        assert_eq!(got, None);
    }

    #[test]
    fn blocking_pop_wakes_on_push_from_another_thread() {
        let q = Arc::new(BoundedQueue::new());
        let q2 = q.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            q2.push(42);
        });
        let got = q.blocking_pop(Duration::from_secs(1));
        handle.join().unwrap();
        assert_eq!(got, Some(42));
    }
}
