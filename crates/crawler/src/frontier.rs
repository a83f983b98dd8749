use std::collections::HashSet;

use webindexer_concurrent::{BoundedQueue, ConcurrentSet};

/// A URL discovered but not yet fetched, tagged with its crawl depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    pub url: String,
    pub depth: u32,
}

/// Deduplicating FIFO frontier. An item exists at most once for its lifetime: `try_add` is a
/// `try_insert` on the dedup set, only newly-seen URLs are pushed onto the queue.
pub struct Frontier {
    queue: BoundedQueue<FrontierItem>,
    seen: ConcurrentSet<String>,
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontier {
    pub fn new() -> Self {
        Frontier {
            queue: BoundedQueue::new(),
            seen: ConcurrentSet::new(),
        }
    }

    /// Marks `url` seen and enqueues it at `depth` iff it was not already seen. Returns whether
    /// it was newly added.
    pub fn try_add(&self, url: String, depth: u32) -> bool {
        if self.seen.try_insert(url.clone()) {
            self.queue.push(FrontierItem { url, depth });
            true
        } else {
            false
        }
    }

    /// Marks `url` seen without enqueuing it — used to preload `ready_urls.txt` on resume so
    /// those URLs are suppressed rather than re-fetched.
    pub fn mark_seen_only(&self, url: String) -> bool {
        self.seen.try_insert(url)
    }

    pub fn try_pop(&self) -> Option<FrontierItem> {
        self.queue.try_pop()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn seen_snapshot(&self) -> Vec<String> {
        self.seen.snapshot()
    }

    /// Drains all items currently queued (used when persisting resume state on interrupt).
    pub fn drain_remaining(&self) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(item) = self.queue.try_pop() {
            out.push(item.url);
        }
        out
    }

    /// `ready_urls`: everything seen minus what is still queued.
    pub fn ready_urls(&self, remaining: &[String]) -> Vec<String> {
        let remaining_set: HashSet<&String> = remaining.iter().collect();
        self.seen
            .snapshot()
            .into_iter()
            .filter(|u| !remaining_set.contains(u))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_add_dedupes_by_url() {
        let f = Frontier::new();
        assert!(f.try_add("a".to_string(), 0));
        assert!(!f.try_add("a".to_string(), 1));
        let item = f.try_pop().unwrap();
        assert_eq!(item.url, "a");
        assert_eq!(item.depth, 0);
        assert!(f.try_pop().is_none());
    }

    #[test]
    fn mark_seen_only_suppresses_future_add_without_enqueueing() {
        let f = Frontier::new();
        f.mark_seen_only("a".to_string());
        assert!(!f.try_add("a".to_string(), 0));
        assert!(f.is_empty());
    }

    #[test]
    fn ready_urls_is_seen_minus_remaining() {
        let f = Frontier::new();
        f.try_add("a".to_string(), 0);
        f.try_add("b".to_string(), 0);
        let remaining = vec!["b".to_string()];
        let mut ready = f.ready_urls(&remaining);
        ready.sort();
        assert_eq!(ready, vec!["a".to_string()]);
    }
}
