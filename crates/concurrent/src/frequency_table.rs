use std::collections::HashMap;
use std::sync::Mutex;

/// Thread-safe word/token counter, used by worker-pool merges that fold per-thread local
/// frequency tables into one shared aggregate.
pub struct ConcurrentFrequencyTable {
    words: Mutex<HashMap<String, i64>>,
}

impl Default for ConcurrentFrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcurrentFrequencyTable {
    pub fn new() -> Self {
        ConcurrentFrequencyTable {
            words: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_word(&self, word: &str, count: i64) {
        let mut words = self.words.lock().unwrap();
        *words.entry(word.to_string()).or_insert(0) += count;
    }

    pub fn word_frequency(&self, word: &str) -> i64 {
        self.words.lock().unwrap().get(word).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> HashMap<String, i64> {
        self.words.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_word_accumulates_across_calls() {
        let t = ConcurrentFrequencyTable::new();
        t.add_word("foo", 2);
        t.add_word("foo", 3);
        assert_eq!(t.word_frequency("foo"), 5);
    }
}
