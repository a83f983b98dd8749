use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::{fs, io};

use regex::Regex;

use webindexer_concurrent::BoundedQueue;

/// Recursive directory walker. Pushes regular files whose path matches `filter` onto a shared
/// queue for a worker pool to consume. Canonicalized directories are tracked so that symlink
/// cycles terminate.
pub struct FileFinder {
    queue: Arc<BoundedQueue<String>>,
    filter: Regex,
    roots: Vec<PathBuf>,
    handle: Option<JoinHandle<()>>,
}

impl FileFinder {
    pub fn new(queue: Arc<BoundedQueue<String>>, filter: Regex) -> Self {
        FileFinder {
            queue,
            filter,
            roots: Vec::new(),
            handle: None,
        }
    }

    pub fn add_path_for_processing(&mut self, path: impl Into<PathBuf>) {
        self.roots.push(path.into());
    }

    pub fn start(&mut self) {
        let roots = std::mem::take(&mut self.roots);
        let queue = self.queue.clone();
        let filter = self.filter.clone();
        self.handle = Some(thread::spawn(move || run(roots, queue, &filter)));
    }

    pub fn wait(&mut self) {
        if let Some(h) = self.handle.take() {
            h.join().expect("file finder thread panicked");
        }
    }
}

fn run(roots: Vec<PathBuf>, queue: Arc<BoundedQueue<String>>, filter: &Regex) {
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut pending: VecDeque<PathBuf> = roots.into_iter().collect();

    while let Some(path) = pending.pop_front() {
        if path.is_dir() {
            match visit_directory(&path, &mut visited) {
                Ok(true) => {}
                Ok(false) => continue, // already visited, cycle guard
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to canonicalize directory");
                    continue;
                }
            }
            match fs::read_dir(&path) {
                Ok(entries) => {
                    for entry in entries.flatten() {
                        let child = entry.path();
                        if child.is_dir() {
                            pending.push_back(child);
                        } else if filter.is_match(&child.to_string_lossy()) {
                            queue.push(child.to_string_lossy().to_string());
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read directory");
                }
            }
        } else if filter.is_match(&path.to_string_lossy()) {
            queue.push(path.to_string_lossy().to_string());
        }
    }
}

fn visit_directory(path: &PathBuf, visited: &mut HashSet<PathBuf>) -> io::Result<bool> {
    let canon = fs::canonicalize(path)?;
    Ok(visited.insert(canon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn finds_files_matching_filter_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), b"y").unwrap();
        std::fs::write(dir.path().join("c.html"), b"z").unwrap();

        let queue = Arc::new(BoundedQueue::new());
        let mut finder = FileFinder::new(queue.clone(), Regex::new(r"\.txt$").unwrap());
        finder.add_path_for_processing(dir.path());
        finder.start();
        finder.wait();

        let mut found = Vec::new();
        while let Some(p) = queue.blocking_pop(Duration::from_millis(50)) {
            found.push(p);
        }
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.ends_with(".txt")));
    }
}
