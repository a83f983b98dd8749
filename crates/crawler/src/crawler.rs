use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use webindexer_core::CrawlError;
use webindexer_urlutil::{add_html_extension, extract_links, is_allowed, preprocess};

use crate::frontier::Frontier;

const ITERATION_DELAY: Duration = Duration::from_millis(200);
const IDLE_DELAY: Duration = Duration::from_millis(100);

struct Inner {
    seed: String,
    max_depth: u32,
    max_pages: AtomicU64,
    dest: PathBuf,
    n_threads: usize,
    client: reqwest::blocking::Client,
    frontier: Frontier,
    pages_downloaded: AtomicU64,
    pages_downloading_now: AtomicU64,
    finished_threads: AtomicUsize,
    verbose: bool,
}

/// Bounded concurrent crawler over a single domain. Cheaply cloneable (an `Arc` around shared
/// state) so a signal handler can call `stop()` on a clone while `start()` is still blocked on
/// its worker joins on another thread.
#[derive(Clone)]
pub struct Crawler {
    inner: Arc<Inner>,
}

impl Crawler {
    pub fn new(
        seed: String,
        max_depth: u32,
        max_pages: u64,
        dest: impl Into<PathBuf>,
        n_threads: usize,
        fetch_timeout_secs: u64,
        verbose: bool,
    ) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(Duration::from_secs(fetch_timeout_secs))
            .build()?;
        Ok(Crawler {
            inner: Arc::new(Inner {
                seed,
                max_depth,
                max_pages: AtomicU64::new(max_pages),
                dest: dest.into(),
                n_threads: n_threads.max(1),
                client,
                frontier: Frontier::new(),
                pages_downloaded: AtomicU64::new(0),
                pages_downloading_now: AtomicU64::new(0),
                finished_threads: AtomicUsize::new(0),
                verbose,
            }),
        })
    }

    /// Enqueues the seed URL at depth 0. Call this for a fresh run; call `restore` instead when
    /// resuming.
    pub fn seed_frontier(&self) {
        self.inner.frontier.try_add(self.inner.seed.clone(), 0);
    }

    /// Preloads `new_urls.txt` into the frontier at depth 0 and `ready_urls.txt` into the dedup
    /// set only (suppressing re-enqueue). Guards against the empty-line-at-EOF artifact the
    /// original reader produced.
    pub fn restore(&self, new_urls_path: &Path, ready_urls_path: &Path) -> std::io::Result<()> {
        for url in read_nonempty_lines(ready_urls_path)? {
            self.inner.frontier.mark_seen_only(url);
        }
        for url in read_nonempty_lines(new_urls_path)? {
            self.inner.frontier.try_add(url, 0);
        }
        Ok(())
    }

    pub fn pages_downloaded(&self) -> u64 {
        self.inner.pages_downloaded.load(Ordering::SeqCst)
    }

    /// Spawns `n_threads` workers and blocks until the frontier drains with all workers idle
    /// or the page budget is exhausted. Returns the number of pages downloaded.
    pub fn start(&self) -> u64 {
        let handles: Vec<JoinHandle<()>> = (0..self.inner.n_threads)
            .map(|_| {
                let crawler = self.clone();
                thread::spawn(move || crawler.worker_loop())
            })
            .collect();

        for h in handles {
            let _ = h.join();
        }

        self.inner.pages_downloaded.load(Ordering::SeqCst)
    }

    fn worker_loop(&self) {
        let n = self.inner.n_threads;
        let mut idle = false;

        loop {
            let downloaded = self.inner.pages_downloaded.load(Ordering::SeqCst);
            let finished = self.inner.finished_threads.load(Ordering::SeqCst);
            let max_pages = self.inner.max_pages.load(Ordering::SeqCst);

            if downloaded >= max_pages || (finished == n && self.inner.frontier.is_empty()) {
                break;
            }

            let downloading_now = self.inner.pages_downloading_now.load(Ordering::SeqCst);
            if downloaded + downloading_now < max_pages {
                if let Some(item) = self.inner.frontier.try_pop() {
                    if idle {
                        idle = false;
                        self.inner.finished_threads.fetch_sub(1, Ordering::SeqCst);
                    }
                    self.inner.pages_downloading_now.fetch_add(1, Ordering::SeqCst);
                    self.fetch_and_process(&item.url, item.depth);
                    self.inner.pages_downloading_now.fetch_sub(1, Ordering::SeqCst);
                } else if !idle {
                    idle = true;
                    self.inner.finished_threads.fetch_add(1, Ordering::SeqCst);
                } else {
                    thread::sleep(IDLE_DELAY);
                }
            } else if !idle {
                idle = true;
                self.inner.finished_threads.fetch_add(1, Ordering::SeqCst);
            } else {
                thread::sleep(IDLE_DELAY);
            }

            thread::sleep(ITERATION_DELAY);
        }
    }

    fn fetch_and_process(&self, url: &str, depth: u32) {
        if !is_allowed(&self.inner.seed, url) {
            return;
        }

        let full_url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{url}")
        };

        let body = match self.inner.client.get(&full_url).send() {
            Ok(resp) if resp.status().is_success() => match resp.bytes() {
                Ok(b) => b,
                Err(e) => {
                    self.log_transport_error(url, e.into());
                    return;
                }
            },
            Ok(resp) => {
                let status = resp.status();
                self.log_transport_error(url, anyhow::anyhow!("non-OK response: {status}"));
                return;
            }
            Err(e) => {
                self.log_transport_error(url, e.into());
                return;
            }
        };

        self.inner.pages_downloaded.fetch_add(1, Ordering::SeqCst);

        if let Err(e) = self.write_page(url, &body) {
            if self.inner.verbose {
                tracing::warn!(error = %e, "failed to persist page");
            }
        }

        if depth + 1 <= self.inner.max_depth {
            let body_str = String::from_utf8_lossy(&body);
            for link in extract_links(url, &body_str) {
                if is_allowed(&self.inner.seed, &link) {
                    self.inner.frontier.try_add(link, depth + 1);
                }
            }
        }
    }

    /// Logs a transport failure (bad body, non-OK status, connection error) at `warn` only when
    /// the crawler is running verbose; either way the page is dropped and not retried.
    fn log_transport_error(&self, url: &str, source: anyhow::Error) {
        if self.inner.verbose {
            let err = CrawlError::Transport { url: url.to_string(), source };
            tracing::warn!(error = %err, "dropping page");
        }
    }

    fn write_page(&self, url: &str, body: &[u8]) -> Result<(), CrawlError> {
        let relative = add_html_extension(&preprocess(url));
        let path = self.inner.dest.join(&relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CrawlError::Filesystem {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(&path, body).map_err(|source| CrawlError::Filesystem {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }

    /// Quiesces workers (`maxPages <- 0`), waits ~1s for in-flight fetches to finish, then
    /// persists the remaining frontier to `new_urls.txt` and the complement of the dedup set
    /// to `ready_urls.txt` under `dest`.
    pub fn stop(&self) -> std::io::Result<()> {
        self.inner.max_pages.store(0, Ordering::SeqCst);
        thread::sleep(Duration::from_secs(1));

        fs::create_dir_all(&self.inner.dest)?;
        let remaining = self.inner.frontier.drain_remaining();
        let ready = self.inner.frontier.ready_urls(&remaining);

        write_lines(&self.inner.dest.join("new_urls.txt"), &remaining)?;
        write_lines(&self.inner.dest.join("ready_urls.txt"), &ready)?;
        Ok(())
    }
}

fn write_lines(path: &Path, lines: &[String]) -> std::io::Result<()> {
    let content = lines.join("\n");
    fs::write(path, content)
}

fn read_nonempty_lines(path: &Path) -> std::io::Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_depth_zero_downloads_only_seed() {
        let dir = tempfile::tempdir().unwrap();
        // Can't hit the network in a unit test; exercise write_page + frontier wiring instead.
        let crawler = Crawler::new(
            "example.org".to_string(),
            0,
            u64::MAX,
            dir.path(),
            1,
            15,
            false,
        )
        .unwrap();
        crawler.seed_frontier();
        assert_eq!(crawler.inner.frontier.drain_remaining(), vec!["example.org".to_string()]);
    }

    #[test]
    fn restore_guards_against_empty_lines() {
        let dir = tempfile::tempdir().unwrap();
        let new_urls = dir.path().join("new_urls.txt");
        let ready_urls = dir.path().join("ready_urls.txt");
        fs::write(&new_urls, "a\n\nb\n").unwrap();
        fs::write(&ready_urls, "c\n\n").unwrap();

        let crawler = Crawler::new(
            "example.org".to_string(),
            5,
            u64::MAX,
            dir.path(),
            1,
            15,
            false,
        )
        .unwrap();
        crawler.restore(&new_urls, &ready_urls).unwrap();

        let mut remaining = crawler.inner.frontier.drain_remaining();
        remaining.sort();
        assert_eq!(remaining, vec!["a".to_string(), "b".to_string()]);
        assert!(crawler.inner.frontier.mark_seen_only("c".to_string()) == false);
    }
}
