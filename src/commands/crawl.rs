use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use webindexer_core::config::AppConfig;
use webindexer_core::Timer;
use webindexer_crawler::Crawler;

#[allow(clippy::too_many_arguments)]
pub fn run(
    config: &AppConfig,
    url: String,
    threads: Option<usize>,
    depth: Option<u32>,
    pages: Option<u64>,
    dest: Option<PathBuf>,
    resume: bool,
    verbose: bool,
) -> Result<()> {
    let n_threads = threads.unwrap_or(config.crawler.threads);
    let max_depth = depth.unwrap_or(config.crawler.depth);
    let max_pages = pages.unwrap_or(config.crawler.pages);
    let dest = dest.unwrap_or_else(|| PathBuf::from(&config.crawler.dest));

    let crawler = Crawler::new(
        url,
        max_depth,
        max_pages,
        &dest,
        n_threads,
        config.crawler.fetch_timeout_secs,
        verbose,
    )?;

    if resume {
        crawler.restore(&dest.join("new_urls.txt"), &dest.join("ready_urls.txt"))?;
    } else {
        crawler.seed_frontier();
    }

    let stopped = Arc::new(AtomicBool::new(false));
    let signal_crawler = crawler.clone();
    let signal_stopped = stopped.clone();
    ctrlc::set_handler(move || {
        if !signal_stopped.swap(true, Ordering::SeqCst) {
            tracing::info!("interrupt received, quiescing crawler");
            let _ = signal_crawler.stop();
        }
    })?;

    let timer = Timer::new("Total time");
    let downloaded = crawler.start();
    timer.stop();
    tracing::info!(pages = downloaded, "crawl finished");
    Ok(())
}
