mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

// mimalloc avoids glibc malloc's reluctance to release memory back to the OS under the
// crawler's and file-worker pools' high churn.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use webindexer_clusters::ClusterParams;
use webindexer_core::config::AppConfig;

use crate::cli::{Cli, Commands};

const CONFIG_PATH: &str = "webindexer.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config: AppConfig = match std::fs::read_to_string(CONFIG_PATH) {
        Ok(raw) => toml::from_str(&raw)?,
        Err(_) => {
            warn!(path = CONFIG_PATH, "config file not found, using defaults");
            AppConfig::default()
        }
    };

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            url,
            threads,
            depth,
            pages,
            dest,
            resume,
            verbose,
        } => commands::crawl::run(&config, url, threads, depth, pages, dest, resume, verbose)?,

        Commands::Flatten { site_dir, out_dir } => commands::flatten::run(&site_dir, &out_dir)?,

        Commands::Extract {
            urls_dir,
            urls_mapping,
            out_dir,
        } => commands::extract::run(&urls_dir, &urls_mapping, &out_dir)?,

        Commands::Simhash {
            build,
            find,
            path,
            out,
            r#in,
            bits,
        } => {
            if build {
                let path = path.ok_or_else(|| anyhow::anyhow!("--build requires --path"))?;
                commands::simhash::build(&path, &out)?;
            } else if find {
                let params = ClusterParams {
                    window: config.clusters.window,
                    rotate_step: config.clusters.rotate_step,
                    size_proportion: config.clusters.size_proportion,
                };
                commands::simhash::find(&r#in, bits, &params)?;
            } else {
                anyhow::bail!("simhash requires --build or --find");
            }
        }

        Commands::Webgraph { urls_mapping, domain } => {
            commands::webgraph::run(&urls_mapping, &domain)?
        }

        Commands::Search { dictionary, index } => commands::search::run(&dictionary, &index)?,
    }

    Ok(())
}
