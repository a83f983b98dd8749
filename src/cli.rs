use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "webindexer", about = "Offline search-and-analysis pipeline over a web domain")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a domain starting from a seed URL.
    Crawl {
        url: String,
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long)]
        depth: Option<u32>,
        #[arg(long)]
        pages: Option<u64>,
        #[arg(long)]
        dest: Option<PathBuf>,
        #[arg(long = "continue")]
        resume: bool,
        #[arg(long)]
        verbose: bool,
    },
    /// Copy crawler output into sequentially numbered files plus a url mapping.
    Flatten { site_dir: PathBuf, out_dir: PathBuf },
    /// Convert flattened HTML into plain text and a token_frequency file.
    Extract {
        urls_dir: PathBuf,
        urls_mapping: PathBuf,
        out_dir: PathBuf,
    },
    /// Build or query SimHash near-duplicate clusters.
    Simhash {
        #[arg(long)]
        build: bool,
        #[arg(long)]
        find: bool,
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long, default_value = "simhashes")]
        out: PathBuf,
        #[arg(long, default_value = "simhashes")]
        r#in: PathBuf,
        #[arg(long, default_value_t = 3)]
        bits: u32,
    },
    /// Compute link-graph statistics: degrees, BFS distances, PageRank.
    Webgraph {
        urls_mapping: PathBuf,
        /// Seed URL that BFS distances are measured from.
        #[arg(long)]
        domain: String,
    },
    /// Run ranked phrase queries (TF-IDF and BM25) from standard input.
    Search {
        dictionary: PathBuf,
        index: PathBuf,
    },
}
