use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use regex::Regex;
use webindexer_clusters::{build as build_clusters, ClusterParams, DocumentInfo};
use webindexer_concurrent::BoundedQueue;
use webindexer_fileproc::{spawn_worker, FileFinder};
use webindexer_simhash::{read_simhashes, write_simhashes, DocumentSimilarityInfo, FileSimhashBuilder};

const WORKER_COUNT: usize = 4;

pub fn build(path: &Path, out: &Path) -> Result<()> {
    let queue = Arc::new(BoundedQueue::new());
    let mut finder = FileFinder::new(queue.clone(), Regex::new(r".").unwrap());
    finder.add_path_for_processing(path);
    finder.start();

    let shared = Arc::new(Mutex::new(Vec::new()));
    let handles: Vec<_> = (0..WORKER_COUNT)
        .map(|_| spawn_worker(FileSimhashBuilder::new(shared.clone()), queue.clone()))
        .collect();

    finder.wait();
    for h in handles {
        h.wait();
    }

    let docs: Vec<DocumentSimilarityInfo> = shared.lock().unwrap().clone();
    write_simhashes(out, &docs)?;
    tracing::info!(count = docs.len(), out = %out.display(), "simhash build finished");
    Ok(())
}

pub fn find(input: &Path, bits: u32, params: &ClusterParams) -> Result<()> {
    let docs = read_simhashes(input)?;
    if docs.is_empty() {
        bail!("no simhashes found in {}", input.display());
    }

    let doc_infos: Vec<DocumentInfo> = docs
        .iter()
        .enumerate()
        .map(|(i, d)| DocumentInfo {
            id: i as u32,
            path: d.path.clone(),
            simhash: d.simhash,
            size: d.size,
        })
        .collect();

    let clusters = build_clusters(&doc_infos, bits, params);
    let by_id: std::collections::HashMap<u32, &DocumentInfo> =
        doc_infos.iter().map(|d| (d.id, d)).collect();

    let clusters_path = PathBuf::from(format!("clusters_{bits}"));
    let sizes_path = PathBuf::from(format!("clusters_{bits}_sizes"));

    let mut clusters_file = fs::File::create(&clusters_path)?;
    let mut sizes_file = fs::File::create(&sizes_path)?;

    for (i, cluster) in clusters.iter().enumerate() {
        writeln!(clusters_file, "Cluster number: {i}")?;
        for &id in cluster {
            writeln!(clusters_file, "{}", by_id[&id].path)?;
        }
        writeln!(sizes_file, "{}", cluster.len())?;
    }

    tracing::info!(clusters = clusters.len(), "simhash find finished");
    Ok(())
}
