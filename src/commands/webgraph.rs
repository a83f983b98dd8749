use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use webindexer_urlutil::extract_links;
use webindexer_webgraph::WebGraph;

/// Rebuilds the link graph directly from a flattened page directory: each file's path relative
/// to `root`, with the trailing `.html` stripped, is its URL; outbound links are whatever
/// `extract_links` finds that also resolve to a known page. BFS distances are measured from
/// `domain`, which must resolve to a vertex already present in the graph.
pub fn run(root: &Path, domain: &str) -> Result<()> {
    let mut graph = WebGraph::new();
    let mut files = Vec::new();
    collect_html_files(root, &mut files);

    let mut contents = Vec::with_capacity(files.len());
    for path in &files {
        let url = path_to_url(root, path);
        graph.add_url(&url);
        contents.push((url, fs::read_to_string(path).unwrap_or_default()));
    }

    for (url, html) in &contents {
        let src = graph.vertex_of(url).expect("just added");
        for link in extract_links(url, html) {
            if let Some(dst) = graph.vertex_of(&link) {
                graph.add_link(src, dst)?;
            }
        }
    }

    let mut in_degree = vec![0u32; graph.vertices()];
    for v in 0..graph.vertices() as u32 {
        for &w in graph.get_links(v)? {
            in_degree[w as usize] += 1;
        }
    }

    let mut stats_file = fs::File::create("in_out_stats")?;
    for v in 0..graph.vertices() as u32 {
        let out_degree = graph.get_links(v)?.len();
        writeln!(stats_file, "{} {} {}", graph.url_of(v)?, in_degree[v as usize], out_degree)?;
    }

    let source = graph
        .vertex_of(domain)
        .ok_or_else(|| anyhow::anyhow!("domain '{domain}' has no page in '{}'", root.display()))?;
    let distances = graph.bfs_distances(source);
    let mut distances_file = fs::File::create("distances")?;
    for v in 0..graph.vertices() as u32 {
        writeln!(distances_file, "{} {}", graph.url_of(v)?, distances[v as usize])?;
    }

    let ranks = graph.pagerank();
    let mut pagerank_file = fs::File::create("pagerank")?;
    for (v, rank) in ranks.iter().enumerate() {
        writeln!(pagerank_file, "{} {}", graph.url_of(v as u32)?, rank)?;
    }

    tracing::info!(pages = graph.vertices(), edges = graph.edges(), "webgraph finished");
    Ok(())
}

fn collect_html_files(root: &Path, out: &mut Vec<std::path::PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_html_files(&path, out);
        } else if path.extension().and_then(|e| e.to_str()) == Some("html") {
            out.push(path);
        }
    }
}

fn path_to_url(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let s = relative.to_string_lossy().replace('\\', "/");
    s.strip_suffix(".html").unwrap_or(&s).to_string()
}
