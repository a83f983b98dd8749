use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use webindexer_fileproc::FileWorker;

use crate::calculator::calculate;

/// (path, simhash, token count) — the unit of work produced per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSimilarityInfo {
    pub path: String,
    pub simhash: u64,
    pub size: u64,
}

/// Per-thread worker: reduces each file to inner text via the HTML-to-text collaborator,
/// computes its SimHash, and buffers results locally until merged under the shared mutex.
pub struct FileSimhashBuilder {
    local: Vec<DocumentSimilarityInfo>,
    shared: Arc<Mutex<Vec<DocumentSimilarityInfo>>>,
}

impl FileSimhashBuilder {
    pub fn new(shared: Arc<Mutex<Vec<DocumentSimilarityInfo>>>) -> Self {
        FileSimhashBuilder {
            local: Vec::new(),
            shared,
        }
    }
}

impl FileWorker for FileSimhashBuilder {
    fn process(&mut self, path: &str) -> bool {
        let raw = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "failed to open file for simhashing");
                return false;
            }
        };
        let text = webindexer_htmltext::inner_text(&raw);
        let (simhash, token_count) = calculate(&text);
        self.local.push(DocumentSimilarityInfo {
            path: path.to_string(),
            simhash,
            size: token_count as u64,
        });
        true
    }

    fn merge_thread_resources(&mut self) {
        self.shared.lock().unwrap().extend(self.local.drain(..));
    }
}

/// Writes the `simhashes` file: one `path size hash` line per document.
pub fn write_simhashes(path: &Path, docs: &[DocumentSimilarityInfo]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    for doc in docs {
        writeln!(file, "{} {} {}", doc.path, doc.size, doc.simhash)?;
    }
    Ok(())
}

/// Reads a `simhashes` file back. Ids are assigned densely [0,N) in file order.
pub fn read_simhashes(path: &Path) -> std::io::Result<Vec<DocumentSimilarityInfo>> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut parts = trimmed.rsplitn(3, ' ');
        let hash_str = parts.next().unwrap_or("");
        let size_str = parts.next().unwrap_or("");
        let path_str = parts.next().unwrap_or("");
        let (Ok(size), Ok(hash)) = (size_str.parse::<u64>(), hash_str.parse::<u64>()) else {
            continue;
        };
        out.push(DocumentSimilarityInfo {
            path: path_str.to_string(),
            simhash: hash,
            size,
        });
    }
    Ok(out)
}
