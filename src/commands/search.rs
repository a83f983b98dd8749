use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use webindexer_index::{Dictionary, InvertedIndex};
use webindexer_search::{search_bm25, search_tfidf};

const TOP_K: usize = 10;

/// Reads phrase queries from standard input, one per line, and prints the top-10 TF-IDF results
/// followed by the top-10 BM25 results for each, terminating on EOF.
pub fn run(dictionary_path: &Path, index_path: &Path) -> Result<()> {
    let dictionary = Dictionary::load(dictionary_path)?;
    let index = InvertedIndex::load(index_path)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let query = line?;
        let query = query.trim();
        if query.is_empty() {
            continue;
        }

        for result in search_tfidf(&dictionary, &index, query, TOP_K) {
            writeln!(out, "id: {}  score: {}", result.doc_id, result.score)?;
        }
        for result in search_bm25(&dictionary, &index, query, TOP_K) {
            writeln!(out, "id: {}  score: {}", result.doc_id, result.score)?;
        }
    }

    Ok(())
}
