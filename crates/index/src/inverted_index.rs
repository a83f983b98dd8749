use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use webindexer_core::IndexError;

/// Posting lists keyed by word index, plus the per-document statistics the scoring formulas
/// need (max term frequency per document, document count, average document length).
///
/// `average_document_length` is computed as the correct final mean (total posting-tf summed
/// across the whole index, divided by the final document count) rather than the divergent
/// per-line incremental mean of the source this was ported from.
pub struct InvertedIndex {
    postings: HashMap<i32, HashMap<u32, u32>>,
    documents: HashSet<u32>,
    max_tf_per_doc: HashMap<u32, u32>,
    average_document_length: f64,
}

impl InvertedIndex {
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);

        let mut postings: HashMap<i32, HashMap<u32, u32>> = HashMap::new();
        let mut documents: HashSet<u32> = HashSet::new();
        let mut max_tf_per_doc: HashMap<u32, u32> = HashMap::new();
        let mut total_tf_sum: u64 = 0;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut tokens = trimmed.split_whitespace();
            let word_index: i32 = tokens
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| IndexError::CorruptIndexLine {
                    line_no,
                    text: line.clone(),
                })?;

            let entry = postings.entry(word_index).or_default();
            for token in tokens {
                let (doc_str, tf_str) =
                    token
                        .split_once(':')
                        .ok_or_else(|| IndexError::CorruptIndexLine {
                            line_no,
                            text: line.clone(),
                        })?;
                let doc_id: u32 =
                    doc_str
                        .parse()
                        .map_err(|_| IndexError::CorruptIndexLine {
                            line_no,
                            text: line.clone(),
                        })?;
                let tf: u32 = tf_str
                    .parse()
                    .map_err(|_| IndexError::CorruptIndexLine {
                        line_no,
                        text: line.clone(),
                    })?;

                entry.insert(doc_id, tf);
                documents.insert(doc_id);
                total_tf_sum += tf as u64;
                let max_tf = max_tf_per_doc.entry(doc_id).or_insert(0);
                if tf > *max_tf {
                    *max_tf = tf;
                }
            }
        }

        let average_document_length = if documents.is_empty() {
            0.0
        } else {
            total_tf_sum as f64 / documents.len() as f64
        };

        Ok(InvertedIndex {
            postings,
            documents,
            max_tf_per_doc,
            average_document_length,
        })
    }

    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        for (word_index, docs) in &self.postings {
            let mut parts: Vec<String> =
                docs.iter().map(|(doc, tf)| format!("{doc}:{tf}")).collect();
            parts.sort();
            if parts.is_empty() {
                writeln!(file, "{word_index}")?;
            } else {
                writeln!(file, "{word_index} {}", parts.join(" "))?;
            }
        }
        Ok(())
    }

    pub fn from_postings(postings: HashMap<i32, HashMap<u32, u32>>) -> Self {
        let mut documents = HashSet::new();
        let mut max_tf_per_doc: HashMap<u32, u32> = HashMap::new();
        let mut total_tf_sum: u64 = 0;
        for doc_tfs in postings.values() {
            for (&doc, &tf) in doc_tfs {
                documents.insert(doc);
                total_tf_sum += tf as u64;
                let max_tf = max_tf_per_doc.entry(doc).or_insert(0);
                if tf > *max_tf {
                    *max_tf = tf;
                }
            }
        }
        let average_document_length = if documents.is_empty() {
            0.0
        } else {
            total_tf_sum as f64 / documents.len() as f64
        };
        InvertedIndex {
            postings,
            documents,
            max_tf_per_doc,
            average_document_length,
        }
    }

    pub fn postings_for(&self, word_index: i32) -> Option<&HashMap<u32, u32>> {
        self.postings.get(&word_index)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn max_tf(&self, doc: u32) -> u32 {
        self.max_tf_per_doc.get(&doc).copied().unwrap_or(1).max(1)
    }

    pub fn average_document_length(&self) -> f64 {
        self.average_document_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_parses_postings_and_tracks_max_tf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index");
        fs::write(&path, "1 10:2 11:1\n2 10:1\n").unwrap();
        let idx = InvertedIndex::load(&path).unwrap();
        assert_eq!(idx.postings_for(1).unwrap().get(&10), Some(&2));
        assert_eq!(idx.document_count(), 2);
        assert_eq!(idx.max_tf(10), 2);
    }

    #[test]
    fn average_document_length_is_the_correct_final_mean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index");
        // doc 10 has tf 2+1=3 total, doc 11 has tf 1; corrected mean = (2+1+1)/2 = 2.0
        fs::write(&path, "1 10:2 11:1\n2 10:1\n").unwrap();
        let idx = InvertedIndex::load(&path).unwrap();
        assert_eq!(idx.average_document_length(), 2.0);
    }

    #[test]
    fn corrupt_line_propagates_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index");
        fs::write(&path, "1 notanumber\n").unwrap();
        assert!(InvertedIndex::load(&path).is_err());
    }
}
