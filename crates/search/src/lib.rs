//! Phrase search over a loaded `Dictionary` + `InvertedIndex`: posting-list intersection
//! followed by TF-IDF and BM25 scoring.

use webindexer_index::{Dictionary, InvertedIndex};

const BM25_K: f64 = 1.5;
const BM25_B: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentScore {
    pub doc_id: u32,
    pub score: f64,
}

impl Eq for DocumentScore {}

impl Ord for DocumentScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

impl PartialOrd for DocumentScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn tokenize(query: &str) -> Vec<&str> {
    query
        .split(|c| c == ' ' || c == ',' || c == '\n' || c == '\t')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Word indices for each query token, or `None` if any token is missing from the dictionary.
fn resolve_tokens(dictionary: &Dictionary, query: &str) -> Option<Vec<i32>> {
    tokenize(query)
        .into_iter()
        .map(|tok| dictionary.index_of(tok))
        .collect()
}

/// Intersects posting-list document sets across query tokens, in token order.
fn candidate_documents(index: &InvertedIndex, word_indices: &[i32]) -> Vec<u32> {
    let mut candidates: Option<Vec<u32>> = None;
    for &w in word_indices {
        let docs: Vec<u32> = index
            .postings_for(w)
            .map(|postings| postings.keys().copied().collect())
            .unwrap_or_default();
        candidates = Some(match candidates {
            None => docs,
            Some(prev) => {
                let doc_set: std::collections::HashSet<u32> = docs.into_iter().collect();
                prev.into_iter().filter(|d| doc_set.contains(d)).collect()
            }
        });
    }
    candidates.unwrap_or_default()
}

fn idf(document_count: usize, document_frequency: usize) -> f64 {
    let n = document_count as f64;
    let df = document_frequency as f64;
    ((n - df + 0.5) / (df + 0.5)).ln()
}

/// Runs a phrase query against `dictionary`/`index` and returns the top `limit` results by
/// TF-IDF score, descending (ties broken by ascending document id).
pub fn search_tfidf(
    dictionary: &Dictionary,
    index: &InvertedIndex,
    query: &str,
    limit: usize,
) -> Vec<DocumentScore> {
    let Some(word_indices) = resolve_tokens(dictionary, query) else {
        return Vec::new();
    };
    let candidates = candidate_documents(index, &word_indices);
    let n = index.document_count();

    let mut scores: Vec<DocumentScore> = candidates
        .into_iter()
        .map(|doc_id| {
            let score: f64 = word_indices
                .iter()
                .map(|&w| {
                    let postings = index.postings_for(w).expect("candidate implies postings");
                    let df = postings.len();
                    let f = postings.get(&doc_id).copied().unwrap_or(0) as f64;
                    let max_f = index.max_tf(doc_id) as f64;
                    let tf = 0.5 + 0.5 * f / max_f;
                    idf(n, df) * tf
                })
                .sum();
            DocumentScore { doc_id, score }
        })
        .collect();

    scores.sort();
    scores.truncate(limit);
    scores
}

/// Same candidate set as [`search_tfidf`] but ranked with Okapi BM25.
pub fn search_bm25(
    dictionary: &Dictionary,
    index: &InvertedIndex,
    query: &str,
    limit: usize,
) -> Vec<DocumentScore> {
    let Some(word_indices) = resolve_tokens(dictionary, query) else {
        return Vec::new();
    };
    let candidates = candidate_documents(index, &word_indices);
    let n = index.document_count();
    let avgdl = index.average_document_length();

    let mut scores: Vec<DocumentScore> = candidates
        .into_iter()
        .map(|doc_id| {
            let score: f64 = word_indices
                .iter()
                .map(|&w| {
                    let postings = index.postings_for(w).expect("candidate implies postings");
                    let df = postings.len();
                    let f = postings.get(&doc_id).copied().unwrap_or(0) as f64;
                    let max_f = index.max_tf(doc_id) as f64;
                    let tf = f / max_f;
                    let denom = tf + BM25_K * (1.0 - BM25_B + BM25_B * n as f64 / avgdl);
                    if denom == 0.0 {
                        0.0
                    } else {
                        idf(n, df) * (tf * (BM25_K + 1.0)) / denom
                    }
                })
                .sum();
            DocumentScore { doc_id, score }
        })
        .collect();

    scores.sort();
    scores.truncate(limit);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fixture() -> (Dictionary, InvertedIndex) {
        let dictionary = Dictionary::from_rows(vec![
            ("rust".to_string(), 0, 2),
            ("crab".to_string(), 1, 1),
        ]);
        let mut postings: HashMap<i32, HashMap<u32, u32>> = HashMap::new();
        postings.insert(0, HashMap::from([(1, 3), (2, 1)]));
        postings.insert(1, HashMap::from([(1, 1)]));
        let index = InvertedIndex::from_postings(postings);
        (dictionary, index)
    }

    #[test]
    fn absent_token_returns_empty() {
        let (dictionary, index) = fixture();
        assert!(search_tfidf(&dictionary, &index, "nonexistent", 10).is_empty());
        assert!(search_bm25(&dictionary, &index, "nonexistent", 10).is_empty());
    }

    #[test]
    fn multi_token_query_intersects_posting_lists() {
        let (dictionary, index) = fixture();
        let results = search_tfidf(&dictionary, &index, "rust crab", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, 1);
    }

    #[test]
    fn single_token_query_ranks_higher_term_frequency_first() {
        let (dictionary, index) = fixture();
        let results = search_tfidf(&dictionary, &index, "rust", 10);
        assert_eq!(results[0].doc_id, 1);
        assert_eq!(results[1].doc_id, 2);
    }

    #[test]
    fn bm25_respects_limit() {
        let (dictionary, index) = fixture();
        let results = search_bm25(&dictionary, &index, "rust", 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn tokenizer_splits_on_spec_delimiters() {
        assert_eq!(tokenize("a,b\nc\td"), vec!["a", "b", "c", "d"]);
    }
}
