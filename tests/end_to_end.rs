use std::collections::HashMap;

use webindexer_clusters::{build as build_clusters, ClusterParams, DocumentInfo};
use webindexer_index::{Dictionary, InvertedIndex};
use webindexer_search::search_tfidf;
use webindexer_webgraph::WebGraph;

#[test]
fn dictionary_index_query_intersects_and_scores_as_specified() {
    let dictionary = Dictionary::from_rows(vec![("foo".to_string(), 1, 2), ("bar".to_string(), 2, 3)]);

    let mut postings: HashMap<i32, HashMap<u32, u32>> = HashMap::new();
    postings.insert(1, HashMap::from([(10, 2), (11, 1)]));
    postings.insert(2, HashMap::from([(10, 1)]));
    let index = InvertedIndex::from_postings(postings);

    let results = search_tfidf(&dictionary, &index, "foo bar", 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, 10);

    // N=2, df(foo)=2, df(bar)=1, max_f(10)=2
    let idf_foo = ((2.0_f64 - 2.0 + 0.5) / (2.0 + 0.5)).ln();
    let idf_bar = ((2.0_f64 - 1.0 + 0.5) / (1.0 + 0.5)).ln();
    let tf_foo = 0.5 + 0.5 * 2.0 / 2.0;
    let tf_bar = 0.5 + 0.5 * 1.0 / 2.0;
    let expected = idf_foo * tf_foo + idf_bar * tf_bar;
    assert!((results[0].score - expected).abs() < 1e-9);
}

#[test]
fn near_duplicate_pair_clusters_within_hamming_threshold_but_not_below_it() {
    let docs = vec![
        DocumentInfo {
            id: 0,
            path: "a.html".to_string(),
            simhash: 0b0000_0000,
            size: 100,
        },
        DocumentInfo {
            id: 1,
            path: "b.html".to_string(),
            simhash: 0b0000_0111, // differs in exactly 3 bits
            size: 110,
        },
    ];

    let clusters_loose = build_clusters(&docs, 5, &ClusterParams::default());
    assert_eq!(clusters_loose.len(), 1);

    let clusters_tight = build_clusters(&docs, 2, &ClusterParams::default());
    assert_eq!(clusters_tight.len(), 2);
}

#[test]
fn pagerank_orders_sink_above_intermediate_above_source_after_30_iterations() {
    let mut graph = WebGraph::new();
    let a = graph.add_url("a");
    let b = graph.add_url("b");
    let c = graph.add_url("c");
    graph.add_link(a, b).unwrap();
    graph.add_link(a, c).unwrap();
    graph.add_link(b, c).unwrap();

    let ranks = graph.pagerank();
    assert!(ranks[c as usize] > ranks[b as usize]);
    assert!(ranks[b as usize] > ranks[a as usize]);
}
