//! Near-duplicate clustering over SimHash fingerprints: exact-dedup-by-drop-bit, rotate-window
//! similarity search, greedy degree-ordered clustering, and duplicate merge.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Input document record: dense id assigned on load, path kept for traceability, simhash and
/// token-count (`size`) drive the clustering decisions.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub id: u32,
    pub path: String,
    pub simhash: u64,
    pub size: u64,
}

pub struct ClusterParams {
    pub window: usize,
    pub rotate_step: u32,
    pub size_proportion: f64,
}

impl Default for ClusterParams {
    fn default() -> Self {
        ClusterParams {
            window: 20,
            rotate_step: 8,
            size_proportion: 1.25,
        }
    }
}

/// Runs all four phases and returns clusters (lists of document ids) sorted by descending size.
pub fn build(docs: &[DocumentInfo], bits: u32, params: &ClusterParams) -> Vec<Vec<u32>> {
    let by_id: HashMap<u32, &DocumentInfo> = docs.iter().map(|d| (d.id, d)).collect();

    let (working, same_simhashes) = drop_bit_dedup(docs, &by_id);
    let similar = find_similar(&working, &by_id, bits, params);

    let mut clusters: Vec<Vec<u32>> = Vec::new();
    let mut cluster_of: HashMap<u32, usize> = HashMap::new();
    greedy_cluster(&working, &similar, &mut clusters, &mut cluster_of);

    merge_duplicates(&same_simhashes, &mut clusters, &mut cluster_of);

    clusters.sort_by_key(|c| Reverse(c.len()));
    clusters
}

fn drop_bit(x: u64, bit: u32) -> u64 {
    if bit >= 64 {
        x
    } else {
        x & !(1u64 << bit)
    }
}

/// Phase A. Sweeps all 64 bit positions from 63 down to 0: sorts the working set by
/// `simhash with bit b cleared`, keeps the first of each run of equal keys as representative,
/// and records the rest in `sameSimhashes` in insertion order (needed for Phase D's reverse
/// walk).
fn drop_bit_dedup(
    docs: &[DocumentInfo],
    by_id: &HashMap<u32, &DocumentInfo>,
) -> (Vec<u32>, Vec<(u32, Vec<u32>)>) {
    let mut working: Vec<u32> = docs.iter().map(|d| d.id).collect();
    let mut same_simhashes: Vec<(u32, Vec<u32>)> = Vec::new();

    for b in (0..64u32).rev() {
        working.sort_by_key(|id| drop_bit(by_id[id].simhash, b));
        let mut new_working = Vec::with_capacity(working.len());
        let mut i = 0;
        while i < working.len() {
            let key = drop_bit(by_id[&working[i]].simhash, b);
            let rep = working[i];
            let mut j = i + 1;
            let mut dups = Vec::new();
            while j < working.len() && drop_bit(by_id[&working[j]].simhash, b) == key {
                dups.push(working[j]);
                j += 1;
            }
            new_working.push(rep);
            if !dups.is_empty() {
                same_simhashes.push((rep, dups));
            }
            i = j;
        }
        working = new_working;
    }

    (working, same_simhashes)
}

fn rotate_right(x: u64, k: u32) -> u64 {
    x.rotate_right(k % 64)
}

/// Phase B. `ROTATE_STEP`-spaced rotations (8 passes for the default 8-bit step), a sliding
/// window of `window` over the rotation-sorted order, a size filter, and a Hamming-distance
/// edge test, deduplicated via a compared-pairs set so each unordered pair is scored once.
fn find_similar(
    working: &[u32],
    by_id: &HashMap<u32, &DocumentInfo>,
    bits: u32,
    params: &ClusterParams,
) -> HashMap<u32, Vec<u32>> {
    let mut similar: HashMap<u32, HashSet<u32>> = HashMap::new();
    let mut compared: HashSet<(u32, u32)> = HashSet::new();
    let passes = 64 / params.rotate_step.max(1);

    for k in 0..passes {
        let rotation = k * params.rotate_step;
        let mut order: Vec<u32> = working.to_vec();
        order.sort_by_key(|id| rotate_right(by_id[id].simhash, rotation));

        for i in 0..order.len() {
            let end = (i + params.window).min(order.len());
            for j in (i + 1)..end {
                let a = order[i];
                let b = order[j];
                let pair = if a < b { (a, b) } else { (b, a) };
                if !compared.insert(pair) {
                    continue;
                }

                let doc_a = by_id[&a];
                let doc_b = by_id[&b];
                let size_min = doc_a.size.min(doc_b.size);
                let size_max = doc_a.size.max(doc_b.size);
                if size_min == 0 {
                    if size_max > 0 {
                        continue;
                    }
                } else if size_max as f64 > params.size_proportion * size_min as f64 {
                    continue;
                }

                let distance = (doc_a.simhash ^ doc_b.simhash).count_ones();
                if distance <= bits {
                    similar.entry(a).or_default().insert(b);
                    similar.entry(b).or_default().insert(a);
                }
            }
        }
    }

    similar
        .into_iter()
        .map(|(k, v)| (k, v.into_iter().collect()))
        .collect()
}

/// Phase C. Greedy clustering by descending neighbor-count: pop the highest-degree unclustered
/// vertex, start a cluster with it, add its unclustered neighbors directly (not transitively),
/// and decrement the stored degree of each added neighbor's still-unclustered neighbors.
fn greedy_cluster(
    working: &[u32],
    similar: &HashMap<u32, Vec<u32>>,
    clusters: &mut Vec<Vec<u32>>,
    cluster_of: &mut HashMap<u32, usize>,
) {
    let mut degree: HashMap<u32, i64> = working
        .iter()
        .map(|&id| (id, similar.get(&id).map(|v| v.len()).unwrap_or(0) as i64))
        .collect();
    let mut heap: BinaryHeap<(i64, Reverse<u32>)> = degree
        .iter()
        .map(|(&id, &d)| (d, Reverse(id)))
        .collect();
    let mut clustered: HashSet<u32> = HashSet::new();

    while let Some((d, Reverse(v))) = heap.pop() {
        if clustered.contains(&v) {
            continue;
        }
        if degree.get(&v).copied() != Some(d) {
            continue; // stale heap entry; degree changed since this was pushed
        }

        let cid = clusters.len();
        clusters.push(vec![v]);
        clustered.insert(v);
        cluster_of.insert(v, cid);

        if let Some(neighbors) = similar.get(&v) {
            for &w in neighbors {
                if clustered.contains(&w) {
                    continue;
                }
                clusters[cid].push(w);
                clustered.insert(w);
                cluster_of.insert(w, cid);

                if let Some(w_neighbors) = similar.get(&w) {
                    for &x in w_neighbors {
                        if !clustered.contains(&x) {
                            if let Some(deg) = degree.get_mut(&x) {
                                *deg -= 1;
                                heap.push((*deg, Reverse(x)));
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Phase D. Walks `sameSimhashes` in reverse insertion order so that representatives which
/// were themselves later folded into another cluster resolve correctly before their own
/// duplicates are attributed.
fn merge_duplicates(
    same_simhashes: &[(u32, Vec<u32>)],
    clusters: &mut [Vec<u32>],
    cluster_of: &mut HashMap<u32, usize>,
) {
    for (rep, dups) in same_simhashes.iter().rev() {
        if let Some(&cid) = cluster_of.get(rep) {
            for &d in dups {
                cluster_of.insert(d, cid);
                clusters[cid].push(d);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: u32, simhash: u64, size: u64) -> DocumentInfo {
        DocumentInfo {
            id,
            path: format!("doc{id}.html"),
            simhash,
            size,
        }
    }

    #[test]
    fn every_document_appears_in_exactly_one_cluster() {
        let docs = vec![doc(0, 0b1010, 10), doc(1, 0b1010, 10), doc(2, 0xFFFF_FFFF, 5)];
        let clusters = build(&docs, 0, &ClusterParams::default());
        let mut all_ids: Vec<u32> = clusters.iter().flatten().copied().collect();
        all_ids.sort();
        assert_eq!(all_ids, vec![0, 1, 2]);
    }

    #[test]
    fn bits_zero_only_merges_exact_hash_matches() {
        let docs = vec![doc(0, 1, 10), doc(1, 1, 10), doc(2, 2, 10)];
        let clusters = build(&docs, 0, &ClusterParams::default());
        let cluster_with_zero = clusters
            .iter()
            .find(|c| c.contains(&0))
            .expect("doc 0 in some cluster");
        assert!(cluster_with_zero.contains(&1));
        assert!(!cluster_with_zero.contains(&2));
    }

    #[test]
    fn close_hamming_distance_within_threshold_clusters_together() {
        // differ in exactly 3 bits
        let a = 0b0000_0000u64;
        let b = 0b0000_0111u64;
        let docs = vec![doc(0, a, 100), doc(1, b, 110)];
        let clusters = build(&docs, 5, &ClusterParams::default());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);

        let clusters_tight = build(&docs, 2, &ClusterParams::default());
        assert_eq!(clusters_tight.len(), 2);
    }

    #[test]
    fn clusters_are_sorted_by_descending_size() {
        let docs = vec![
            doc(0, 0, 10),
            doc(1, 0, 10),
            doc(2, 0, 10),
            doc(3, 0xFF, 10),
        ];
        let clusters = build(&docs, 0, &ClusterParams::default());
        for w in clusters.windows(2) {
            assert!(w[0].len() >= w[1].len());
        }
    }
}
