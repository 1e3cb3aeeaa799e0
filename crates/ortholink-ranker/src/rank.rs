//! Dense ranking of paralog candidates per source gene.

use std::cmp::Ordering;
use std::collections::HashMap;

use ortholink_common::{GeneKey, ParalogWeights, RelationshipRecord, TaxonId};
use serde::Serialize;
use tracing::info;

use crate::scorer::{max_alignment_length, score};

/// Dense ranks for `scores`, highest first, returned in input order.
///
/// Equal scores share a rank and the next distinct score gets the next
/// integer: `[10, 10, 7, 5]` ranks as `[1, 1, 2, 3]`. Scores compare
/// exactly, with no tolerance.
pub fn dense_rank(scores: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // Stable sort: ties keep input order.
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0u32; scores.len()];
    let mut previous_score: Option<f64> = None;
    let mut previous_rank = 0u32;
    for i in order {
        if previous_score != Some(scores[i]) {
            previous_rank += 1;
            previous_score = Some(scores[i]);
        }
        ranks[i] = previous_rank;
    }
    ranks
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RankSummary {
    pub groups: usize,
    pub ranked: usize,
    pub max_length: f64,
}

/// Score every candidate and write its dense rank within its gene1 group.
///
/// `possible_methods` gives the number of algorithms that ran for a species
/// pair. With the `parallel` feature, inputs larger than
/// `parallel_threshold` are scored and ranked on the rayon pool.
pub fn rank_paralogs<F>(
    records: &mut [RelationshipRecord],
    possible_methods: F,
    weights: &ParalogWeights,
    parallel_threshold: usize,
) -> RankSummary
where
    F: Fn(TaxonId, TaxonId) -> usize + Sync,
{
    let shared: &[RelationshipRecord] = records;
    let max_length = max_alignment_length(shared);
    let groups = group_by_gene1(shared);

    let score_of = |r: &RelationshipRecord| score(r, possible_methods(r.species1, r.species2), max_length, weights);

    #[cfg(feature = "parallel")]
    let assignments: Vec<(usize, u32)> = if shared.len() > parallel_threshold {
        use rayon::prelude::*;
        groups
            .par_iter()
            .flat_map_iter(|members| rank_group(shared, members, &score_of))
            .collect()
    } else {
        groups.iter().flat_map(|members| rank_group(shared, members, &score_of)).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let assignments: Vec<(usize, u32)> = {
        let _ = parallel_threshold;
        groups.iter().flat_map(|members| rank_group(shared, members, &score_of)).collect()
    };

    let ranked = assignments.len();
    for (i, rank) in assignments {
        records[i].rank = Some(rank);
    }

    info!(groups = groups.len(), ranked, max_length, "Paralog candidates ranked");
    RankSummary { groups: groups.len(), ranked, max_length }
}

fn rank_group<S>(records: &[RelationshipRecord], members: &[usize], score_of: &S) -> Vec<(usize, u32)>
where
    S: Fn(&RelationshipRecord) -> f64,
{
    let scores: Vec<f64> = members.iter().map(|&i| score_of(&records[i])).collect();
    members.iter().copied().zip(dense_rank(&scores)).collect()
}

/// Record indices grouped by gene1 key, groups in first-seen order.
fn group_by_gene1(records: &[RelationshipRecord]) -> Vec<Vec<usize>> {
    let mut slot: HashMap<GeneKey, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, r) in records.iter().enumerate() {
        let g = *slot.entry(r.gene1_key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(i);
    }
    groups
}
