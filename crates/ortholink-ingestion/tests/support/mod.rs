//! Row builders for pipeline tests.

#![allow(dead_code)]

use ortholink_common::{BestScore, GeneKey, TaxonId};
use ortholink_ingestion::{AlignmentRow, BestScoreRow, GeneInfoRow, PairEvidenceRow};

pub fn gene_row(key: i64, species: TaxonId, id: &str) -> GeneInfoRow {
    GeneInfoRow {
        gene_key: GeneKey(key),
        species,
        species_specific_id: Some(id.to_string()),
        id_type: None,
        symbol: None,
    }
}

pub fn pair(id: i64, species1: TaxonId, gene1: i64, species2: TaxonId, gene2: i64, algorithm: &str) -> PairEvidenceRow {
    PairEvidenceRow {
        pair_id: id,
        species1,
        gene1_key: GeneKey(gene1),
        species2,
        gene2_key: GeneKey(gene2),
        algorithm: algorithm.to_string(),
    }
}

/// One pair row per algorithm, ids starting at `first_id`.
pub fn pairs(first_id: i64, species1: TaxonId, gene1: i64, species2: TaxonId, gene2: i64, algorithms: &[&str]) -> Vec<PairEvidenceRow> {
    algorithms
        .iter()
        .enumerate()
        .map(|(i, a)| pair(first_id + i as i64, species1, gene1, species2, gene2, a))
        .collect()
}

pub fn best(
    gene1: i64,
    gene2: i64,
    species1: TaxonId,
    species2: TaxonId,
    best_score: Option<BestScore>,
    best_score_rev: Option<BestScore>,
    confidence: Option<f64>,
) -> BestScoreRow {
    BestScoreRow {
        gene1_key: GeneKey(gene1),
        gene2_key: GeneKey(gene2),
        species1,
        species2,
        raw_score: None,
        best_score,
        best_score_rev,
        confidence,
    }
}

pub fn alignment(gene1: i64, gene2: i64, length: f64, identity: f64, similarity: f64) -> AlignmentRow {
    AlignmentRow {
        gene1_key: GeneKey(gene1),
        gene2_key: GeneKey(gene2),
        length: Some(length),
        raw_score: Some(length * 2.0),
        identity: Some(identity),
        similarity: Some(similarity),
    }
}
