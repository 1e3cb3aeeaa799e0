//! Input row shapes, as read from the primary extract and external feeds.

use std::collections::HashMap;

use ortholink_common::{Alignment, BestScore, ExternalRelationship, GeneKey, TaxonId};
use serde::{Deserialize, Serialize};

/// One gene of the primary extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneInfoRow {
    pub gene_key: GeneKey,
    pub species: TaxonId,
    /// Identifier as the species' own database writes it, without `DRSC:`.
    pub species_specific_id: Option<String>,
    /// Identifier-type hint (`FLYBASE`, `WormBase`, ...). Often a placeholder.
    pub id_type: Option<String>,
    pub symbol: Option<String>,
}

/// One algorithm calling gene1 -> gene2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairEvidenceRow {
    pub pair_id: i64,
    pub species1: TaxonId,
    pub gene1_key: GeneKey,
    pub species2: TaxonId,
    pub gene2_key: GeneKey,
    pub algorithm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestScoreRow {
    pub gene1_key: GeneKey,
    pub gene2_key: GeneKey,
    pub species1: TaxonId,
    pub species2: TaxonId,
    /// Present in the extract, not used by the pipeline.
    pub raw_score: Option<f64>,
    pub best_score: Option<BestScore>,
    pub best_score_rev: Option<BestScore>,
    pub confidence: Option<f64>,
}

/// Protein alignment stats for a paralog pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRow {
    pub gene1_key: GeneKey,
    pub gene2_key: GeneKey,
    pub length: Option<f64>,
    pub raw_score: Option<f64>,
    pub identity: Option<f64>,
    pub similarity: Option<f64>,
}

impl AlignmentRow {
    pub fn alignment(&self) -> Alignment {
        Alignment {
            length: self.length,
            raw_score: self.raw_score,
            identity: self.identity,
            similarity: self.similarity,
        }
    }
}

/// Alignment stats indexed by (gene1 key, gene2 key). A later row for the
/// same pair replaces an earlier one.
pub fn index_alignments(rows: &[AlignmentRow]) -> HashMap<(GeneKey, GeneKey), Alignment> {
    rows.iter()
        .map(|r| ((r.gene1_key, r.gene2_key), r.alignment()))
        .collect()
}

/// Everything read from the primary relational extract.
#[derive(Debug, Clone, Default)]
pub struct PrimaryExtract {
    pub genes: Vec<GeneInfoRow>,
    pub pairs: Vec<PairEvidenceRow>,
    pub best_scores: Vec<BestScoreRow>,
    /// Paralogy only.
    pub alignments: Vec<AlignmentRow>,
}

/// Entries of one external curated feed that passed loading filters.
#[derive(Debug, Clone, Default)]
pub struct ExternalFeed {
    pub name: String,
    pub entries: Vec<ExternalRelationship>,
}
