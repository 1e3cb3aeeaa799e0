//! Fixture builders shared by the workspace's unit and integration tests.

use std::io::Write;
use std::path::PathBuf;

use ortholink_common::species::rule_for;
use ortholink_common::{
    DataSource, ExternalRelationship, GeneKey, GeneRecord, MethodSet, RelationshipRecord, TaxonId,
};
use tempfile::TempDir;

/// A registered gene with the species' default provider (none for an
/// unsupported taxon).
pub fn gene(key: i64, species: TaxonId, canonical_id: &str) -> GeneRecord {
    GeneRecord {
        internal_key: GeneKey(key),
        species,
        canonical_id: canonical_id.to_string(),
        symbol: None,
        provider: rule_for(species).ok().map(|r| r.provider),
        degraded: false,
    }
}

pub fn methods(names: &[&str]) -> MethodSet {
    names.iter().map(|n| n.to_string()).collect()
}

/// Synthetic canonical id, stable for a given (key, species).
pub fn synthetic_id(key: i64, species: TaxonId) -> String {
    match rule_for(species) {
        Ok(rule) => format!("DRSC:{}:{key}", rule.provider),
        Err(_) => format!("DRSC:{species}:{key}"),
    }
}

/// A primary relationship between two synthetic genes with `matched` as
/// its only evidence.
pub fn relationship(
    gene1: i64,
    species1: TaxonId,
    gene2: i64,
    species2: TaxonId,
    matched: &[&str],
) -> RelationshipRecord {
    let g1 = gene(gene1, species1, &synthetic_id(gene1, species1));
    let g2 = gene(gene2, species2, &synthetic_id(gene2, species2));
    let mut record = RelationshipRecord::between(&g1, &g2, DataSource::Primary);
    record.matched_methods = methods(matched);
    record
}

/// External feed entry with only matched methods and no best-score flags.
pub fn external_entry(
    gene1: &str,
    gene2: &str,
    species1: TaxonId,
    species2: TaxonId,
    matched: &[&str],
) -> ExternalRelationship {
    ExternalRelationship {
        gene1: gene1.to_string(),
        gene2: gene2.to_string(),
        gene1_species: species1,
        gene2_species: species2,
        prediction_methods_matched: matched.iter().map(|m| m.to_string()).collect(),
        prediction_methods_not_matched: Vec::new(),
        prediction_methods_not_called: Vec::new(),
        is_best_score: None,
        is_best_rev_score: None,
        confidence: None,
    }
}

/// `{"data": [...]}` document for a set of feed entries.
pub fn external_feed_json(entries: &[ExternalRelationship]) -> String {
    serde_json::json!({ "data": entries }).to_string()
}

/// Temporary directory holding input files for a test run.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self { dir: TempDir::new()? })
    }

    /// Write `contents` to `name` inside the fixture directory.
    pub fn write(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path)?;
        file.write_all(contents.as_bytes())?;
        Ok(path)
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}
