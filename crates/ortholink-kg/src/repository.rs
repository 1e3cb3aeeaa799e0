//! Relationship store: one record per dedup key, built by merging
//! observations from the primary source and then from external feeds.

use std::collections::HashMap;

use ortholink_common::{
    Alignment, BestScore, DataSource, DedupKey, Diagnostic, Diagnostics, ExternalRelationship,
    GeneKey, OrthoError, RelationshipRecord, Result, TaxonId,
};
use tracing::{debug, info};

use crate::conflict::{evaluate_observation, MergeDecision};
use crate::registry::GeneRegistry;
use crate::universe::{normalize_algorithm_name, AlgorithmUniverse};

/// Best-score flags for one directed gene pair, as the primary source stores them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BestScoreEntry {
    pub best_score: Option<BestScore>,
    pub best_score_rev: Option<BestScore>,
    pub confidence: Option<f64>,
}

/// Best-score rows keyed by (gene1 key, gene2 key, species1, species2).
#[derive(Debug, Default)]
pub struct BestScoreIndex {
    entries: HashMap<(GeneKey, GeneKey, TaxonId, TaxonId), BestScoreEntry>,
}

impl BestScoreIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        gene1: GeneKey,
        gene2: GeneKey,
        species1: TaxonId,
        species2: TaxonId,
        entry: BestScoreEntry,
    ) {
        self.entries.insert((gene1, gene2, species1, species2), entry);
    }

    pub fn get(&self, gene1: GeneKey, gene2: GeneKey, species1: TaxonId, species2: TaxonId) -> Option<&BestScoreEntry> {
        self.entries.get(&(gene1, gene2, species1, species2))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One incoming piece of evidence.
#[derive(Debug, Clone, Copy)]
pub enum Observation<'a> {
    /// A single algorithm calling gene1 -> gene2.
    Primary {
        gene1_key: GeneKey,
        gene2_key: GeneKey,
        species1: TaxonId,
        species2: TaxonId,
        algorithm: &'a str,
    },
    /// A complete, pre-aggregated relationship from a curated feed.
    External {
        gene1_key: GeneKey,
        gene2_key: GeneKey,
        entry: &'a ExternalRelationship,
    },
}

impl Observation<'_> {
    pub fn source(&self) -> DataSource {
        match self {
            Observation::Primary { .. } => DataSource::Primary,
            Observation::External { .. } => DataSource::External,
        }
    }

    fn gene_keys(&self) -> (GeneKey, GeneKey) {
        match *self {
            Observation::Primary { gene1_key, gene2_key, .. }
            | Observation::External { gene1_key, gene2_key, .. } => (gene1_key, gene2_key),
        }
    }

    fn species(&self) -> (TaxonId, TaxonId) {
        match *self {
            Observation::Primary { species1, species2, .. } => (species1, species2),
            Observation::External { entry, .. } => (entry.gene1_species, entry.gene2_species),
        }
    }
}

/// What a merge did with the observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Extended,
    Dropped,
}

#[derive(Debug, Default)]
pub struct RelationshipStore {
    records: Vec<RelationshipRecord>,
    index: HashMap<DedupKey, usize>,
    external_started: bool,
}

impl RelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one observation.
    ///
    /// Every primary observation must arrive before the first external one;
    /// a primary observation after that point is an error.
    pub fn merge(
        &mut self,
        registry: &GeneRegistry,
        best_scores: &BestScoreIndex,
        observation: Observation<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<MergeOutcome> {
        let source = observation.source();
        let (gene1_key, gene2_key) = observation.gene_keys();
        let (species1, species2) = observation.species();

        match source {
            DataSource::External => self.external_started = true,
            DataSource::Primary if self.external_started => {
                return Err(OrthoError::IngestionOrder { gene1_key, gene2_key });
            }
            DataSource::Primary => {}
        }

        let Some(gene1) = registry.get(gene1_key) else {
            diagnostics.record(Diagnostic::FailedGeneLookup { gene_key: gene1_key, species: species1 });
            return Ok(MergeOutcome::Dropped);
        };
        let Some(gene2) = registry.get(gene2_key) else {
            diagnostics.record(Diagnostic::FailedGeneLookup { gene_key: gene2_key, species: species2 });
            return Ok(MergeOutcome::Dropped);
        };

        let key = DedupKey {
            gene1_id: gene1.canonical_id.clone(),
            gene2_id: gene2.canonical_id.clone(),
            species1: gene1.species,
            species2: gene2.species,
        };
        let existing = self.index.get(&key).copied();

        match evaluate_observation(existing.map(|i| self.records[i].data_source), source) {
            MergeDecision::Create => {
                let mut record = RelationshipRecord::between(gene1, gene2, source);
                match observation {
                    Observation::Primary { algorithm, .. } => {
                        record.matched_methods.insert(normalize_algorithm_name(algorithm));
                        if let Some(best) = best_scores.get(gene1_key, gene2_key, species1, species2) {
                            record.best_score = best.best_score;
                            record.best_score_rev = best.best_score_rev;
                            record.confidence = best.confidence;
                        }
                    }
                    Observation::External { entry, .. } => {
                        record.matched_methods = normalized(&entry.prediction_methods_matched);
                        record.not_matched_methods = normalized(&entry.prediction_methods_not_matched);
                        record.not_called_methods = normalized(&entry.prediction_methods_not_called);
                        record.best_score = entry.is_best_score;
                        record.best_score_rev = entry.is_best_rev_score;
                        record.confidence = entry.confidence;
                    }
                }
                self.index.insert(key, self.records.len());
                self.records.push(record);
                Ok(MergeOutcome::Created)
            }
            MergeDecision::Extend => {
                if let (Some(i), Observation::Primary { algorithm, .. }) = (existing, observation) {
                    self.records[i].matched_methods.insert(normalize_algorithm_name(algorithm));
                }
                Ok(MergeOutcome::Extended)
            }
            MergeDecision::DuplicateExternal => {
                diagnostics.record(Diagnostic::DuplicateExternalObservation { key });
                Ok(MergeOutcome::Dropped)
            }
            MergeDecision::CrossSource { kept, dropped } => {
                debug!(gene1 = %key.gene1_id, gene2 = %key.gene2_id, "Cross-source conflict, keeping {}", kept.as_str());
                diagnostics.record(Diagnostic::CrossSourceConflict { key, kept, dropped });
                Ok(MergeOutcome::Dropped)
            }
        }
    }

    /// Derive not-matched and not-called sets from the frozen universe, then
    /// check that every record names a provider for both genes.
    pub fn finalize(&mut self, universe: &AlgorithmUniverse) -> Result<()> {
        for record in &mut self.records {
            let partition = universe.partition(record.species1, record.species2, &record.matched_methods);
            record.not_matched_methods = partition.not_matched;
            record.not_called_methods = partition.not_called;
        }
        for record in &self.records {
            ensure_providers(record)?;
        }
        info!(records = self.records.len(), "Relationship store finalized");
        Ok(())
    }

    /// Paralogs relate genes of one species.
    pub fn ensure_same_species(&self) -> Result<()> {
        match self.records.iter().find(|r| !r.is_same_species()) {
            Some(r) => Err(OrthoError::SpeciesMismatch {
                gene1_id: r.gene1_id.clone(),
                gene2_id: r.gene2_id.clone(),
                species1: r.species1,
                species2: r.species2,
            }),
            None => Ok(()),
        }
    }

    /// Attach alignment stats by (gene1 key, gene2 key), counting what is missing.
    pub fn attach_alignments(
        &mut self,
        alignments: &HashMap<(GeneKey, GeneKey), Alignment>,
        diagnostics: &mut Diagnostics,
    ) {
        for record in &mut self.records {
            match alignments.get(&(record.gene1_key, record.gene2_key)) {
                Some(alignment) => {
                    let missing = alignment.missing_fields();
                    if !missing.is_empty() {
                        diagnostics.record(Diagnostic::MissingAlignmentStats {
                            gene1_key: record.gene1_key,
                            gene2_key: record.gene2_key,
                            missing,
                        });
                    }
                    record.alignment = Some(*alignment);
                }
                None => diagnostics.record(Diagnostic::MissingAlignment {
                    gene1_key: record.gene1_key,
                    gene2_key: record.gene2_key,
                }),
            }
        }
    }

    pub fn get(&self, key: &DedupKey) -> Option<&RelationshipRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[RelationshipRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [RelationshipRecord] {
        &mut self.records
    }

    /// Drop records that fail `keep`, preserving insertion order.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&RelationshipRecord) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|r| keep(r));
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.dedup_key(), i))
            .collect();
        before - self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<RelationshipRecord> {
        self.records
    }
}

fn normalized(names: &[String]) -> ortholink_common::MethodSet {
    names.iter().map(|n| normalize_algorithm_name(n)).collect()
}

fn ensure_providers(record: &RelationshipRecord) -> Result<()> {
    if record.gene1_provider.is_some() && record.gene2_provider.is_some() {
        return Ok(());
    }
    Err(OrthoError::ProviderMismatch {
        gene1_key: record.gene1_key,
        gene2_key: record.gene2_key,
        gene1_id: record.gene1_id.clone(),
        gene2_id: record.gene2_id.clone(),
        species1: record.species1,
        species2: record.species2,
        gene1_provider: record.gene1_provider.map(|p| p.to_string()),
        gene2_provider: record.gene2_provider.map(|p| p.to_string()),
    })
}
