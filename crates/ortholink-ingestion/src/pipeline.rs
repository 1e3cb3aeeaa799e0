//! Phase-ordered reconciliation runs.
//!
//! Both runs work over fully loaded inputs and go through the same phases:
//!   1. Normalise gene rows into the registry
//!   2. Build and freeze the algorithm universe
//!   3. Index best-score rows
//!   4. Merge primary pair evidence
//!   5. Intern feed genes and merge external relationships
//!   6. Finalise method partitions and check providers
//!   7. Orthology: second-best adjustment, then confidence filters.
//!      Paralogy: alignments, confidence filters, pruning, ranking
//!   8. Reciprocity check and the diagnostics summary
//!
//! Each phase completes before the next one starts.

use ortholink_common::{Diagnostics, PipelineConfig, RelationshipKind, RelationshipRecord, Result};
use ortholink_kg::{
    adjust_second_best, apply_confidence_filters, check_reciprocity, AlgorithmUniverse,
    BestScoreEntry, BestScoreIndex, GeneRegistry, MergeOutcome, Observation, OverrideList,
    RelationshipStore, UniverseBuilder,
};
use ortholink_ranker::{keep_candidate, rank_paralogs};
use serde::Serialize;
use tracing::{info, instrument};

use crate::models::{index_alignments, BestScoreRow, ExternalFeed, GeneInfoRow, PairEvidenceRow, PrimaryExtract};
use crate::normalise::{IdentifierMigrations, IdentifierNormalizer};

// ── Inputs and results ───────────────────────────────────────────────────────

/// Everything a run reads, already loaded.
pub struct RunInputs<'a> {
    pub extract: &'a PrimaryExtract,
    /// Merged after all primary evidence, in this order.
    pub feeds: &'a [ExternalFeed],
    /// Second-best override pairs (orthology only).
    pub overrides: Option<&'a OverrideList>,
    pub migrations: &'a dyn IdentifierMigrations,
}

/// Per-source merge tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeCounts {
    pub created: usize,
    pub extended: usize,
    pub dropped: usize,
}

impl MergeCounts {
    fn add(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Created => self.created += 1,
            MergeOutcome::Extended => self.extended += 1,
            MergeOutcome::Dropped => self.dropped += 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub genes: usize,
    pub algorithms: usize,
    pub primary: MergeCounts,
    pub external: MergeCounts,
    pub adjusted: usize,
    pub pruned: usize,
    pub ranked: usize,
    pub unidirectional: usize,
}

#[derive(Debug)]
pub struct RunOutput {
    pub kind: RelationshipKind,
    pub records: Vec<RelationshipRecord>,
    pub diagnostics: Diagnostics,
    pub stats: RunStats,
}

// ── Phases ───────────────────────────────────────────────────────────────────

/// Phase 1. Fails on the first unsupported species.
pub fn build_registry(
    rows: &[GeneInfoRow],
    normalizer: &IdentifierNormalizer<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<GeneRegistry> {
    let mut registry = GeneRegistry::new();
    for row in rows {
        if let Some(gene) = normalizer.normalize_gene(row, diagnostics)? {
            registry.insert(gene);
        }
    }
    info!(rows = rows.len(), genes = registry.len(), "Gene registry built");
    Ok(registry)
}

/// Phase 2.
pub fn build_universe(pairs: &[PairEvidenceRow], feeds: &[ExternalFeed]) -> AlgorithmUniverse {
    let mut builder = UniverseBuilder::new();
    for pair in pairs {
        builder.record_possible(pair.species1, pair.species2, &pair.algorithm);
    }
    builder.ingest_external_algorithm_mentions(feeds.iter().flat_map(|f| f.entries.iter()));
    builder.freeze()
}

/// Phase 3.
pub fn index_best_scores(rows: &[BestScoreRow]) -> BestScoreIndex {
    let mut index = BestScoreIndex::new();
    for row in rows {
        index.insert(row.gene1_key, row.gene2_key, row.species1, row.species2, BestScoreEntry {
            best_score: row.best_score,
            best_score_rev: row.best_score_rev,
            confidence: row.confidence,
        });
    }
    index
}

/// Phase 4.
pub fn merge_primary(
    store: &mut RelationshipStore,
    registry: &GeneRegistry,
    best_scores: &BestScoreIndex,
    pairs: &[PairEvidenceRow],
    diagnostics: &mut Diagnostics,
) -> Result<MergeCounts> {
    let mut counts = MergeCounts::default();
    for pair in pairs {
        let observation = Observation::Primary {
            gene1_key: pair.gene1_key,
            gene2_key: pair.gene2_key,
            species1: pair.species1,
            species2: pair.species2,
            algorithm: &pair.algorithm,
        };
        counts.add(store.merge(registry, best_scores, observation, diagnostics)?);
    }
    info!(created = counts.created, extended = counts.extended, dropped = counts.dropped, "Primary evidence merged");
    Ok(counts)
}

/// Phase 5. Feed genes are normalised with the feed's provider hint and
/// interned before their relationship is merged.
pub fn merge_external(
    store: &mut RelationshipStore,
    registry: &mut GeneRegistry,
    normalizer: &IdentifierNormalizer<'_>,
    feeds: &[ExternalFeed],
    provider_hint: &str,
    diagnostics: &mut Diagnostics,
) -> Result<MergeCounts> {
    let best_scores = BestScoreIndex::new();
    let mut counts = MergeCounts::default();
    for feed in feeds {
        for entry in &feed.entries {
            let gene1 = normalizer.normalize_external(&entry.gene1, entry.gene1_species, provider_hint, diagnostics)?;
            let gene2 = normalizer.normalize_external(&entry.gene2, entry.gene2_species, provider_hint, diagnostics)?;
            let (Some(gene1), Some(gene2)) = (gene1, gene2) else {
                counts.dropped += 1;
                continue;
            };
            let gene1_key = registry.intern_external(gene1);
            let gene2_key = registry.intern_external(gene2);
            let observation = Observation::External { gene1_key, gene2_key, entry };
            counts.add(store.merge(registry, &best_scores, observation, diagnostics)?);
        }
        info!(feed = %feed.name, entries = feed.entries.len(), "Feed merged");
    }
    info!(created = counts.created, dropped = counts.dropped, "External relationships merged");
    Ok(counts)
}

/// Phases 1-6, shared by both runs.
fn reconcile(
    inputs: &RunInputs<'_>,
    config: &PipelineConfig,
    diagnostics: &mut Diagnostics,
    stats: &mut RunStats,
) -> Result<(RelationshipStore, AlgorithmUniverse)> {
    config.validate()?;
    let normalizer = IdentifierNormalizer::new(inputs.migrations);

    let mut registry = build_registry(&inputs.extract.genes, &normalizer, diagnostics)?;
    let universe = build_universe(&inputs.extract.pairs, inputs.feeds);
    let best_scores = index_best_scores(&inputs.extract.best_scores);
    stats.algorithms = universe.global().len();

    let mut store = RelationshipStore::new();
    stats.primary = merge_primary(&mut store, &registry, &best_scores, &inputs.extract.pairs, diagnostics)?;
    stats.external = merge_external(
        &mut store,
        &mut registry,
        &normalizer,
        inputs.feeds,
        &config.external.provider_hint,
        diagnostics,
    )?;
    stats.genes = registry.len();

    store.finalize(&universe)?;
    Ok((store, universe))
}

fn finish(
    kind: RelationshipKind,
    records: Vec<RelationshipRecord>,
    config: &PipelineConfig,
    mut diagnostics: Diagnostics,
    mut stats: RunStats,
) -> RunOutput {
    if let Some(pair) = config.reciprocity {
        stats.unidirectional = check_reciprocity(&records, pair, &mut diagnostics);
    }
    diagnostics.log_summary();
    info!(records = records.len(), "Run complete");
    RunOutput { kind, records, diagnostics, stats }
}

// ── Runs ─────────────────────────────────────────────────────────────────────

pub fn run_orthology(inputs: RunInputs<'_>, config: &PipelineConfig) -> Result<RunOutput> {
    orthology(inputs, config, Diagnostics::new())
}

pub fn run_paralogy(inputs: RunInputs<'_>, config: &PipelineConfig) -> Result<RunOutput> {
    paralogy(inputs, config, Diagnostics::new())
}

#[instrument(skip_all)]
fn orthology(inputs: RunInputs<'_>, config: &PipelineConfig, mut diagnostics: Diagnostics) -> Result<RunOutput> {
    let mut stats = RunStats::default();
    let (store, _universe) = reconcile(&inputs, config, &mut diagnostics, &mut stats)?;
    let mut records = store.into_records();

    if let Some(overrides) = inputs.overrides {
        stats.adjusted = adjust_second_best(&mut records, &config.adjustment, overrides);
    }
    apply_confidence_filters(&mut records, &config.high_trust_methods, config.parallel_threshold);

    Ok(finish(RelationshipKind::Orthology, records, config, diagnostics, stats))
}

#[instrument(skip_all)]
fn paralogy(inputs: RunInputs<'_>, config: &PipelineConfig, mut diagnostics: Diagnostics) -> Result<RunOutput> {
    let mut stats = RunStats::default();
    let (mut store, universe) = reconcile(&inputs, config, &mut diagnostics, &mut stats)?;

    store.ensure_same_species()?;
    store.attach_alignments(&index_alignments(&inputs.extract.alignments), &mut diagnostics);
    apply_confidence_filters(store.records_mut(), &config.high_trust_methods, config.parallel_threshold);

    stats.pruned = store.retain(|r| keep_candidate(r, &config.paralogy));
    info!(pruned = stats.pruned, kept = store.len(), "Paralog candidates pruned");

    let summary = rank_paralogs(
        store.records_mut(),
        |s1, s2| universe.possible(s1, s2).len(),
        &config.paralogy.weights,
        config.parallel_threshold,
    );
    stats.ranked = summary.ranked;

    Ok(finish(RelationshipKind::Paralogy, store.into_records(), config, diagnostics, stats))
}

/// Dispatch on `kind`, continuing a log already holding load-time
/// diagnostics so the end-of-run summary covers both.
pub fn run_with_diagnostics(
    kind: RelationshipKind,
    inputs: RunInputs<'_>,
    config: &PipelineConfig,
    loaded: Diagnostics,
) -> Result<RunOutput> {
    match kind {
        RelationshipKind::Orthology => orthology(inputs, config, loaded),
        RelationshipKind::Paralogy => paralogy(inputs, config, loaded),
    }
}

