//! Non-fatal run diagnostics.
//!
//! A diagnostic records a condition that dropped or degraded a single record
//! without aborting the run. Every entry is kept for audit, and counts per
//! kind are logged at the end of the run.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{info, warn};

use crate::entities::{DataSource, DedupKey, GeneKey, TaxonId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DiagnosticKind {
    IdentifierUnresolved,
    DegradedIdentifier,
    FailedGeneLookup,
    DuplicateExternalObservation,
    CrossSourceConflict,
    MalformedExternalRecord,
    MissingAlignment,
    MissingAlignmentStats,
    UnidirectionalRelationship,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::IdentifierUnresolved         => "identifier_unresolved",
            DiagnosticKind::DegradedIdentifier           => "degraded_identifier",
            DiagnosticKind::FailedGeneLookup             => "failed_gene_lookup",
            DiagnosticKind::DuplicateExternalObservation => "duplicate_external_observation",
            DiagnosticKind::CrossSourceConflict          => "cross_source_conflict",
            DiagnosticKind::MalformedExternalRecord      => "malformed_external_record",
            DiagnosticKind::MissingAlignment             => "missing_alignment",
            DiagnosticKind::MissingAlignmentStats        => "missing_alignment_stats",
            DiagnosticKind::UnidirectionalRelationship   => "unidirectional_relationship",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Diagnostic {
    /// Raw id and symbol both null, or the result failed the species signature.
    IdentifierUnresolved {
        species: TaxonId,
        gene_key: Option<GeneKey>,
        raw_id: Option<String>,
    },
    /// Canonical id was built from the symbol.
    DegradedIdentifier {
        species: TaxonId,
        gene_key: GeneKey,
        symbol: String,
    },
    /// An observation referenced a gene key the registry does not hold.
    FailedGeneLookup {
        gene_key: GeneKey,
        species: TaxonId,
    },
    DuplicateExternalObservation { key: DedupKey },
    CrossSourceConflict {
        key: DedupKey,
        kept: DataSource,
        dropped: DataSource,
    },
    /// External entry whose gene1 or gene2 has no alphanumeric content.
    MalformedExternalRecord { gene1: String, gene2: String },
    /// Paralog candidate with no alignment row at all.
    MissingAlignment { gene1_key: GeneKey, gene2_key: GeneKey },
    /// Alignment row present with some fields null.
    MissingAlignmentStats {
        gene1_key: GeneKey,
        gene2_key: GeneKey,
        missing: Vec<&'static str>,
    },
    /// A relationship in one direction of a species pair has no reverse.
    UnidirectionalRelationship { key: DedupKey },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::IdentifierUnresolved { .. }         => DiagnosticKind::IdentifierUnresolved,
            Diagnostic::DegradedIdentifier { .. }           => DiagnosticKind::DegradedIdentifier,
            Diagnostic::FailedGeneLookup { .. }             => DiagnosticKind::FailedGeneLookup,
            Diagnostic::DuplicateExternalObservation { .. } => DiagnosticKind::DuplicateExternalObservation,
            Diagnostic::CrossSourceConflict { .. }          => DiagnosticKind::CrossSourceConflict,
            Diagnostic::MalformedExternalRecord { .. }      => DiagnosticKind::MalformedExternalRecord,
            Diagnostic::MissingAlignment { .. }             => DiagnosticKind::MissingAlignment,
            Diagnostic::MissingAlignmentStats { .. }        => DiagnosticKind::MissingAlignmentStats,
            Diagnostic::UnidirectionalRelationship { .. }   => DiagnosticKind::UnidirectionalRelationship,
        }
    }
}

/// Accumulated diagnostics for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    counts: BTreeMap<DiagnosticKind, usize>,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        *self.counts.entry(diagnostic.kind()).or_insert(0) += 1;
        self.entries.push(diagnostic);
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind() == kind)
    }

    pub fn extend(&mut self, other: Diagnostics) {
        for d in other.entries {
            self.record(d);
        }
    }

    /// Distinct duplicate External keys, counted per ordered species pair.
    pub fn duplicates_by_species_pair(&self) -> BTreeMap<(TaxonId, TaxonId), usize> {
        let mut seen: BTreeSet<&DedupKey> = BTreeSet::new();
        let mut out = BTreeMap::new();
        for d in &self.entries {
            if let Diagnostic::DuplicateExternalObservation { key } = d {
                if seen.insert(key) {
                    *out.entry((key.species1, key.species2)).or_insert(0) += 1;
                }
            }
        }
        out
    }

    /// Log one line per kind, plus the duplicate breakdown.
    pub fn log_summary(&self) {
        if self.is_empty() {
            info!("No diagnostics recorded");
            return;
        }
        for (kind, count) in &self.counts {
            warn!(kind = kind.as_str(), count, "Diagnostics recorded");
        }
        for ((s1, s2), count) in self.duplicates_by_species_pair() {
            warn!(species1 = s1, species2 = s2, count, "Duplicate external relationships");
        }
    }
}
