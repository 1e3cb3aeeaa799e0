//! Prediction-method universe.
//!
//! Built incrementally while inputs are read, then frozen before any
//! relationship is merged. The frozen [`AlgorithmUniverse`] has no mutating
//! methods, and lookups never create entries.

use std::collections::HashMap;

use ortholink_common::species::canonical_algorithm;
use ortholink_common::{ExternalRelationship, MethodSet, TaxonId};
use tracing::info;

/// Canonical algorithm name for a raw one.
pub fn normalize_algorithm_name(raw: &str) -> String {
    canonical_algorithm(raw.trim()).to_string()
}

#[derive(Debug, Default)]
pub struct UniverseBuilder {
    global: MethodSet,
    per_pair: HashMap<(TaxonId, TaxonId), MethodSet>,
}

impl UniverseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `algorithm` ran for the ordered species pair.
    pub fn record_possible(&mut self, species1: TaxonId, species2: TaxonId, algorithm: &str) {
        let name = normalize_algorithm_name(algorithm);
        self.global.insert(name.clone());
        self.per_pair.entry((species1, species2)).or_default().insert(name);
    }

    /// Union every method an external entry mentions into the global set and
    /// that entry's species pair.
    pub fn ingest_external_algorithm_mentions<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a ExternalRelationship>,
    {
        for rel in records {
            for method in rel.mentioned_methods() {
                self.record_possible(rel.gene1_species, rel.gene2_species, method);
            }
        }
    }

    pub fn freeze(self) -> AlgorithmUniverse {
        info!(
            algorithms = self.global.len(),
            species_pairs = self.per_pair.len(),
            "Algorithm universe frozen"
        );
        AlgorithmUniverse {
            global: self.global,
            per_pair: self.per_pair,
            empty: MethodSet::new(),
        }
    }
}

/// Read-only view of which algorithms exist and which ran per species pair.
#[derive(Debug)]
pub struct AlgorithmUniverse {
    global: MethodSet,
    per_pair: HashMap<(TaxonId, TaxonId), MethodSet>,
    empty: MethodSet,
}

/// `matched` split against the universe into the three disjoint sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodPartition {
    pub matched: MethodSet,
    pub not_matched: MethodSet,
    pub not_called: MethodSet,
}

impl AlgorithmUniverse {
    pub fn global(&self) -> &MethodSet {
        &self.global
    }

    /// Algorithms that ran for the pair. Empty when the pair never appeared.
    pub fn possible(&self, species1: TaxonId, species2: TaxonId) -> &MethodSet {
        self.per_pair.get(&(species1, species2)).unwrap_or(&self.empty)
    }

    /// Partition a matched set for the pair.
    ///
    /// `not_matched` is what ran but did not match, `not_called` is what never
    /// ran. Matched names outside the universe stay matched and are excluded
    /// from the other two sets.
    pub fn partition(&self, species1: TaxonId, species2: TaxonId, matched: &MethodSet) -> MethodPartition {
        let possible = self.possible(species1, species2);
        let not_matched = possible.difference(matched).cloned().collect();
        let not_called = self
            .global
            .iter()
            .filter(|m| !possible.contains(*m) && !matched.contains(*m))
            .cloned()
            .collect();
        MethodPartition {
            matched: matched.clone(),
            not_matched,
            not_called,
        }
    }
}
