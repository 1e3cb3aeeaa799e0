//! Gene registry: every gene known to the run, by internal key and by
//! (species, canonical id).

use std::collections::HashMap;

use ortholink_common::{GeneKey, GeneRecord, TaxonId};
use tracing::debug;

#[derive(Debug, Default)]
pub struct GeneRegistry {
    by_key: HashMap<GeneKey, GeneRecord>,
    by_identity: HashMap<(TaxonId, String), GeneKey>,
    max_key: Option<GeneKey>,
}

impl GeneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gene from the primary source. A later record under the same
    /// key replaces the earlier one.
    pub fn insert(&mut self, gene: GeneRecord) {
        let key = gene.internal_key;
        if let Some(previous) = self.by_key.get(&key) {
            let stale = (previous.species, previous.canonical_id.clone());
            if self.by_identity.get(&stale) == Some(&key) {
                self.by_identity.remove(&stale);
            }
        }
        let (species, canonical_id) = gene.identity();
        self.by_identity
            .entry((species, canonical_id.to_string()))
            .or_insert(key);
        self.max_key = Some(self.max_key.map_or(key, |m| m.max(key)));
        self.by_key.insert(key, gene);
    }

    pub fn get(&self, key: GeneKey) -> Option<&GeneRecord> {
        self.by_key.get(&key)
    }

    pub fn find(&self, species: TaxonId, canonical_id: &str) -> Option<&GeneRecord> {
        self.by_identity
            .get(&(species, canonical_id.to_string()))
            .and_then(|k| self.by_key.get(k))
    }

    /// Key to use for a gene an external feed mentions. Reuses the key of a
    /// gene already registered under the same species and canonical id,
    /// otherwise allocates one past the largest key seen so far.
    pub fn intern_external(&mut self, mut gene: GeneRecord) -> GeneKey {
        let (species, canonical_id) = gene.identity();
        if let Some(existing) = self.find(species, canonical_id) {
            return existing.internal_key;
        }
        let key = self.next_key();
        debug!(key = %key, id = %gene.canonical_id, "Interned external gene");
        gene.internal_key = key;
        self.insert(gene);
        key
    }

    fn next_key(&self) -> GeneKey {
        GeneKey(self.max_key.map_or(1, |k| k.0 + 1))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneRecord> {
        self.by_key.values()
    }
}
