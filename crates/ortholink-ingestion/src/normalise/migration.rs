//! Retired-identifier migrations.
//!
//! FlyBase retires `FBgn` ids when genes are merged or split; the primary
//! extract can lag behind. A migration source maps a retired id to the one
//! currently in use.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use lru::LruCache;
use tracing::{debug, info};

/// Prefix of the ids that can have migrations.
pub const MIGRATABLE_PREFIX: &str = "FBgn";

pub trait IdentifierMigrations: Send + Sync {
    /// Current id for `id`, or `None` when it is current or unknown.
    fn current_id(&self, id: &str) -> Option<String>;
}

/// `id` after migration. Ids without the migratable prefix are never looked up.
pub fn migrate(migrations: &dyn IdentifierMigrations, id: &str) -> String {
    if !id.starts_with(MIGRATABLE_PREFIX) {
        return id.to_string();
    }
    match migrations.current_id(id) {
        Some(current) => {
            debug!(retired = id, current = %current, "Migrated identifier");
            current
        }
        None => id.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoMigrations;

impl IdentifierMigrations for NoMigrations {
    fn current_id(&self, _id: &str) -> Option<String> {
        None
    }
}

/// Migrations read from a two-column TSV (`retired<TAB>current`, with header).
#[derive(Debug, Clone, Default)]
pub struct MigrationTable {
    map: HashMap<String, String>,
}

impl MigrationTable {
    pub fn from_tsv(content: &str) -> Result<Self> {
        let mut map = HashMap::new();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());
        for record in reader.records() {
            let record = record?;
            let (Some(retired), Some(current)) = (record.get(0), record.get(1)) else {
                continue;
            };
            let (retired, current) = (retired.trim(), current.trim());
            if retired.is_empty() || current.is_empty() || retired == current {
                continue;
            }
            map.insert(retired.to_string(), current.to_string());
        }
        Ok(Self { map })
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read migrations {}", path.display()))?;
        let table = Self::from_tsv(&content)?;
        info!("Loaded {} identifier migrations", table.len());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(String, String)> for MigrationTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { map: iter.into_iter().collect() }
    }
}

impl IdentifierMigrations for MigrationTable {
    fn current_id(&self, id: &str) -> Option<String> {
        self.map.get(id).cloned()
    }
}

/// Memoises another source's answers, including negative ones.
pub struct CachedMigrations<M> {
    inner: M,
    cache: Mutex<LruCache<String, Option<String>>>,
}

impl<M: IdentifierMigrations> CachedMigrations<M> {
    pub fn new(inner: M, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<M: IdentifierMigrations> IdentifierMigrations for CachedMigrations<M> {
    fn current_id(&self, id: &str) -> Option<String> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = cache.get(id) {
            return hit.clone();
        }
        let answer = self.inner.current_id(id);
        cache.put(id.to_string(), answer.clone());
        answer
    }
}
