//! External curated feeds: `{"data": [...]}` documents whose entries are
//! complete, pre-aggregated relationships.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use ortholink_common::{Diagnostic, Diagnostics, ExternalFeedConfig, ExternalRelationship, TaxonId};
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::ExternalFeed;

#[derive(Debug, Deserialize)]
struct FeedDocument {
    data: Vec<ExternalRelationship>,
}

/// A gene field with no letter or digit is a placeholder, not an identifier.
pub fn is_malformed_gene(value: &str) -> bool {
    !value.chars().any(char::is_alphanumeric)
}

/// Entry counts per ordered (gene1 species, gene2 species).
pub fn count_by_species_pair(entries: &[ExternalRelationship]) -> BTreeMap<(TaxonId, TaxonId), usize> {
    let mut counts = BTreeMap::new();
    for e in entries {
        *counts.entry((e.gene1_species, e.gene2_species)).or_insert(0) += 1;
    }
    counts
}

/// Parse a feed document and apply the loading filters: entries with a
/// malformed gene are dropped with a diagnostic, then entries that do not
/// match the feed's required method (if configured) are dropped.
pub fn parse_feed(
    name: &str,
    json: &str,
    config: &ExternalFeedConfig,
    diagnostics: &mut Diagnostics,
) -> Result<ExternalFeed> {
    let document: FeedDocument = serde_json::from_str(json)?;
    let total = document.data.len();

    let mut malformed = 0usize;
    let mut entries = Vec::with_capacity(total);
    for entry in document.data {
        if is_malformed_gene(&entry.gene1) || is_malformed_gene(&entry.gene2) {
            malformed += 1;
            diagnostics.record(Diagnostic::MalformedExternalRecord {
                gene1: entry.gene1,
                gene2: entry.gene2,
            });
            continue;
        }
        entries.push(entry);
    }
    if malformed > 0 {
        warn!(feed = name, malformed, "Removed feed entries with a missing gene1/gene2");
    }

    if let Some(required) = &config.required_method {
        let before = entries.len();
        entries.retain(|e| e.prediction_methods_matched.iter().any(|m| m == required));
        let dropped = before - entries.len();
        if dropped > 0 {
            info!(feed = name, dropped, method = %required, "Dropped feed entries without the feed's own method");
        }
    }

    for ((s1, s2), count) in count_by_species_pair(&entries) {
        info!(feed = name, species1 = s1, species2 = s2, count, "Feed entries");
    }
    info!(feed = name, total, kept = entries.len(), "External feed loaded");

    Ok(ExternalFeed {
        name: name.to_string(),
        entries,
    })
}

/// Read and filter one feed file. The feed is named after the file stem.
pub async fn load_feed(
    path: &Path,
    config: &ExternalFeedConfig,
    diagnostics: &mut Diagnostics,
) -> Result<ExternalFeed> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read feed {}", path.display()))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("external");
    parse_feed(name, &json, config, diagnostics)
        .with_context(|| format!("Invalid feed {}", path.display()))
}
