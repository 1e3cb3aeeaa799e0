//! JSON export: one document per MOD plus a sample document.
//!
//! Records are grouped by the export label of gene1's species. Every
//! document carries the same `metaData` block and is written with sorted
//! keys and two-space indentation.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ortholink_common::species::{rule_for, TOP_LEVEL_NAMESPACE};
use ortholink_common::{ParalogExport, RelationshipExport, RelationshipKind, RelationshipRecord};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::ExportConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    pub id: String,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProvider {
    #[serde(rename = "type")]
    pub kind: String,
    pub cross_reference: CrossReference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    pub data_provider: DataProvider,
    pub date_produced: String,
    pub release: String,
}

impl MetaData {
    pub fn new(config: &ExportConfig, date_produced: String) -> Self {
        Self {
            data_provider: DataProvider {
                kind: "curated".to_string(),
                cross_reference: CrossReference {
                    id: config.data_provider.clone(),
                    pages: vec!["homepage".to_string()],
                },
            },
            date_produced,
            release: config.release.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub meta_data: MetaData,
    pub data: Vec<Value>,
}

impl ExportDocument {
    /// Pretty JSON with object keys in sorted order.
    pub fn to_json(&self) -> Result<String> {
        // serde_json's Map is ordered by key, so going through Value sorts.
        let value = serde_json::to_value(self)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

fn export_row(kind: RelationshipKind, record: &RelationshipRecord) -> Result<Value> {
    let value = match kind {
        RelationshipKind::Orthology => serde_json::to_value(RelationshipExport::from(record))?,
        RelationshipKind::Paralogy => serde_json::to_value(ParalogExport::from(record))?,
    };
    Ok(value)
}

/// Export rows keyed by MOD label. Orthology drops same-species pairs.
pub fn rows_by_mod(kind: RelationshipKind, records: &[RelationshipRecord]) -> Result<BTreeMap<&'static str, Vec<Value>>> {
    let mut by_mod: BTreeMap<&'static str, Vec<Value>> = BTreeMap::new();
    for record in records {
        if kind == RelationshipKind::Orthology && record.species1 == record.species2 {
            continue;
        }
        let label = rule_for(record.species1)?.export_label;
        by_mod.entry(label).or_default().push(export_row(kind, record)?);
    }
    Ok(by_mod)
}

/// Rows whose gene1, without the `DRSC:` prefix, is a sample gene.
pub fn sample_rows<'a>(rows: impl IntoIterator<Item = &'a Value>, sample_genes: &HashSet<&str>) -> Vec<Value> {
    rows.into_iter()
        .filter(|row| {
            row.get("gene1")
                .and_then(Value::as_str)
                .map(|g| g.strip_prefix(TOP_LEVEL_NAMESPACE).unwrap_or(g))
                .is_some_and(|g| sample_genes.contains(g))
        })
        .cloned()
        .collect()
}

pub fn kind_name(kind: RelationshipKind) -> &'static str {
    match kind {
        RelationshipKind::Orthology => "orthology",
        RelationshipKind::Paralogy => "paralogy",
    }
}

pub fn mod_file_name(kind: RelationshipKind, label: &str, release: &str) -> String {
    format!("{}_{}_v{}.json", kind_name(kind), label, release)
}

pub fn sample_file_name(kind: RelationshipKind, release: &str) -> String {
    format!("{}_test_data_v{}.json", kind_name(kind), release)
}

async fn write_document(path: &Path, document: &ExportDocument) -> Result<()> {
    tokio::fs::write(path, document.to_json()?)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(file = %path.display(), rows = document.data.len(), "Export written");
    Ok(())
}

/// Write every MOD document and the sample document. Returns the paths written.
pub async fn write_exports(
    kind: RelationshipKind,
    records: &[RelationshipRecord],
    config: &ExportConfig,
    date_produced: String,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let meta_data = MetaData::new(config, date_produced);
    let by_mod = rows_by_mod(kind, records)?;
    let sample_genes: HashSet<&str> = config.sample_genes.iter().map(String::as_str).collect();
    let sample = sample_rows(by_mod.values().flatten(), &sample_genes);

    let mut written = Vec::with_capacity(by_mod.len() + 1);
    for (label, data) in by_mod {
        let path = config.output_dir.join(mod_file_name(kind, label, &config.release));
        write_document(&path, &ExportDocument { meta_data: meta_data.clone(), data }).await?;
        written.push(path);
    }

    let path = config.output_dir.join(sample_file_name(kind, &config.release));
    write_document(&path, &ExportDocument { meta_data, data: sample }).await?;
    written.push(path);

    Ok(written)
}
