//! Loaders for the primary relational extract.
//!
//! Each table is a delimited file with a header row. Columns are read by
//! position in the order the extract queries select them. Empty cells and
//! the `-` placeholder are null.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use ortholink_common::{BestScore, GeneKey};
use ortholink_kg::OverrideList;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{AlignmentRow, BestScoreRow, GeneInfoRow, PairEvidenceRow, PrimaryExtract};

/// Locations of the primary extract's tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryPaths {
    pub genes: PathBuf,
    pub pairs: PathBuf,
    pub best_scores: PathBuf,
    #[serde(default)]
    pub alignments: Option<PathBuf>,
}

/// `,` for `.csv` files, tab for everything else.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}

// ── Cell access ──────────────────────────────────────────────────────────────

fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "-")
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

fn optional<T>(record: &StringRecord, idx: usize, field: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match cell(record, idx) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("line {}: bad {field} {raw:?}: {e}", line_of(record))),
    }
}

fn required<T>(record: &StringRecord, idx: usize, field: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    optional(record, idx, field)?.ok_or_else(|| anyhow!("line {}: missing {field}", line_of(record)))
}

fn text(record: &StringRecord, idx: usize) -> Option<String> {
    cell(record, idx).map(str::to_string)
}

fn best_score(record: &StringRecord, idx: usize) -> Option<BestScore> {
    cell(record, idx).and_then(BestScore::parse)
}

fn records(content: &str, delimiter: u8) -> impl Iterator<Item = csv::Result<StringRecord>> + '_ {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes())
        .into_records()
}

// ── Parsers ──────────────────────────────────────────────────────────────────

/// `gene_key, species, species_specific_id, id_type, symbol`
pub fn parse_gene_info(content: &str, delimiter: u8) -> Result<Vec<GeneInfoRow>> {
    let mut rows = Vec::new();
    for record in records(content, delimiter) {
        let record = record?;
        rows.push(GeneInfoRow {
            gene_key: GeneKey(required(&record, 0, "gene_key")?),
            species: required(&record, 1, "species")?,
            species_specific_id: text(&record, 2),
            id_type: text(&record, 3),
            symbol: text(&record, 4),
        });
    }
    Ok(rows)
}

/// `pair_id, species1, gene1_key, species2, gene2_key, algorithm`
pub fn parse_pair_evidence(content: &str, delimiter: u8) -> Result<Vec<PairEvidenceRow>> {
    let mut rows = Vec::new();
    for record in records(content, delimiter) {
        let record = record?;
        rows.push(PairEvidenceRow {
            pair_id: required(&record, 0, "pair_id")?,
            species1: required(&record, 1, "species1")?,
            gene1_key: GeneKey(required(&record, 2, "gene1_key")?),
            species2: required(&record, 3, "species2")?,
            gene2_key: GeneKey(required(&record, 4, "gene2_key")?),
            algorithm: required(&record, 5, "algorithm")?,
        });
    }
    Ok(rows)
}

/// `gene1_key, gene2_key, species1, species2, score, best_score, best_score_rev, confidence`
pub fn parse_best_scores(content: &str, delimiter: u8) -> Result<Vec<BestScoreRow>> {
    let mut rows = Vec::new();
    for record in records(content, delimiter) {
        let record = record?;
        rows.push(BestScoreRow {
            gene1_key: GeneKey(required(&record, 0, "gene1_key")?),
            gene2_key: GeneKey(required(&record, 1, "gene2_key")?),
            species1: required(&record, 2, "species1")?,
            species2: required(&record, 3, "species2")?,
            raw_score: optional(&record, 4, "score")?,
            best_score: best_score(&record, 5),
            best_score_rev: best_score(&record, 6),
            confidence: optional(&record, 7, "confidence")?,
        });
    }
    Ok(rows)
}

/// `gene1_key, gene2_key, length, score, identity, similarity`
pub fn parse_alignments(content: &str, delimiter: u8) -> Result<Vec<AlignmentRow>> {
    let mut rows = Vec::new();
    for record in records(content, delimiter) {
        let record = record?;
        rows.push(AlignmentRow {
            gene1_key: GeneKey(required(&record, 0, "gene1_key")?),
            gene2_key: GeneKey(required(&record, 1, "gene2_key")?),
            length: optional(&record, 2, "length")?,
            raw_score: optional(&record, 3, "score")?,
            identity: optional(&record, 4, "identity")?,
            similarity: optional(&record, 5, "similarity")?,
        });
    }
    Ok(rows)
}

/// Second-best override pairs: tab-separated with a header, gene1 key in
/// column 1 and gene2 key in column 3.
pub fn parse_override_list(content: &str) -> Result<OverrideList> {
    let mut list = OverrideList::new();
    for record in records(content, b'\t') {
        let record = record?;
        let gene1: i64 = required(&record, 1, "gene1_key")?;
        let gene2: i64 = required(&record, 3, "gene2_key")?;
        list.insert(GeneKey(gene1), GeneKey(gene2));
    }
    Ok(list)
}

// ── File loaders ─────────────────────────────────────────────────────────────

async fn read(path: &Path) -> Result<String> {
    debug!("Reading {:?}", path);
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

pub async fn load_gene_info(path: &Path) -> Result<Vec<GeneInfoRow>> {
    let rows = parse_gene_info(&read(path).await?, delimiter_for(path))
        .with_context(|| format!("Invalid gene table {}", path.display()))?;
    info!("Loaded {} gene rows", rows.len());
    Ok(rows)
}

pub async fn load_pair_evidence(path: &Path) -> Result<Vec<PairEvidenceRow>> {
    let rows = parse_pair_evidence(&read(path).await?, delimiter_for(path))
        .with_context(|| format!("Invalid pair table {}", path.display()))?;
    info!("Loaded {} pair-evidence rows", rows.len());
    Ok(rows)
}

pub async fn load_best_scores(path: &Path) -> Result<Vec<BestScoreRow>> {
    let rows = parse_best_scores(&read(path).await?, delimiter_for(path))
        .with_context(|| format!("Invalid best-score table {}", path.display()))?;
    info!("Loaded {} best-score rows", rows.len());
    Ok(rows)
}

pub async fn load_alignments(path: &Path) -> Result<Vec<AlignmentRow>> {
    let rows = parse_alignments(&read(path).await?, delimiter_for(path))
        .with_context(|| format!("Invalid alignment table {}", path.display()))?;
    info!("Loaded {} alignment rows", rows.len());
    Ok(rows)
}

pub async fn load_override_list(path: &Path) -> Result<OverrideList> {
    let list = parse_override_list(&read(path).await?)
        .with_context(|| format!("Invalid override list {}", path.display()))?;
    info!("Loaded {} second-best override pairs", list.len());
    Ok(list)
}

/// Read every table named in `paths`.
pub async fn load_primary_extract(paths: &PrimaryPaths) -> Result<PrimaryExtract> {
    let alignments = match &paths.alignments {
        Some(path) => load_alignments(path).await?,
        None => Vec::new(),
    };
    Ok(PrimaryExtract {
        genes: load_gene_info(&paths.genes).await?,
        pairs: load_pair_evidence(&paths.pairs).await?,
        best_scores: load_best_scores(&paths.best_scores).await?,
        alignments,
    })
}
