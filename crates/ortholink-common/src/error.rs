use thiserror::Error;

use crate::entities::{GeneKey, TaxonId};

/// Conditions that abort a run.
///
/// Per-record problems that only drop a row are not errors; they are
/// recorded as [`crate::Diagnostic`]s and the run continues.
#[derive(Debug, Error)]
pub enum OrthoError {
    #[error("Unsupported species {taxon}: no identifier or provider mapping is configured")]
    UnsupportedSpecies { taxon: TaxonId },

    #[error(
        "Missing data provider on finalized relationship: gene1 key {gene1_key} ({gene1_id}, species {species1}, provider {gene1_provider:?}) / \
         gene2 key {gene2_key} ({gene2_id}, species {species2}, provider {gene2_provider:?})"
    )]
    ProviderMismatch {
        gene1_key: GeneKey,
        gene2_key: GeneKey,
        gene1_id: String,
        gene2_id: String,
        species1: TaxonId,
        species2: TaxonId,
        gene1_provider: Option<String>,
        gene2_provider: Option<String>,
    },

    #[error("Paralog pair spans two species: {gene1_id} ({species1}) / {gene2_id} ({species2})")]
    SpeciesMismatch {
        gene1_id: String,
        gene2_id: String,
        species1: TaxonId,
        species2: TaxonId,
    },

    #[error("Primary observation for {gene1_key} -> {gene2_key} arrived after external merging started")]
    IngestionOrder { gene1_key: GeneKey, gene2_key: GeneKey },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Delimited input error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OrthoError {
    /// Whether the failure points at configuration rather than at the input data.
    pub fn is_configuration(&self) -> bool {
        matches!(self, OrthoError::UnsupportedSpecies { .. } | OrthoError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, OrthoError>;
