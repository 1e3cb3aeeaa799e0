//! ortholink-common — Shared types, errors, species tables and filters used across all ortholink crates.

pub mod error;
pub mod entities;
pub mod species;
pub mod diagnostics;
pub mod confidence;
pub mod config;
pub mod export;

// Re-export commonly used types
pub use config::{AdjustmentConfig, ExternalFeedConfig, ParalogWeights, ParalogyConfig, PipelineConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use entities::{
    Alignment, BestScore, DataSource, DedupKey, ExternalRelationship, GeneKey, GeneRecord,
    MethodSet, RelationshipKind, RelationshipRecord, TaxonId,
};
pub use error::{OrthoError, Result};
pub use export::{ParalogExport, RelationshipExport};
pub use species::{Provider, SpeciesRule};
