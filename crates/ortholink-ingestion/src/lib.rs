//! ortholink-ingestion — Inputs and the reconciliation pipeline.
//! - Primary extract loaders (delimited tables)
//! - External curated feed loader
//! - Identifier normalisation and retired-id migrations
//! - Phase-ordered orthology and paralogy runs

pub mod models;
pub mod normalise;
pub mod pipeline;
pub mod sources;

pub use models::{AlignmentRow, BestScoreRow, ExternalFeed, GeneInfoRow, PairEvidenceRow, PrimaryExtract};
pub use pipeline::{run_orthology, run_paralogy, run_with_diagnostics, RunInputs, RunOutput, RunStats};
