//! ortholink-kg — Relationship graph construction.
//! Gene registry, method universe, relationship merging and the passes that
//! run over the merged records before ranking or export.

pub mod registry;
pub mod universe;
pub mod conflict;
pub mod repository;
pub mod adjust;
pub mod filters;
pub mod reciprocity;

pub use adjust::{adjust_second_best, OverrideList};
pub use filters::apply_confidence_filters;
pub use reciprocity::check_reciprocity;
pub use registry::GeneRegistry;
pub use repository::{BestScoreEntry, BestScoreIndex, MergeOutcome, Observation, RelationshipStore};
pub use universe::{normalize_algorithm_name, AlgorithmUniverse, MethodPartition, UniverseBuilder};
