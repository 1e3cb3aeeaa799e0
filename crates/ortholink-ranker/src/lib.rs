//! ortholink-ranker — Paralog scoring, pruning and dense ranking.

pub mod weights;
pub mod scorer;
pub mod prune;
pub mod rank;

pub use prune::keep_candidate;
pub use rank::{dense_rank, rank_paralogs, RankSummary};
pub use scorer::{max_alignment_length, score, score_components, METHOD_RATIO_EPSILON};
pub use weights::ScoreComponents;
