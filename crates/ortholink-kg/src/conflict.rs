//! What to do with an observation whose dedup key may already be stored.

use ortholink_common::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// No record under the key yet.
    Create,
    /// Same primary source: union the algorithm into the matched set.
    Extend,
    /// A second external entry under the key. External feeds are
    /// pre-aggregated, so the entry is dropped.
    DuplicateExternal,
    /// The key is held by the other source. The stored record wins.
    CrossSource { kept: DataSource, dropped: DataSource },
}

/// Decide how an incoming observation interacts with the stored record.
pub fn evaluate_observation(existing: Option<DataSource>, incoming: DataSource) -> MergeDecision {
    match (existing, incoming) {
        (None, _) => MergeDecision::Create,
        (Some(DataSource::Primary), DataSource::Primary) => MergeDecision::Extend,
        (Some(DataSource::External), DataSource::External) => MergeDecision::DuplicateExternal,
        (Some(kept), dropped) => MergeDecision::CrossSource { kept, dropped },
    }
}
