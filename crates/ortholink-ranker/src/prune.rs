//! Candidate pruning before ranking.

use ortholink_common::{ParalogyConfig, RelationshipRecord};

const MIN_METHODS: usize = 2;

/// Whether a paralog candidate survives pruning.
///
/// For the curated species the curated method must be among the matches;
/// everywhere else at least two methods must agree.
pub fn keep_candidate(record: &RelationshipRecord, config: &ParalogyConfig) -> bool {
    if record.species1 == config.curated_species {
        record.matched_methods.contains(&config.curated_method)
    } else {
        record.method_count() >= MIN_METHODS
    }
}
