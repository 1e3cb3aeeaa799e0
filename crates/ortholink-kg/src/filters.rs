//! Confidence filters over every record of a run.

use ortholink_common::confidence;
use ortholink_common::RelationshipRecord;
use tracing::info;

/// Classify every record in place. With the `parallel` feature, inputs
/// larger than `parallel_threshold` are split across the rayon pool.
pub fn apply_confidence_filters(
    records: &mut [RelationshipRecord],
    high_trust: &[String],
    parallel_threshold: usize,
) {
    #[cfg(feature = "parallel")]
    {
        if records.len() > parallel_threshold {
            use rayon::prelude::*;
            records
                .par_iter_mut()
                .for_each(|r| confidence::apply(r, high_trust));
            log_counts(records);
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel_threshold;

    for record in records.iter_mut() {
        confidence::apply(record, high_trust);
    }
    log_counts(records);
}

fn log_counts(records: &[RelationshipRecord]) {
    let strict = records.iter().filter(|r| r.strict_filter).count();
    let moderate = records.iter().filter(|r| r.moderate_filter).count();
    info!(records = records.len(), strict, moderate, "Confidence filters applied");
}
