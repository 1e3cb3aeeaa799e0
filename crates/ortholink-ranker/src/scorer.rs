//! Composite paralog score.
//!
//! ```text
//! score = w_sim · length·similarity/100
//!       + w_ident · length·identity/100
//!       + w_methods · matched / (possible + ε)
//!       + w_length · length / max_length
//! ```
//!
//! Missing alignment fields contribute zero; a candidate without any
//! alignment still scores on method coverage alone.

use ortholink_common::{ParalogWeights, RelationshipRecord};

use crate::weights::ScoreComponents;

/// Keeps the method ratio finite when no methods ran for the pair.
pub const METHOD_RATIO_EPSILON: f64 = 1e-5;

/// Largest alignment length across the candidates, or 0.0 when none has one.
pub fn max_alignment_length(records: &[RelationshipRecord]) -> f64 {
    records
        .iter()
        .filter_map(|r| r.alignment.and_then(|a| a.length))
        .fold(0.0, f64::max)
}

pub fn score_components(record: &RelationshipRecord, possible_methods: usize, max_length: f64) -> ScoreComponents {
    let alignment = record.alignment.unwrap_or_default();
    let length = alignment.length;

    let abs_similarity = match (length, alignment.similarity) {
        (Some(l), Some(s)) => l * (s / 100.0),
        _ => 0.0,
    };
    let abs_identity = match (length, alignment.identity) {
        (Some(l), Some(i)) => l * (i / 100.0),
        _ => 0.0,
    };
    let length_ratio = match length {
        Some(l) if max_length != 0.0 => l / max_length,
        _ => 0.0,
    };
    let method_ratio = record.method_count() as f64 / (possible_methods as f64 + METHOD_RATIO_EPSILON);

    ScoreComponents {
        abs_similarity,
        abs_identity,
        method_ratio,
        length_ratio,
    }
}

pub fn score(record: &RelationshipRecord, possible_methods: usize, max_length: f64, weights: &ParalogWeights) -> f64 {
    score_components(record, possible_methods, max_length).weighted_sum(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ortholink_common::Alignment;
    use ortholink_test_utils::relationship;

    #[test]
    fn test_missing_alignment_scores_on_methods_only() {
        let r = relationship(1, 7227, 2, 7227, &["PANTHER", "OMA", "InParanoid"]);
        let s = score(&r, 4, 900.0, &ParalogWeights::default());
        let expected = 1.5 * (3.0 / 4.00001);
        assert!((s - expected).abs() < 1e-9);
        assert!((s - 1.125).abs() < 1e-4);
    }

    #[test]
    fn test_full_alignment() {
        let mut r = relationship(1, 7227, 2, 7227, &["PANTHER", "OMA"]);
        r.alignment = Some(Alignment {
            length: Some(200.0),
            raw_score: Some(150.0),
            identity: Some(0.5),
            similarity: Some(0.75),
        });
        let c = score_components(&r, 2, 400.0);
        assert!((c.abs_similarity - 1.5).abs() < 1e-12);
        assert!((c.abs_identity - 1.0).abs() < 1e-12);
        assert!((c.length_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_max_length_drops_length_ratio() {
        let mut r = relationship(1, 7227, 2, 7227, &["PANTHER", "OMA"]);
        r.alignment = Some(Alignment { length: Some(0.0), ..Default::default() });
        let c = score_components(&r, 2, 0.0);
        assert_eq!(c.length_ratio, 0.0);
    }

    #[test]
    fn test_max_length_ignores_missing() {
        let mut a = relationship(1, 7227, 2, 7227, &["OMA"]);
        a.alignment = Some(Alignment { length: Some(120.0), ..Default::default() });
        let mut b = relationship(1, 7227, 3, 7227, &["OMA"]);
        b.alignment = Some(Alignment { length: Some(340.5), ..Default::default() });
        let c = relationship(1, 7227, 4, 7227, &["OMA"]);
        assert_eq!(max_alignment_length(&[a, b, c]), 340.5);
        assert_eq!(max_alignment_length(&[]), 0.0);
    }
}
