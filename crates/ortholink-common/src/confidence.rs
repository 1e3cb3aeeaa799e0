//! Confidence filters for relationship records.
//!
//! Two independent tiers, strict and moderate, derived from the matched
//! method set and the best-score flags. Pure: only the record's own fields
//! are read and only the two booleans are written.

use crate::entities::{BestScore, MethodSet, RelationshipRecord};

/// Result of classifying one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfidenceFilters {
    pub strict: bool,
    pub moderate: bool,
}

/// Inputs the decision table reads.
#[derive(Debug, Clone, Copy)]
pub struct Evidence<'a> {
    pub matched: &'a MethodSet,
    pub best_score: Option<BestScore>,
    pub best_score_rev: Option<BestScore>,
}

impl<'a> Evidence<'a> {
    pub fn of(record: &'a RelationshipRecord) -> Self {
        Self {
            matched: &record.matched_methods,
            best_score: record.best_score,
            best_score_rev: record.best_score_rev,
        }
    }

    fn forward_best(&self) -> bool {
        BestScore::is_affirmative(self.best_score)
    }

    // The reverse flag is never adjusted, so only a plain Yes counts.
    fn reverse_best(&self) -> bool {
        self.best_score_rev == Some(BestScore::Yes)
    }

    /// Two methods that are best in both directions.
    fn reciprocal_pair(&self) -> bool {
        self.matched.len() == 2 && self.forward_best() && self.reverse_best()
    }

    /// Rule 2 of the decision table.
    pub fn meets_strict_rule(&self) -> bool {
        let n = self.matched.len();
        (n > 2 && (self.forward_best() || self.reverse_best())) || self.reciprocal_pair()
    }
}

/// Whether any of the configured curated methods was matched.
pub fn has_high_trust(matched: &MethodSet, high_trust: &[String]) -> bool {
    high_trust.iter().any(|m| matched.contains(m))
}

/// Evaluate the decision table.
///
/// 1. A high-trust method sets both filters.
/// 2. Enough methods plus best-score support sets strict.
/// 3. Otherwise enough methods alone sets moderate.
pub fn classify(evidence: Evidence<'_>, high_trust: &[String]) -> ConfidenceFilters {
    let mut filters = ConfidenceFilters::default();

    if has_high_trust(evidence.matched, high_trust) {
        filters.strict = true;
        filters.moderate = true;
    }

    if evidence.meets_strict_rule() {
        filters.strict = true;
    } else if evidence.matched.len() > 2 || evidence.reciprocal_pair() {
        filters.moderate = true;
    }

    filters
}

/// Classify a record and write the filters back onto it.
pub fn apply(record: &mut RelationshipRecord, high_trust: &[String]) {
    let filters = classify(Evidence::of(record), high_trust);
    record.strict_filter = filters.strict;
    record.moderate_filter = filters.moderate;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methods(names: &[&str]) -> MethodSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn trust() -> Vec<String> {
        vec!["ZFIN".into(), "HGNC".into(), "Xenbase".into()]
    }

    fn run(names: &[&str], best: Option<BestScore>, rev: Option<BestScore>) -> ConfidenceFilters {
        let matched = methods(names);
        classify(
            Evidence { matched: &matched, best_score: best, best_score_rev: rev },
            &trust(),
        )
    }

    #[test]
    fn test_high_trust_sets_both() {
        let f = run(&["HGNC"], None, None);
        assert_eq!(f, ConfidenceFilters { strict: true, moderate: true });
    }

    #[test]
    fn test_single_method_with_best_is_nothing() {
        let f = run(&["PANTHER"], Some(BestScore::Yes), Some(BestScore::No));
        assert_eq!(f, ConfidenceFilters::default());
    }

    #[test]
    fn test_three_methods_with_forward_best_is_strict_only() {
        let f = run(&["PANTHER", "OMA", "InParanoid"], Some(BestScore::YesAdjusted), None);
        assert!(f.strict);
        // Rule 3 is an else branch, so moderate is not set here.
        assert!(!f.moderate);
    }

    #[test]
    fn test_three_methods_without_best_is_moderate() {
        let f = run(&["PANTHER", "OMA", "InParanoid"], Some(BestScore::No), Some(BestScore::No));
        assert_eq!(f, ConfidenceFilters { strict: false, moderate: true });
    }

    #[test]
    fn test_two_methods_need_both_directions() {
        let reciprocal = run(&["PANTHER", "OMA"], Some(BestScore::Yes), Some(BestScore::Yes));
        assert!(reciprocal.strict);

        let one_way = run(&["PANTHER", "OMA"], Some(BestScore::Yes), Some(BestScore::No));
        assert_eq!(one_way, ConfidenceFilters::default());
    }

    #[test]
    fn test_adjusted_reverse_flag_does_not_count() {
        let f = run(&["PANTHER", "OMA"], Some(BestScore::Yes), Some(BestScore::YesAdjusted));
        assert!(!f.strict);
    }

    #[test]
    fn test_strict_implies_trust_or_rule_two() {
        let cases: Vec<(Vec<&str>, Option<BestScore>, Option<BestScore>)> = vec![
            (vec!["ZFIN"], None, None),
            (vec!["PANTHER", "OMA"], Some(BestScore::Yes), Some(BestScore::Yes)),
            (vec!["PANTHER", "OMA", "Roundup"], None, Some(BestScore::Yes)),
            (vec!["PANTHER", "OMA", "Roundup"], None, None),
            (vec!["PANTHER"], Some(BestScore::Yes), Some(BestScore::Yes)),
        ];
        for (names, best, rev) in cases {
            let matched = methods(&names);
            let ev = Evidence { matched: &matched, best_score: best, best_score_rev: rev };
            let f = classify(ev, &trust());
            if f.strict {
                assert!(has_high_trust(&matched, &trust()) || ev.meets_strict_rule());
            }
        }
    }
}
