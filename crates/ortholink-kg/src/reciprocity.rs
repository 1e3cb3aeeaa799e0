//! Reciprocity audit for one ordered species pair.

use std::collections::HashSet;

use ortholink_common::{Diagnostic, Diagnostics, RelationshipRecord, TaxonId};
use tracing::info;

/// Record every A->B relationship with no B->A counterpart, and every B->A
/// with no A->B. Returns the number reported.
pub fn check_reciprocity(
    records: &[RelationshipRecord],
    pair: (TaxonId, TaxonId),
    diagnostics: &mut Diagnostics,
) -> usize {
    let (a, b) = pair;
    if a == b {
        return 0;
    }

    let directed: HashSet<(&str, &str, TaxonId, TaxonId)> = records
        .iter()
        .filter(|r| (r.species1, r.species2) == (a, b) || (r.species1, r.species2) == (b, a))
        .map(|r| (r.gene1_id.as_str(), r.gene2_id.as_str(), r.species1, r.species2))
        .collect();

    let mut reported = 0;
    for r in records {
        let in_pair = (r.species1, r.species2) == (a, b) || (r.species1, r.species2) == (b, a);
        if !in_pair {
            continue;
        }
        let reverse = (r.gene2_id.as_str(), r.gene1_id.as_str(), r.species2, r.species1);
        if !directed.contains(&reverse) {
            diagnostics.record(Diagnostic::UnidirectionalRelationship { key: r.dedup_key() });
            reported += 1;
        }
    }

    info!(species1 = a, species2 = b, unidirectional = reported, "Reciprocity check complete");
    reported
}

#[cfg(test)]
mod tests {
    use super::*;
    use ortholink_common::DiagnosticKind;
    use ortholink_test_utils::relationship;

    #[test]
    fn test_one_way_relationships_reported() {
        let records = vec![
            relationship(1, 8355, 2, 9606, &["Xenbase"]),
            relationship(2, 9606, 1, 8355, &["Xenbase"]),
            relationship(3, 8355, 4, 9606, &["Xenbase"]),
            relationship(6, 9606, 5, 8355, &["Xenbase"]),
            relationship(7, 8364, 8, 9606, &["Xenbase"]),
        ];
        let mut diags = Diagnostics::new();
        let n = check_reciprocity(&records, (8355, 9606), &mut diags);
        assert_eq!(n, 2);
        assert_eq!(diags.count(DiagnosticKind::UnidirectionalRelationship), 2);
    }

    #[test]
    fn test_same_species_pair_skipped() {
        let records = vec![relationship(1, 7227, 2, 7227, &["OMA"])];
        let mut diags = Diagnostics::new();
        assert_eq!(check_reciprocity(&records, (7227, 7227), &mut diags), 0);
    }
}
