//! Second-best score adjustment for one orthology direction.
//!
//! An older prediction release never flagged second-best candidates for one
//! species direction. For each reference-species gene, the second-best
//! candidate in the target species (by matched-method count, counting only
//! candidates with at least two methods) is flagged `Yes_Adjusted` when an
//! override list names the pair. An existing `Yes` is never touched.

use std::collections::{HashMap, HashSet};

use ortholink_common::{AdjustmentConfig, BestScore, GeneKey, RelationshipRecord};
use tracing::info;

const MIN_METHODS: usize = 2;

/// (gene1 key, gene2 key) pairs eligible for adjustment.
#[derive(Debug, Clone, Default)]
pub struct OverrideList {
    pairs: HashSet<(GeneKey, GeneKey)>,
}

impl OverrideList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, gene1: GeneKey, gene2: GeneKey) {
        self.pairs.insert((gene1, gene2));
    }

    pub fn contains(&self, gene1: GeneKey, gene2: GeneKey) -> bool {
        self.pairs.contains(&(gene1, gene2))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(GeneKey, GeneKey)> for OverrideList {
    fn from_iter<I: IntoIterator<Item = (GeneKey, GeneKey)>>(iter: I) -> Self {
        Self { pairs: iter.into_iter().collect() }
    }
}

/// Apply the adjustment in place. Returns how many records changed.
pub fn adjust_second_best(
    records: &mut [RelationshipRecord],
    config: &AdjustmentConfig,
    overrides: &OverrideList,
) -> usize {
    if !config.enabled || overrides.is_empty() {
        return 0;
    }

    // gene1 -> candidate indices, in insertion order
    let mut order: Vec<GeneKey> = Vec::new();
    let mut groups: HashMap<GeneKey, Vec<usize>> = HashMap::new();
    for (i, r) in records.iter().enumerate() {
        if r.species1 == config.reference_species && r.species2 == config.target_species {
            groups
                .entry(r.gene1_key)
                .or_insert_with(|| {
                    order.push(r.gene1_key);
                    Vec::new()
                })
                .push(i);
        }
    }

    let mut adjusted = 0;
    for gene1 in order {
        let Some(second) = second_best(records, &groups[&gene1]) else {
            continue;
        };
        let record = &mut records[second];
        if overrides.contains(gene1, record.gene2_key) && record.best_score != Some(BestScore::Yes) {
            record.best_score = Some(BestScore::YesAdjusted);
            adjusted += 1;
        }
    }

    info!(adjusted, "Second-best adjustment applied");
    adjusted
}

/// Index of the second-best candidate. Ties move the earlier leader down to
/// second place.
fn second_best(records: &[RelationshipRecord], candidates: &[usize]) -> Option<usize> {
    let mut best: (usize, Option<usize>) = (0, None);
    let mut second: (usize, Option<usize>) = (0, None);
    for &i in candidates {
        let score = records[i].method_count();
        if score < MIN_METHODS {
            continue;
        }
        if score >= best.0 {
            second = best;
            best = (score, Some(i));
        } else if score >= second.0 {
            second = (score, Some(i));
        }
    }
    second.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use ortholink_test_utils::relationship;

    fn config() -> AdjustmentConfig {
        AdjustmentConfig { enabled: true, reference_species: 9606, target_species: 7955 }
    }

    fn fish(g1: i64, g2: i64, methods: &[&str], best: BestScore) -> RelationshipRecord {
        let mut r = relationship(g1, 9606, g2, 7955, methods);
        r.best_score = Some(best);
        r
    }

    #[test]
    fn test_second_best_is_adjusted() {
        let mut records = vec![
            fish(1, 10, &["PANTHER", "OMA", "ZFIN"], BestScore::No),
            fish(1, 11, &["PANTHER", "OMA"], BestScore::No),
        ];
        let overrides: OverrideList = [(GeneKey(1), GeneKey(11))].into_iter().collect();

        let n = adjust_second_best(&mut records, &config(), &overrides);

        assert_eq!(n, 1);
        assert_eq!(records[0].best_score, Some(BestScore::No));
        assert_eq!(records[1].best_score, Some(BestScore::YesAdjusted));
    }

    #[test]
    fn test_order_does_not_change_second_best() {
        let mut records = vec![
            fish(1, 11, &["PANTHER", "OMA"], BestScore::No),
            fish(1, 10, &["PANTHER", "OMA", "ZFIN"], BestScore::No),
        ];
        let overrides: OverrideList = [(GeneKey(1), GeneKey(11))].into_iter().collect();
        adjust_second_best(&mut records, &config(), &overrides);
        assert_eq!(records[0].best_score, Some(BestScore::YesAdjusted));
    }

    #[test]
    fn test_existing_yes_is_kept() {
        let mut records = vec![
            fish(1, 10, &["PANTHER", "OMA", "ZFIN"], BestScore::No),
            fish(1, 11, &["PANTHER", "OMA"], BestScore::Yes),
        ];
        let overrides: OverrideList = [(GeneKey(1), GeneKey(11))].into_iter().collect();
        assert_eq!(adjust_second_best(&mut records, &config(), &overrides), 0);
        assert_eq!(records[1].best_score, Some(BestScore::Yes));
    }

    #[test]
    fn test_single_method_candidates_are_ignored() {
        let mut records = vec![
            fish(1, 10, &["PANTHER", "OMA"], BestScore::No),
            fish(1, 11, &["PANTHER"], BestScore::No),
        ];
        let overrides: OverrideList = [(GeneKey(1), GeneKey(11))].into_iter().collect();
        assert_eq!(adjust_second_best(&mut records, &config(), &overrides), 0);
    }

    #[test]
    fn test_other_directions_untouched() {
        let mut reverse = relationship(10, 7955, 1, 9606, &["PANTHER", "OMA"]);
        reverse.best_score = Some(BestScore::No);
        let mut records = vec![
            fish(1, 10, &["PANTHER", "OMA", "ZFIN"], BestScore::No),
            reverse,
        ];
        let overrides: OverrideList = [(GeneKey(10), GeneKey(1))].into_iter().collect();
        assert_eq!(adjust_second_best(&mut records, &config(), &overrides), 0);
    }

    #[test]
    fn test_disabled_is_noop() {
        let mut records = vec![
            fish(1, 10, &["PANTHER", "OMA", "ZFIN"], BestScore::No),
            fish(1, 11, &["PANTHER", "OMA"], BestScore::No),
        ];
        let overrides: OverrideList = [(GeneKey(1), GeneKey(11))].into_iter().collect();
        let cfg = AdjustmentConfig { enabled: false, ..config() };
        assert_eq!(adjust_second_best(&mut records, &cfg, &overrides), 0);
    }
}
