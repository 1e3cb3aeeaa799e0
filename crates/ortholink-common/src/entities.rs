//! Core record types shared by every phase of a reconciliation run.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::species::Provider;

/// NCBI taxon id, e.g. 9606 for H. sapiens.
pub type TaxonId = u32;

/// Algorithm names. Ordered so exports and tests are deterministic.
pub type MethodSet = BTreeSet<String>;

// ---------------------------------------------------------------------------
// Gene
// ---------------------------------------------------------------------------

/// Internal gene key from the primary extract (or synthetic, for genes only
/// an external feed mentions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneKey(pub i64);

impl fmt::Display for GeneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRecord {
    pub internal_key: GeneKey,
    pub species: TaxonId,
    /// Provider-prefixed identifier, e.g. `DRSC:HGNC:1100`.
    pub canonical_id: String,
    pub symbol: Option<String>,
    pub provider: Option<Provider>,
    /// The canonical id was built from the symbol because the raw id was null.
    pub degraded: bool,
}

impl GeneRecord {
    /// (species, canonical id): two records sharing it are the same real gene.
    pub fn identity(&self) -> (TaxonId, &str) {
        (self.species, self.canonical_id.as_str())
    }
}

// ---------------------------------------------------------------------------
// Best-score flags and data source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BestScore {
    Yes,
    #[serde(rename = "Yes_Adjusted")]
    YesAdjusted,
    No,
}

impl BestScore {
    pub fn as_str(&self) -> &'static str {
        match self {
            BestScore::Yes         => "Yes",
            BestScore::YesAdjusted => "Yes_Adjusted",
            BestScore::No          => "No",
        }
    }

    /// Parse the value stored in the extract. Anything unrecognised is null.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Yes"          => Some(BestScore::Yes),
            "Yes_Adjusted" => Some(BestScore::YesAdjusted),
            "No"           => Some(BestScore::No),
            _              => None,
        }
    }

    /// `Yes` or `Yes_Adjusted`.
    pub fn is_affirmative(flag: Option<BestScore>) -> bool {
        matches!(flag, Some(BestScore::Yes) | Some(BestScore::YesAdjusted))
    }
}

/// Where a relationship record came from. Declaration order is merge priority:
/// every `Primary` observation is merged before any `External` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Primary,
    External,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Primary  => "primary",
            DataSource::External => "external",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Orthology,
    Paralogy,
}

// ---------------------------------------------------------------------------
// Alignment statistics (paralogy)
// ---------------------------------------------------------------------------

/// Pairwise protein alignment stats. `identity` and `similarity` are stored
/// as fractions in the extract (0.39 = 39%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub length: Option<f64>,
    pub raw_score: Option<f64>,
    pub identity: Option<f64>,
    pub similarity: Option<f64>,
}

impl Alignment {
    /// Names of the fields that are null.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.length.is_none()     { missing.push("length"); }
        if self.identity.is_none()   { missing.push("identity"); }
        if self.similarity.is_none() { missing.push("similarity"); }
        if self.raw_score.is_none()  { missing.push("score"); }
        missing
    }

    /// Length rounded to two places, then truncated.
    pub fn length_truncated(&self) -> Option<i64> {
        self.length.map(|l| round2(l) as i64)
    }

    pub fn identity_percent(&self) -> Option<i64> {
        self.identity.map(fraction_to_percent)
    }

    pub fn similarity_percent(&self) -> Option<i64> {
        self.similarity.map(fraction_to_percent)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to two places, scale to a percentage, drop the fraction.
fn fraction_to_percent(value: f64) -> i64 {
    (round2(value) * 100.0) as i64
}

// ---------------------------------------------------------------------------
// Relationship record
// ---------------------------------------------------------------------------

/// Identity of a relationship. Directed: (a, b) and (b, a) are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DedupKey {
    pub gene1_id: String,
    pub gene2_id: String,
    pub species1: TaxonId,
    pub species2: TaxonId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub gene1_key: GeneKey,
    pub gene2_key: GeneKey,
    pub gene1_id: String,
    pub gene2_id: String,
    pub species1: TaxonId,
    pub species2: TaxonId,
    pub gene1_provider: Option<Provider>,
    pub gene2_provider: Option<Provider>,
    pub matched_methods: MethodSet,
    pub not_matched_methods: MethodSet,
    pub not_called_methods: MethodSet,
    pub best_score: Option<BestScore>,
    pub best_score_rev: Option<BestScore>,
    pub confidence: Option<f64>,
    pub strict_filter: bool,
    pub moderate_filter: bool,
    pub data_source: DataSource,
    pub rank: Option<u32>,
    pub alignment: Option<Alignment>,
}

impl RelationshipRecord {
    /// A fresh record between two registered genes, with no evidence attached yet.
    pub fn between(gene1: &GeneRecord, gene2: &GeneRecord, data_source: DataSource) -> Self {
        Self {
            gene1_key: gene1.internal_key,
            gene2_key: gene2.internal_key,
            gene1_id: gene1.canonical_id.clone(),
            gene2_id: gene2.canonical_id.clone(),
            species1: gene1.species,
            species2: gene2.species,
            gene1_provider: gene1.provider,
            gene2_provider: gene2.provider,
            matched_methods: MethodSet::new(),
            not_matched_methods: MethodSet::new(),
            not_called_methods: MethodSet::new(),
            best_score: None,
            best_score_rev: None,
            confidence: None,
            strict_filter: false,
            moderate_filter: false,
            data_source,
            rank: None,
            alignment: None,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey {
            gene1_id: self.gene1_id.clone(),
            gene2_id: self.gene2_id.clone(),
            species1: self.species1,
            species2: self.species2,
        }
    }

    pub fn is_same_species(&self) -> bool {
        self.species1 == self.species2
    }

    pub fn method_count(&self) -> usize {
        self.matched_methods.len()
    }
}

// ---------------------------------------------------------------------------
// External curated feed
// ---------------------------------------------------------------------------

/// One entry of an external feed's `data` array. The feed is pre-aggregated:
/// each entry already carries its method partition and best-score flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRelationship {
    pub gene1: String,
    pub gene2: String,
    pub gene1_species: TaxonId,
    pub gene2_species: TaxonId,
    #[serde(default)]
    pub prediction_methods_matched: Vec<String>,
    #[serde(default)]
    pub prediction_methods_not_matched: Vec<String>,
    #[serde(default)]
    pub prediction_methods_not_called: Vec<String>,
    #[serde(default)]
    pub is_best_score: Option<BestScore>,
    #[serde(default)]
    pub is_best_rev_score: Option<BestScore>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl ExternalRelationship {
    /// Every algorithm the entry mentions, in any of its three lists.
    pub fn mentioned_methods(&self) -> impl Iterator<Item = &str> {
        self.prediction_methods_matched
            .iter()
            .chain(self.prediction_methods_not_matched.iter())
            .chain(self.prediction_methods_not_called.iter())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_score_serde_names() {
        let json = serde_json::to_string(&BestScore::YesAdjusted).unwrap();
        assert_eq!(json, "\"Yes_Adjusted\"");
        let parsed: BestScore = serde_json::from_str("\"No\"").unwrap();
        assert_eq!(parsed, BestScore::No);
    }

    #[test]
    fn test_best_score_affirmative() {
        assert!(BestScore::is_affirmative(Some(BestScore::Yes)));
        assert!(BestScore::is_affirmative(Some(BestScore::YesAdjusted)));
        assert!(!BestScore::is_affirmative(Some(BestScore::No)));
        assert!(!BestScore::is_affirmative(None));
        assert_eq!(BestScore::parse("maybe"), None);
    }

    #[test]
    fn test_primary_sorts_before_external() {
        assert!(DataSource::Primary < DataSource::External);
    }

    #[test]
    fn test_alignment_percentages_truncate() {
        let a = Alignment {
            length: Some(315.7),
            raw_score: Some(541.0),
            identity: Some(0.393651),
            similarity: Some(0.574603),
        };
        assert_eq!(a.length_truncated(), Some(315));
        assert_eq!(a.identity_percent(), Some(39));
        // round(0.574603, 2) = 0.57; 0.57 * 100 is just under 57 in f64.
        assert_eq!(a.similarity_percent(), Some(56));
        assert!(a.missing_fields().is_empty());
    }

    #[test]
    fn test_external_relationship_parses_feed_entry() {
        let json = r#"{
            "gene1": "Xenbase:XB-GENE-494002",
            "gene2": "HGNC:1100",
            "gene1Species": 8364,
            "gene2Species": 9606,
            "predictionMethodsMatched": ["Xenbase", "PANTHER"],
            "predictionMethodsNotMatched": [],
            "predictionMethodsNotCalled": ["sonicParanoid"],
            "isBestScore": "Yes",
            "isBestRevScore": "No",
            "confidence": 0.75,
            "strictFilter": true
        }"#;
        let rel: ExternalRelationship = serde_json::from_str(json).unwrap();
        assert_eq!(rel.gene1_species, 8364);
        assert_eq!(rel.is_best_rev_score, Some(BestScore::No));
        assert_eq!(rel.mentioned_methods().count(), 3);
    }
}
