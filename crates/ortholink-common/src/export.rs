//! Output record shapes. Field names are what downstream loaders read.

use serde::Serialize;

use crate::entities::{BestScore, RelationshipRecord, TaxonId};

/// One relationship as written to an export document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipExport {
    pub gene1: String,
    pub gene1_species: TaxonId,
    pub gene2: String,
    pub gene2_species: TaxonId,
    pub prediction_methods_matched: Vec<String>,
    pub prediction_methods_not_matched: Vec<String>,
    pub prediction_methods_not_called: Vec<String>,
    pub is_best_score: Option<BestScore>,
    pub is_best_rev_score: Option<BestScore>,
    pub confidence: Option<f64>,
    pub strict_filter: bool,
    pub moderate_filter: bool,
}

impl From<&RelationshipRecord> for RelationshipExport {
    fn from(r: &RelationshipRecord) -> Self {
        Self {
            gene1: r.gene1_id.clone(),
            gene1_species: r.species1,
            gene2: r.gene2_id.clone(),
            gene2_species: r.species2,
            prediction_methods_matched: r.matched_methods.iter().cloned().collect(),
            prediction_methods_not_matched: r.not_matched_methods.iter().cloned().collect(),
            prediction_methods_not_called: r.not_called_methods.iter().cloned().collect(),
            is_best_score: r.best_score,
            is_best_rev_score: r.best_score_rev,
            confidence: r.confidence,
            strict_filter: r.strict_filter,
            moderate_filter: r.moderate_filter,
        }
    }
}

/// Paralogy adds integer alignment stats and the rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParalogExport {
    #[serde(flatten)]
    pub relationship: RelationshipExport,
    pub length: Option<i64>,
    pub identity: Option<i64>,
    pub similarity: Option<i64>,
    pub rank: Option<u32>,
}

impl From<&RelationshipRecord> for ParalogExport {
    fn from(r: &RelationshipRecord) -> Self {
        let alignment = r.alignment.unwrap_or_default();
        Self {
            relationship: RelationshipExport::from(r),
            length: alignment.length_truncated(),
            identity: alignment.identity_percent(),
            similarity: alignment.similarity_percent(),
            rank: r.rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Alignment, DataSource, GeneKey, MethodSet};
    use crate::species::Provider;

    fn record() -> RelationshipRecord {
        let methods: MethodSet = ["PANTHER", "OMA"].iter().map(|s| s.to_string()).collect();
        RelationshipRecord {
            gene1_key: GeneKey(1),
            gene2_key: GeneKey(2),
            gene1_id: "DRSC:FBgn0000001".into(),
            gene2_id: "DRSC:FBgn0000002".into(),
            species1: 7227,
            species2: 7227,
            gene1_provider: Some(Provider::FlyBase),
            gene2_provider: Some(Provider::FlyBase),
            matched_methods: methods,
            not_matched_methods: MethodSet::new(),
            not_called_methods: MethodSet::new(),
            best_score: Some(BestScore::Yes),
            best_score_rev: None,
            confidence: None,
            strict_filter: false,
            moderate_filter: false,
            data_source: DataSource::Primary,
            rank: Some(1),
            alignment: Some(Alignment {
                length: Some(410.0),
                raw_score: Some(220.0),
                identity: Some(0.31),
                similarity: None,
            }),
        }
    }

    #[test]
    fn test_relationship_field_names() {
        let value = serde_json::to_value(RelationshipExport::from(&record())).unwrap();
        assert_eq!(value["gene1Species"], 7227);
        assert_eq!(value["predictionMethodsMatched"], serde_json::json!(["OMA", "PANTHER"]));
        assert_eq!(value["isBestScore"], "Yes");
        assert!(value["isBestRevScore"].is_null());
    }

    #[test]
    fn test_paralog_export_flattens_and_converts() {
        let value = serde_json::to_value(ParalogExport::from(&record())).unwrap();
        assert_eq!(value["gene1"], "DRSC:FBgn0000001");
        assert_eq!(value["length"], 410);
        assert_eq!(value["identity"], 31);
        assert!(value["similarity"].is_null());
        assert_eq!(value["rank"], 1);
    }
}
