//! Run configuration for the reconciliation pipeline.
//!
//! Every field has a default, so an empty document is a valid config.
//! Loadable from YAML, JSON or TOML.

use serde::{Deserialize, Serialize};

use crate::entities::TaxonId;

/// Complete pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Curated methods that set both confidence filters on their own
    #[serde(default = "default_high_trust")]
    pub high_trust_methods: Vec<String>,

    /// Second-best adjustment for one species direction (orthology only)
    #[serde(default)]
    pub adjustment: AdjustmentConfig,

    #[serde(default)]
    pub paralogy: ParalogyConfig,

    #[serde(default)]
    pub external: ExternalFeedConfig,

    /// Ordered species pair checked for relationships without a reverse
    #[serde(default)]
    pub reciprocity: Option<(TaxonId, TaxonId)>,

    /// Record count above which the rayon path is used (with the `parallel` feature)
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_high_trust() -> Vec<String> {
    vec!["ZFIN".to_string(), "HGNC".to_string(), "Xenbase".to_string()]
}
fn default_parallel_threshold() -> usize { 50_000 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            high_trust_methods: default_high_trust(),
            adjustment: AdjustmentConfig::default(),
            paralogy: ParalogyConfig::default(),
            external: ExternalFeedConfig::default(),
            reciprocity: None,
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

// ── Historical adjustment ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// gene1 species of the adjusted direction
    #[serde(default = "default_reference_species")]
    pub reference_species: TaxonId,

    /// gene2 species of the adjusted direction
    #[serde(default = "default_target_species")]
    pub target_species: TaxonId,
}

fn default_true() -> bool { true }
fn default_reference_species() -> TaxonId { 9606 }
fn default_target_species() -> TaxonId { 7955 }

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reference_species: default_reference_species(),
            target_species: default_target_species(),
        }
    }
}

// ── Paralogy ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParalogyConfig {
    /// Species whose paralogs come from a single curated method
    #[serde(default = "default_curated_species")]
    pub curated_species: TaxonId,

    #[serde(default = "default_curated_method")]
    pub curated_method: String,

    #[serde(default)]
    pub weights: ParalogWeights,
}

fn default_curated_species() -> TaxonId { 4932 }
fn default_curated_method() -> String { "SGD".to_string() }

impl Default for ParalogyConfig {
    fn default() -> Self {
        Self {
            curated_species: default_curated_species(),
            curated_method: default_curated_method(),
            weights: ParalogWeights::default(),
        }
    }
}

/// Weights of the four paralog score components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParalogWeights {
    #[serde(default = "default_unit_weight")]
    pub similarity: f64,
    #[serde(default = "default_unit_weight")]
    pub identity: f64,
    #[serde(default = "default_coverage_weight")]
    pub method_ratio: f64,
    #[serde(default = "default_coverage_weight")]
    pub length_ratio: f64,
}

fn default_unit_weight() -> f64 { 1.0 }
fn default_coverage_weight() -> f64 { 1.5 }

impl Default for ParalogWeights {
    fn default() -> Self {
        Self {
            similarity: default_unit_weight(),
            identity: default_unit_weight(),
            method_ratio: default_coverage_weight(),
            length_ratio: default_coverage_weight(),
        }
    }
}

impl ParalogWeights {
    /// `[similarity, identity, method_ratio, length_ratio]`
    pub fn as_array(&self) -> [f64; 4] {
        [self.similarity, self.identity, self.method_ratio, self.length_ratio]
    }

    /// All weights finite and non-negative.
    pub fn validate(&self) -> bool {
        self.as_array().iter().all(|w| w.is_finite() && *w >= 0.0)
    }
}

// ── External feeds ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFeedConfig {
    /// Keep only entries whose matched methods include this one
    #[serde(default = "default_required_method")]
    pub required_method: Option<String>,

    /// Identifier-type hint used when normalising feed-only genes
    #[serde(default = "default_provider_hint")]
    pub provider_hint: String,
}

fn default_required_method() -> Option<String> { Some("Xenbase".to_string()) }
fn default_provider_hint() -> String { "Xenbase".to_string() }

impl Default for ExternalFeedConfig {
    fn default() -> Self {
        Self {
            required_method: default_required_method(),
            provider_hint: default_provider_hint(),
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

impl PipelineConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.paralogy.weights.validate() {
            return Err(crate::OrthoError::Config(
                "paralogy weights must be finite and non-negative".to_string(),
            ));
        }
        if self.paralogy.curated_method.trim().is_empty() {
            return Err(crate::OrthoError::Config(
                "paralogy.curated_method must not be empty".to_string(),
            ));
        }
        crate::species::rule_for(self.paralogy.curated_species)?;
        if self.adjustment.enabled {
            crate::species::rule_for(self.adjustment.reference_species)?;
            crate::species::rule_for(self.adjustment.target_species)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.high_trust_methods, vec!["ZFIN", "HGNC", "Xenbase"]);
        assert_eq!(
            config.adjustment,
            AdjustmentConfig { enabled: true, reference_species: 9606, target_species: 7955 }
        );
        assert_eq!(config.paralogy.curated_species, 4932);
        assert_eq!(config.paralogy.weights.as_array(), [1.0, 1.0, 1.5, 1.5]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_documents_use_defaults() {
        let from_json: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(from_json.external.provider_hint, "Xenbase");
        let from_toml: PipelineConfig = toml::from_str("").unwrap();
        assert_eq!(from_toml.paralogy.curated_method, "SGD");
    }

    #[test]
    fn test_partial_toml_override() {
        let doc = r#"
            high_trust_methods = ["HGNC"]
            reciprocity = [8355, 9606]

            [paralogy.weights]
            similarity = 2.0
        "#;
        let config: PipelineConfig = toml::from_str(doc).unwrap();
        assert_eq!(config.high_trust_methods, vec!["HGNC"]);
        assert_eq!(config.reciprocity, Some((8355, 9606)));
        assert_eq!(config.paralogy.weights.similarity, 2.0);
        assert_eq!(config.paralogy.weights.length_ratio, 1.5);
        assert!(config.adjustment.enabled);
    }

    #[test]
    fn test_adjustment_can_be_disabled() {
        let config: PipelineConfig = toml::from_str("[adjustment]\nenabled = false\n").unwrap();
        assert!(!config.adjustment.enabled);
        assert_eq!(config.adjustment.reference_species, 9606);
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut config = PipelineConfig::default();
        config.paralogy.weights.identity = -1.0;
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_validate_rejects_unknown_curated_species() {
        let mut config = PipelineConfig::default();
        config.paralogy.curated_species = 3702;
        assert!(config.validate().is_err());
    }
}
