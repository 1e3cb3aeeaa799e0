//! Supported species, their data providers, and the identifier conventions
//! each provider uses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::TaxonId;
use crate::error::{OrthoError, Result};

/// Prefix every canonical identifier carries.
pub const TOP_LEVEL_NAMESPACE: &str = "DRSC:";

/// Model-organism database that owns a gene's identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "FB")]
    FlyBase,
    #[serde(rename = "WB")]
    WormBase,
    #[serde(rename = "ZFIN")]
    Zfin,
    #[serde(rename = "MGI")]
    Mgi,
    #[serde(rename = "RGD")]
    Rgd,
    #[serde(rename = "SGD")]
    Sgd,
    #[serde(rename = "HGNC")]
    Hgnc,
    Xenbase,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::FlyBase  => "FB",
            Provider::WormBase => "WB",
            Provider::Zfin     => "ZFIN",
            Provider::Mgi      => "MGI",
            Provider::Rgd      => "RGD",
            Provider::Sgd      => "SGD",
            Provider::Hgnc     => "HGNC",
            Provider::Xenbase  => "Xenbase",
        }
    }

    /// Provider named explicitly by an identifier-type hint. Only three
    /// hints override the species default; everything else returns `None`.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim() {
            "FLYBASE"  => Some(Provider::FlyBase),
            "WormBase" => Some(Provider::WormBase),
            "Xenbase"  => Some(Provider::Xenbase),
            _          => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier conventions for one species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesRule {
    pub taxon: TaxonId,
    pub name: &'static str,
    pub provider: Provider,
    /// Token inserted after `DRSC:` for providers whose raw ids omit it.
    pub sub_namespace: Option<&'static str>,
    /// Every valid canonical id for the species starts with this.
    pub signature: &'static str,
    /// Export file label for records whose gene1 belongs to this species.
    pub export_label: &'static str,
}

pub const SPECIES_RULES: &[SpeciesRule] = &[
    SpeciesRule { taxon: 7955,  name: "Danio rerio",              provider: Provider::Zfin,     sub_namespace: None,             signature: "DRSC:ZDB",             export_label: "ZFIN" },
    SpeciesRule { taxon: 6239,  name: "Caenorhabditis elegans",   provider: Provider::WormBase, sub_namespace: None,             signature: "DRSC:WBGene",          export_label: "WormBase" },
    SpeciesRule { taxon: 10090, name: "Mus musculus",             provider: Provider::Mgi,      sub_namespace: Some("MGI:"),     signature: "DRSC:MGI",             export_label: "MGI" },
    SpeciesRule { taxon: 10116, name: "Rattus norvegicus",        provider: Provider::Rgd,      sub_namespace: Some("RGD:"),     signature: "DRSC:RGD",             export_label: "RGD" },
    // SGD ids are bare S-numbers (S000001234).
    SpeciesRule { taxon: 4932,  name: "Saccharomyces cerevisiae", provider: Provider::Sgd,      sub_namespace: None,             signature: "DRSC:S",               export_label: "SGD" },
    SpeciesRule { taxon: 7227,  name: "Drosophila melanogaster",  provider: Provider::FlyBase,  sub_namespace: None,             signature: "DRSC:FBgn",            export_label: "FlyBase" },
    SpeciesRule { taxon: 9606,  name: "Homo sapiens",             provider: Provider::Hgnc,     sub_namespace: Some("HGNC:"),    signature: "DRSC:HGNC",            export_label: "Human" },
    SpeciesRule { taxon: 8364,  name: "Xenopus tropicalis",       provider: Provider::Xenbase,  sub_namespace: Some("Xenbase:"), signature: "DRSC:Xenbase:XB-GENE", export_label: "XBXT" },
    SpeciesRule { taxon: 8355,  name: "Xenopus laevis",           provider: Provider::Xenbase,  sub_namespace: Some("Xenbase:"), signature: "DRSC:Xenbase:XB-GENE", export_label: "XBXL" },
];

/// Look up the rule for a taxon. Unknown species abort the run.
pub fn rule_for(taxon: TaxonId) -> Result<&'static SpeciesRule> {
    SPECIES_RULES
        .iter()
        .find(|r| r.taxon == taxon)
        .ok_or(OrthoError::UnsupportedSpecies { taxon })
}

/// Provider-side aliases for algorithm names, mapped to the canonical spelling.
const ALGORITHM_ALIASES: &[(&str, &str)] = &[
    ("Panther", "PANTHER"),
    ("Phylome", "PhylomeDB"),
    ("Compara", "Ensembl Compara"),
    ("Inparanoid", "InParanoid"),
    ("RoundUp", "Roundup"),
    ("sonicParanoid", "SonicParanoid"),
];

/// Canonical algorithm name. Names without an alias pass through.
pub fn canonical_algorithm(name: &str) -> &str {
    ALGORITHM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}
