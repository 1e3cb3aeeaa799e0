//! Canonical gene identifiers.
//!
//! A canonical id is the species' raw id under the `DRSC:` namespace, with
//! the provider's sub-namespace inserted for providers whose raw ids omit it
//! (`1100` -> `DRSC:HGNC:1100`). Ids that already carry `DRSC:` pass through.
//! The result must start with the species' signature; anything else is
//! rejected, which keeps a feed's cross-species mix-ups out of the registry.

use ortholink_common::species::{rule_for, SpeciesRule, TOP_LEVEL_NAMESPACE};
use ortholink_common::{Diagnostic, Diagnostics, GeneKey, GeneRecord, Provider, Result, TaxonId};
use tracing::debug;

use crate::models::GeneInfoRow;
use crate::normalise::migration::{migrate, IdentifierMigrations};

/// Canonical id for `raw` under `rule`, or `None` if it fails the signature.
pub fn canonical_identifier(raw: &str, rule: &SpeciesRule) -> Option<String> {
    let raw = raw.trim();
    let candidate = if raw.starts_with(TOP_LEVEL_NAMESPACE) {
        raw.to_string()
    } else {
        match rule.sub_namespace {
            Some(ns) if !raw.starts_with(ns) => format!("{TOP_LEVEL_NAMESPACE}{ns}{raw}"),
            _ => format!("{TOP_LEVEL_NAMESPACE}{raw}"),
        }
    };
    candidate.starts_with(rule.signature).then_some(candidate)
}

/// Provider named by the hint, else the species' own provider.
pub fn resolve_provider(hint: Option<&str>, species: TaxonId) -> Result<Provider> {
    let rule = rule_for(species)?;
    Ok(hint.and_then(Provider::from_hint).unwrap_or(rule.provider))
}

/// Turns raw gene rows into registry records.
pub struct IdentifierNormalizer<'m> {
    migrations: &'m dyn IdentifierMigrations,
}

impl<'m> IdentifierNormalizer<'m> {
    pub fn new(migrations: &'m dyn IdentifierMigrations) -> Self {
        Self { migrations }
    }

    /// Normalise a primary gene row.
    ///
    /// A null raw id falls back to the symbol, used verbatim as the gene's
    /// identifier, and marks the gene degraded. `Ok(None)` means the row was
    /// dropped and a diagnostic recorded; `Err` means the species is
    /// unsupported.
    pub fn normalize_gene(&self, row: &GeneInfoRow, diagnostics: &mut Diagnostics) -> Result<Option<GeneRecord>> {
        let rule = rule_for(row.species)?;

        let (canonical_id, degraded) = match (&row.species_specific_id, &row.symbol) {
            (Some(id), _) => {
                let raw = migrate(self.migrations, id);
                let Some(canonical_id) = canonical_identifier(&raw, rule) else {
                    debug!(species = row.species, raw = %raw, "Identifier failed species signature");
                    diagnostics.record(Diagnostic::IdentifierUnresolved {
                        species: row.species,
                        gene_key: Some(row.gene_key),
                        raw_id: Some(raw),
                    });
                    return Ok(None);
                };
                (canonical_id, false)
            }
            (None, Some(symbol)) => {
                diagnostics.record(Diagnostic::DegradedIdentifier {
                    species: row.species,
                    gene_key: row.gene_key,
                    symbol: symbol.clone(),
                });
                (symbol.clone(), true)
            }
            (None, None) => {
                diagnostics.record(Diagnostic::IdentifierUnresolved {
                    species: row.species,
                    gene_key: Some(row.gene_key),
                    raw_id: None,
                });
                return Ok(None);
            }
        };

        Ok(Some(GeneRecord {
            internal_key: row.gene_key,
            species: row.species,
            canonical_id,
            symbol: row.symbol.clone(),
            provider: Some(resolve_provider(row.id_type.as_deref(), row.species)?),
            degraded,
        }))
    }

    /// Normalise a gene named only by an external feed. The returned record
    /// carries a placeholder key; the registry assigns the real one.
    pub fn normalize_external(
        &self,
        raw: &str,
        species: TaxonId,
        provider_hint: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<GeneRecord>> {
        let rule = rule_for(species)?;
        let raw = migrate(self.migrations, raw);
        let Some(canonical_id) = canonical_identifier(&raw, rule) else {
            diagnostics.record(Diagnostic::IdentifierUnresolved {
                species,
                gene_key: None,
                raw_id: Some(raw),
            });
            return Ok(None);
        };
        Ok(Some(GeneRecord {
            internal_key: GeneKey(0),
            species,
            canonical_id,
            symbol: None,
            provider: Some(resolve_provider(Some(provider_hint), species)?),
            degraded: false,
        }))
    }
}
