//! Identifier normalisation.

pub mod identifier;
pub mod migration;

pub use identifier::{canonical_identifier, resolve_provider, IdentifierNormalizer};
pub use migration::{CachedMigrations, IdentifierMigrations, MigrationTable, NoMigrations};
