//! ortholink — Orthology and paralogy reconciliation.
//! Entry point for the command-line binary.

mod config;
mod export;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ortholink_common::{Diagnostics, ExternalFeedConfig, RelationshipKind};
use ortholink_ingestion::normalise::{CachedMigrations, IdentifierMigrations, MigrationTable, NoMigrations};
use ortholink_ingestion::sources::{load_feed, load_override_list, load_primary_extract};
use ortholink_ingestion::{run_with_diagnostics, ExternalFeed, RunInputs};
use ortholink_kg::OverrideList;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "ortholink")]
#[command(about = "Reconcile orthology and paralogy predictions into export documents")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration
    #[arg(short, long, env = "ORTHOLINK_CONFIG", default_value = "ortholink.toml")]
    config: PathBuf,

    /// Debug-level logging unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Cross-species relationships with the historical adjustment
    Orthology,
    /// Same-species candidates, pruned and ranked
    Paralogy,
    /// Parse and validate the configuration, then exit
    CheckConfig,
}

impl Command {
    fn kind(self) -> Option<RelationshipKind> {
        match self {
            Command::Orthology => Some(RelationshipKind::Orthology),
            Command::Paralogy => Some(RelationshipKind::Paralogy),
            Command::CheckConfig => None,
        }
    }
}

async fn load_migrations(path: Option<&Path>, cache: usize) -> Result<Box<dyn IdentifierMigrations>> {
    match path {
        Some(path) => {
            let table = MigrationTable::load(path).await?;
            info!(entries = table.len(), "Identifier migrations loaded");
            Ok(Box::new(CachedMigrations::new(table, cache)))
        }
        None => Ok(Box::new(NoMigrations)),
    }
}

async fn load_feeds(paths: &[PathBuf], config: &ExternalFeedConfig, diagnostics: &mut Diagnostics) -> Result<Vec<ExternalFeed>> {
    let mut feeds = Vec::with_capacity(paths.len());
    for path in paths {
        let mut feed_diagnostics = Diagnostics::new();
        let feed = load_feed(path, config, &mut feed_diagnostics).await?;
        if !feed_diagnostics.is_empty() {
            warn!(feed = %feed.name, diagnostics = feed_diagnostics.total(), "Feed entries rejected on load");
        }
        diagnostics.extend(feed_diagnostics);
        feeds.push(feed);
    }
    Ok(feeds)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let config = Config::load(&args.config)?;
    let Some(kind) = args.command.kind() else {
        info!(config = %args.config.display(), "Configuration OK");
        return Ok(());
    };

    let run_id = Uuid::new_v4();
    info!(%run_id, ?kind, "ortholink run starting");

    let paths = match kind {
        RelationshipKind::Orthology => config.inputs.orthology.as_ref(),
        RelationshipKind::Paralogy => config.inputs.paralogy.as_ref(),
    }
    .with_context(|| format!("No [inputs.{}] section in {}", export::kind_name(kind), args.config.display()))?;

    let extract = load_primary_extract(paths).await?;
    let mut load_diagnostics = Diagnostics::new();
    let feeds = load_feeds(&config.inputs.feeds, &config.pipeline.external, &mut load_diagnostics).await?;
    let overrides: Option<OverrideList> = match (&config.inputs.overrides, kind) {
        (Some(path), RelationshipKind::Orthology) => Some(load_override_list(path).await?),
        (Some(_), RelationshipKind::Paralogy) => {
            warn!("Second-best overrides only apply to orthology; ignoring");
            None
        }
        (None, _) => None,
    };
    let migrations = load_migrations(config.inputs.migrations.as_deref(), config.inputs.migration_cache).await?;

    let pipeline = config.pipeline.clone();
    let output = tokio::task::spawn_blocking(move || {
        let inputs = RunInputs {
            extract: &extract,
            feeds: &feeds,
            overrides: overrides.as_ref(),
            migrations: migrations.as_ref(),
        };
        run_with_diagnostics(kind, inputs, &pipeline, load_diagnostics)
    })
    .await
    .context("Pipeline task panicked")??;

    info!(
        %run_id,
        records = output.records.len(),
        diagnostics = output.diagnostics.total(),
        stats = ?output.stats,
        "Pipeline finished"
    );

    let date_produced = chrono::Local::now().to_rfc3339();
    let written = export::write_exports(kind, &output.records, &config.export, date_produced).await?;
    info!(%run_id, files = written.len(), dir = %config.export.output_dir.display(), "Export complete");

    Ok(())
}
