//! End-to-end orthology runs over in-memory inputs.

mod support;

use ortholink_common::{
    BestScore, DataSource, DiagnosticKind, Diagnostics, ExternalFeedConfig, OrthoError, PipelineConfig,
    RelationshipKind, RelationshipRecord,
};
use ortholink_ingestion::normalise::NoMigrations;
use ortholink_ingestion::sources::parse_feed;
use ortholink_ingestion::{run_orthology, run_with_diagnostics, ExternalFeed, PrimaryExtract, RunInputs};
use ortholink_test_utils::{external_entry, external_feed_json, methods};
use pretty_assertions::assert_eq;

use support::{best, gene_row, pair, pairs};

/// g1 (fly) -> g2 (human) called by Panther, plus enough other rows to give
/// (7227, 9606) the methods PANTHER, OMA and InParanoid and to put HGNC in
/// the global set only.
fn extract() -> PrimaryExtract {
    let mut rows = vec![pair(1, 7227, 1, 9606, 2, "Panther")];
    rows.extend(pairs(10, 7227, 3, 9606, 4, &["OMA", "Inparanoid"]));
    rows.push(pair(20, 10090, 5, 9606, 2, "HGNC"));
    PrimaryExtract {
        genes: vec![
            gene_row(1, 7227, "FBgn0000001"),
            gene_row(2, 9606, "1100"),
            gene_row(3, 7227, "FBgn0000002"),
            gene_row(4, 9606, "1101"),
            gene_row(5, 10090, "98297"),
        ],
        pairs: rows,
        best_scores: vec![best(1, 2, 7227, 9606, Some(BestScore::Yes), Some(BestScore::No), Some(0.9))],
        alignments: Vec::new(),
    }
}

fn inputs<'a>(extract: &'a PrimaryExtract, feeds: &'a [ExternalFeed]) -> RunInputs<'a> {
    RunInputs { extract, feeds, overrides: None, migrations: &NoMigrations }
}

fn find<'a>(records: &'a [RelationshipRecord], gene1: &str, gene2: &str) -> &'a RelationshipRecord {
    records
        .iter()
        .find(|r| r.gene1_id == gene1 && r.gene2_id == gene2)
        .unwrap_or_else(|| panic!("no record {gene1} -> {gene2}"))
}

#[test]
fn test_single_method_primary_relationship() {
    let extract = extract();
    let out = run_orthology(inputs(&extract, &[]), &PipelineConfig::default()).unwrap();

    let r = find(&out.records, "DRSC:FBgn0000001", "DRSC:HGNC:1100");
    assert_eq!(r.matched_methods, methods(&["PANTHER"]));
    assert_eq!(r.not_matched_methods, methods(&["OMA", "InParanoid"]));
    assert_eq!(r.not_called_methods, methods(&["HGNC"]));
    assert_eq!(r.best_score, Some(BestScore::Yes));
    assert_eq!(r.best_score_rev, Some(BestScore::No));
    assert_eq!(r.confidence, Some(0.9));
    assert!(!r.strict_filter);
    assert!(!r.moderate_filter);
    assert_eq!(r.data_source, DataSource::Primary);
}

#[test]
fn test_method_sets_partition_the_universe() {
    let extract = extract();
    let feeds = vec![ExternalFeed {
        name: "xb".into(),
        entries: vec![external_entry("Xenbase:XB-GENE-1", "HGNC:1100", 8364, 9606, &["Xenbase", "sonicParanoid"])],
    }];
    let out = run_orthology(inputs(&extract, &feeds), &PipelineConfig::default()).unwrap();

    let global = methods(&["PANTHER", "OMA", "InParanoid", "HGNC", "Xenbase", "SonicParanoid"]);
    for r in &out.records {
        assert!(r.matched_methods.is_disjoint(&r.not_matched_methods));
        assert!(r.matched_methods.is_disjoint(&r.not_called_methods));
        assert!(r.not_matched_methods.is_disjoint(&r.not_called_methods));
        let union: ortholink_common::MethodSet = r
            .matched_methods
            .iter()
            .chain(&r.not_matched_methods)
            .chain(&r.not_called_methods)
            .cloned()
            .collect();
        assert_eq!(union, global);
    }
}

#[test]
fn test_repeated_primary_rows_are_a_set_union() {
    let mut extract = extract();
    extract.pairs.push(pair(30, 7227, 1, 9606, 2, "Panther"));
    extract.pairs.push(pair(31, 7227, 1, 9606, 2, "PANTHER"));
    let out = run_orthology(inputs(&extract, &[]), &PipelineConfig::default()).unwrap();

    let r = find(&out.records, "DRSC:FBgn0000001", "DRSC:HGNC:1100");
    assert_eq!(r.matched_methods, methods(&["PANTHER"]));
    assert_eq!(out.stats.primary.extended, 3);
}

#[test]
fn test_primary_record_survives_external_collision() {
    let extract = extract();
    let feeds = vec![ExternalFeed {
        name: "xb".into(),
        entries: vec![external_entry("FBgn0000001", "HGNC:1100", 7227, 9606, &["Xenbase", "OMA", "PANTHER"])],
    }];
    let out = run_orthology(inputs(&extract, &feeds), &PipelineConfig::default()).unwrap();

    let r = find(&out.records, "DRSC:FBgn0000001", "DRSC:HGNC:1100");
    assert_eq!(r.data_source, DataSource::Primary);
    assert_eq!(r.matched_methods, methods(&["PANTHER"]));
    assert_eq!(r.best_score, Some(BestScore::Yes));
    assert_eq!(r.confidence, Some(0.9));
    assert_eq!(out.diagnostics.count(DiagnosticKind::CrossSourceConflict), 1);
    assert_eq!(out.stats.external.dropped, 1);
}

#[test]
fn test_external_only_relationship_is_added() {
    let extract = extract();
    let mut entry = external_entry("Xenbase:XB-GENE-494002", "HGNC:1100", 8364, 9606, &["Xenbase", "PANTHER"]);
    entry.is_best_score = Some(BestScore::Yes);
    let feeds = vec![ExternalFeed { name: "xb".into(), entries: vec![entry.clone(), entry] }];
    let out = run_orthology(inputs(&extract, &feeds), &PipelineConfig::default()).unwrap();

    let r = find(&out.records, "DRSC:Xenbase:XB-GENE-494002", "DRSC:HGNC:1100");
    assert_eq!(r.data_source, DataSource::External);
    assert_eq!(r.best_score, Some(BestScore::Yes));
    // Human gene reused from the primary extract.
    assert_eq!(r.gene2_key.0, 2);
    assert!(r.gene1_key.0 > 5);
    assert!(r.strict_filter && r.moderate_filter);
    assert_eq!(out.diagnostics.count(DiagnosticKind::DuplicateExternalObservation), 1);
}

#[test]
fn test_strict_filter_always_has_a_reason() {
    let mut extract = extract();
    extract.pairs.extend(pairs(40, 7227, 3, 9606, 2, &["OMA", "Panther", "Inparanoid"]));
    extract.best_scores.push(best(3, 2, 7227, 9606, None, Some(BestScore::Yes), None));
    let config = PipelineConfig::default();
    let out = run_orthology(inputs(&extract, &[]), &config).unwrap();

    assert!(out.records.iter().any(|r| r.strict_filter));
    for r in out.records.iter().filter(|r| r.strict_filter) {
        let trusted = config.high_trust_methods.iter().any(|m| r.matched_methods.contains(m));
        let n = r.matched_methods.len();
        let fwd = BestScore::is_affirmative(r.best_score);
        let rev = r.best_score_rev == Some(BestScore::Yes);
        assert!(trusted || (n > 2 && (fwd || rev)) || (n == 2 && fwd && rev));
    }
}

#[test]
fn test_unknown_gene_key_is_dropped() {
    let mut extract = extract();
    extract.pairs.push(pair(50, 7227, 1, 9606, 99, "OMA"));
    let out = run_orthology(inputs(&extract, &[]), &PipelineConfig::default()).unwrap();
    assert_eq!(out.diagnostics.count(DiagnosticKind::FailedGeneLookup), 1);
    assert_eq!(out.stats.primary.dropped, 1);
}

#[test]
fn test_unsupported_species_aborts() {
    let mut extract = extract();
    extract.genes.push(gene_row(6, 3702, "AT1G01010"));
    let err = run_orthology(inputs(&extract, &[]), &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, OrthoError::UnsupportedSpecies { taxon: 3702 }));
}

#[test]
fn test_rejected_identifier_drops_its_evidence() {
    let mut extract = extract();
    // Fly row carrying a human id.
    extract.genes.push(gene_row(7, 7227, "HGNC:9999"));
    extract.pairs.push(pair(60, 7227, 7, 9606, 2, "OMA"));
    let out = run_orthology(inputs(&extract, &[]), &PipelineConfig::default()).unwrap();
    assert_eq!(out.diagnostics.count(DiagnosticKind::IdentifierUnresolved), 1);
    assert_eq!(out.diagnostics.count(DiagnosticKind::FailedGeneLookup), 1);
}

#[test]
fn test_reciprocity_reported_for_configured_pair() {
    let extract = extract();
    let feeds = vec![ExternalFeed {
        name: "xb".into(),
        entries: vec![external_entry("Xenbase:XB-GENE-1", "HGNC:1100", 8364, 9606, &["Xenbase"])],
    }];
    let config = PipelineConfig { reciprocity: Some((8364, 9606)), ..Default::default() };
    let out = run_orthology(inputs(&extract, &feeds), &config).unwrap();
    assert_eq!(out.stats.unidirectional, 1);
    assert_eq!(out.diagnostics.count(DiagnosticKind::UnidirectionalRelationship), 1);
}

#[test]
fn test_symbol_only_gene_keeps_its_evidence() {
    let mut extract = extract();
    extract.genes[0].species_specific_id = None;
    extract.genes[0].symbol = Some("dpp".to_string());
    let out = run_orthology(inputs(&extract, &[]), &PipelineConfig::default()).unwrap();

    let r = find(&out.records, "dpp", "DRSC:HGNC:1100");
    assert_eq!(r.matched_methods, methods(&["PANTHER"]));
    assert_eq!(r.best_score, Some(BestScore::Yes));
    assert_eq!(out.diagnostics.count(DiagnosticKind::DegradedIdentifier), 1);
    assert_eq!(out.diagnostics.count(DiagnosticKind::IdentifierUnresolved), 0);
}

#[test]
fn test_feed_load_diagnostics_reach_the_run_summary() {
    let extract = extract();
    let json = external_feed_json(&[
        external_entry("Xenbase:XB-GENE-1", "HGNC:1100", 8364, 9606, &["Xenbase"]),
        external_entry("Xenbase:XB-GENE-1", "HGNC:1100", 8364, 9606, &["Xenbase"]),
        external_entry("-", "HGNC:1101", 8364, 9606, &["Xenbase"]),
    ]);
    let mut loaded = Diagnostics::new();
    let feed = parse_feed("xb", &json, &ExternalFeedConfig::default(), &mut loaded).unwrap();
    let feeds = vec![feed];

    let out = run_with_diagnostics(
        RelationshipKind::Orthology,
        inputs(&extract, &feeds),
        &PipelineConfig::default(),
        loaded,
    )
    .unwrap();

    assert_eq!(out.diagnostics.count(DiagnosticKind::MalformedExternalRecord), 1);
    assert_eq!(out.diagnostics.count(DiagnosticKind::DuplicateExternalObservation), 1);
    assert_eq!(out.diagnostics.total(), 2);
}
