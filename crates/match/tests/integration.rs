use std::path::PathBuf;

use entlink_match::config::MatchConfig;
use entlink_match::engine::run;
use entlink_match::model::{JoinKind, MatchInput, MatchReport};
use entlink_match::output::merge_masterlist;
use entlink_match::source::{masterlist_records, registry_records};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn load_and_run() -> (MatchConfig, String, MatchReport) {
    let config = MatchConfig::from_toml(&read_fixture("alumni.match.toml")).unwrap();
    let master_csv = read_fixture("masterlist.csv");
    let registry_csv = read_fixture("registry.csv");

    let input = MatchInput {
        masterlist: masterlist_records(&master_csv, &config).unwrap(),
        registry: registry_records(&registry_csv, &config).unwrap(),
    };
    let report = run(&config, &input).unwrap();
    (config, master_csv, report)
}

// -------------------------------------------------------------------------
// End-to-end scenarios
// -------------------------------------------------------------------------

#[test]
fn similar_records_match_and_backfill() {
    let (config, master_csv, report) = load_and_run();

    let acme = report.match_for("Acme Robotics, Inc.").expect("Acme matched");
    assert_eq!(acme.registry_name, "Acme Robotics LLC");
    assert_eq!(acme.registry_key.as_deref(), Some("UEI001"));
    // Both names normalize to "acme robotics"
    assert_eq!(acme.component_scores.name, 100.0);
    // acme.com vs http://acme.com compare as the same site
    assert!(acme.component_scores.website >= 90.0);
    assert!(acme.component_scores.contact >= 75.0);
    assert!(acme.overall_score >= 80.0);
    let contacts = acme.matched_contacts.as_ref().unwrap();
    assert_eq!(contacts.masterlist, "Jane Doe");
    assert_eq!(contacts.registry, "Jane A Doe");

    // Registry address carried through for follow-up
    let address = acme.registry_address.as_ref().unwrap();
    assert_eq!(address.city.as_deref(), Some("College Park"));
    assert_eq!(address.zip.as_deref(), Some("20740"));

    let merged = merge_masterlist(&master_csv, &report, &config).unwrap();
    assert!(merged.contains("\"Acme Robotics, Inc.\",Jane,Doe,acme.com,UEI001"));
}

#[test]
fn dissimilar_records_produce_no_match() {
    let (config, master_csv, report) = load_and_run();

    assert!(report.match_for("Zenith Foods").is_none());
    assert!(report.summary.unmatched >= 1);

    // The unresolved row flows through untouched
    let merged = merge_masterlist(&master_csv, &report, &config).unwrap();
    assert!(merged.contains("Zenith Foods,Ana,Lima,zenithfoods.example,"));
    assert!(!merged.contains("UEI002"));
}

#[test]
fn best_of_several_candidates_is_selected() {
    let (_, _, report) = load_and_run();

    let harbor = report.match_for("Blue Harbor Analytics").expect("matched");
    assert_eq!(harbor.registry_key.as_deref(), Some("UEI003"));
    assert_eq!(harbor.registry_name, "Blue Harbor Analytics LLC");
}

#[test]
fn identifier_join_wins_over_keyword_mismatch() {
    let (_, _, report) = load_and_run();

    // The registry row was scraped under a different search term, but the
    // identifier agrees with the master list.
    let quantum = report.match_for("Quantum Leap Staffing").expect("matched");
    assert_eq!(quantum.join, JoinKind::Identifier);
    assert_eq!(quantum.registry_key.as_deref(), Some("UEI005"));
    assert_eq!(report.summary.identifier_joins, 1);
}

#[test]
fn summary_accounts_for_every_entity() {
    let (_, _, report) = load_and_run();
    let s = &report.summary;
    assert_eq!(s.masterlist_entities, 4);
    assert_eq!(s.matched + s.unmatched, s.masterlist_entities);
    assert_eq!(s.matched, 3);
    assert_eq!(s.identifier_joins + s.keyword_joins, s.matched);
}

#[test]
fn one_output_row_per_input_row() {
    let (config, master_csv, report) = load_and_run();
    let merged = merge_masterlist(&master_csv, &report, &config).unwrap();
    assert_eq!(merged.lines().count(), master_csv.lines().count());
}

#[test]
fn report_serializes_to_json() {
    let (_, _, report) = load_and_run();
    let json = serde_json::to_string_pretty(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["matched"], 3);
    assert_eq!(value["meta"]["config_name"], "Alumni registry backfill");
    assert!(value["matches"][0]["component_scores"]["name"].is_number());
}
