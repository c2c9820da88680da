use assert_cmd::Command;
use charlog_cli::commands::input::load_entries;
use charlog_cli::commands::show::entry_detail;
use charlog_core::normalize::Normalizer;
use predicates::prelude::*;
use serde_json::json;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn charlog() -> Command {
    #[allow(deprecated)]
    Command::new(assert_cmd::cargo::cargo_bin("charlog"))
}

#[test]
fn test_detail_decodes_to_configured_depth() {
    let entries = load_entries(&fixture("detailed.json")).unwrap();

    let full = entry_detail(&entries, 0, &Normalizer::new(3)).unwrap();
    assert_eq!(
        full.entry["response_body"],
        json!({"user": {"id": 1, "name": "Ada"}})
    );

    // One level decodes nothing inside the entry object
    let shallow = entry_detail(&entries, 0, &Normalizer::new(1)).unwrap();
    assert!(shallow.entry["response_body"].is_string());

    let none = entry_detail(&entries, 0, &Normalizer::new(0)).unwrap();
    assert_eq!(&none.entry, entries[0].as_value());
}

#[test]
fn test_detail_renders_array_bodies() {
    let entries = load_entries(&fixture("detailed.json")).unwrap();
    let detail = entry_detail(&entries, 3, &Normalizer::default()).unwrap();
    assert_eq!(detail.response_body, "[\n  1,\n  2,\n  3\n]");
}

#[test]
fn test_show_cli_prints_placeholder_for_missing_body() {
    charlog()
        .arg("show")
        .arg(fixture("detailed.json"))
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("No request body data available."))
        .stdout(predicate::str::contains("\"name\": \"Ada\""));
}

#[test]
fn test_show_cli_depth_flag() {
    charlog()
        .args(["--depth", "0", "-f", "json", "show"])
        .arg(fixture("detailed.json"))
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"request_body\": \"{\\\"query\\\": \\\"widgets\\\"}\""));
}

#[test]
fn test_show_cli_rejects_excessive_depth() {
    charlog()
        .args(["--depth", "1000", "show"])
        .arg(fixture("detailed.json"))
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("depth must be at most"));
}

#[test]
fn test_show_cli_index_out_of_range() {
    charlog()
        .arg("show")
        .arg(fixture("detailed.json"))
        .arg("99")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry not found"));
}
