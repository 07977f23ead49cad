//! Integration tests for search and filtering over a generated store.

use serde_json::json;

use testkit::query::{ProfileFilter, filter, search};

use crate::common::fixtures::{
    FIXTURE_DELL_COUNT, FIXTURE_HP_COUNT, FIXTURE_LENOVO_COUNT, FIXTURE_PROFILE_COUNT, Workspace,
};

#[test]
fn test_search_by_make_is_case_insensitive() {
    let ws = Workspace::generated();
    let upper = search(ws.store().scan(), "DELL", None);
    let lower = search(ws.store().scan(), "dell", None);

    assert_eq!(upper.scanned, FIXTURE_PROFILE_COUNT);
    assert_eq!(upper.matches.len(), FIXTURE_DELL_COUNT);
    assert_eq!(upper.matches, lower.matches);
}

#[test]
fn test_search_matches_os_text() {
    let ws = Workspace::generated();
    // Lenovo's Windows 10 profiles plus HP's Windows 10 half.
    let report = search(ws.store().scan(), "windows 10", None);
    assert_eq!(report.matches.len(), FIXTURE_LENOVO_COUNT + FIXTURE_HP_COUNT / 2);
}

#[test]
fn test_search_matches_file_name() {
    let ws = Workspace::generated();
    let report = search(ws.store().scan(), "windows-81-v3", None);
    assert_eq!(report.matches.len(), 1);
    assert!(report.matches[0].ends_with("win8/hp-zbook-15-windows-81-v3.json"));
}

#[test]
fn test_search_no_hits() {
    let ws = Workspace::generated();
    let report = search(ws.store().scan(), "commodore", None);
    assert_eq!(report.scanned, FIXTURE_PROFILE_COUNT);
    assert!(report.matches.is_empty());
}

#[test]
fn test_field_search_has_no_metadata_fallback() {
    let ws = Workspace::generated();
    ws.write_profile("other", "legacy-1.json", &json!({ "id": "legacy-1", "make": "Dell", "os": "Windows 2000" }));

    // Generated profiles keep make under metadata, so only the flat record matches.
    let report = search(ws.store().scan(), "dell", Some("make"));
    assert_eq!(report.matches.len(), 1);
    assert!(report.matches[0].ends_with("legacy-1.json"));

    // Free-text search sees both shapes.
    let report = search(ws.store().scan(), "dell", None);
    assert_eq!(report.matches.len(), FIXTURE_DELL_COUNT + 1);
}

#[test]
fn test_search_skips_unreadable_files() {
    let ws = Workspace::generated();
    ws.write_file("profiles/win10/garbage.json", "{ not json");

    let report = search(ws.store().scan(), "lenovo", None);
    assert_eq!(report.scanned, FIXTURE_PROFILE_COUNT + 1);
    assert_eq!(report.matches.len(), FIXTURE_LENOVO_COUNT);
}

#[test]
fn test_search_results_are_scan_ordered() {
    let ws = Workspace::generated();
    let first = search(ws.store().scan(), "hp", None);
    let second = search(ws.store().scan(), "hp", None);
    assert_eq!(first.matches, second.matches);
    // "win10" sorts before "win8".
    assert!(first.matches[0].to_string_lossy().contains("win10"));
}

#[test]
fn test_filter_by_make_and_os() {
    let ws = Workspace::generated();
    let docs = filter(ws.store().scan(), Some("dell"), Some("windows 7"));
    assert_eq!(docs.len(), FIXTURE_DELL_COUNT / 2);
    assert!(docs.iter().all(|d| d.id().unwrap().starts_with("dell-latitude-d630-windows-7-")));
}

#[test]
fn test_filter_blank_is_inactive() {
    let ws = Workspace::generated();
    let docs = ProfileFilter::new(Some(""), None).apply(ws.store().scan());
    assert_eq!(docs.len(), FIXTURE_PROFILE_COUNT);
}

#[test]
fn test_filter_uses_flat_fallback() {
    let ws = Workspace::generated();
    ws.write_profile("other", "legacy-2.json", &json!({ "id": "legacy-2", "make": "Dell", "os": "Windows 7" }));

    let docs = filter(ws.store().scan(), Some("DELL"), Some("windows 7"));
    assert_eq!(docs.len(), FIXTURE_DELL_COUNT / 2 + 1);
}
