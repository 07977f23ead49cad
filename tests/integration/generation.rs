//! Integration tests for catalog expansion and the profile store.

use std::collections::HashSet;

use testkit::catalog::{CatalogDb, load_catalog, validate_catalog};
use testkit::error::TkError;
use testkit::profile::{Browser, Profile, ProfileGenerator, expected_profile_count};
use testkit::store::{ProfileStore, read_profile};

use crate::common::fixtures::{
    FIXTURE_DELL_COUNT, FIXTURE_HP_COUNT, FIXTURE_LENOVO_COUNT, FIXTURE_PROFILE_COUNT, Workspace,
};
use crate::common::init_test_logging;

fn all_profiles(store: &ProfileStore) -> Vec<Profile> {
    store
        .scan()
        .map(|entry| store.read(&entry.path).unwrap())
        .collect()
}

#[test]
fn test_fixture_expected_counts() {
    let ws = Workspace::new();
    let devices = load_catalog(&ws.catalog()).unwrap();
    let counts: Vec<usize> = devices.iter().map(expected_profile_count).collect();
    assert_eq!(counts, vec![FIXTURE_LENOVO_COUNT, FIXTURE_DELL_COUNT, FIXTURE_HP_COUNT]);
    assert_eq!(counts.iter().sum::<usize>(), FIXTURE_PROFILE_COUNT);
}

#[test]
fn test_generate_populates_store() {
    init_test_logging();
    let ws = Workspace::new();
    let devices = load_catalog(&ws.catalog()).unwrap();
    let store = ws.store();

    let summary = ProfileGenerator::new(&store).run(&devices).unwrap();

    assert_eq!(summary.devices, 3);
    assert_eq!(summary.profiles, FIXTURE_PROFILE_COUNT);
    assert_eq!(summary.created, FIXTURE_PROFILE_COUNT);
    assert_eq!(summary.by_bucket.get("xp"), Some(&16));
    assert_eq!(summary.by_bucket.get("win7"), Some(&16));
    assert_eq!(summary.by_bucket.get("win8"), Some(&6));
    assert_eq!(summary.by_bucket.get("win10"), Some(&12));
    assert_eq!(store.scan().count(), FIXTURE_PROFILE_COUNT);
}

#[test]
fn test_ids_are_unique_and_ordinal_spans_os() {
    let ws = Workspace::generated();
    let profiles = all_profiles(&ws.store());

    let ids: HashSet<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids.len(), FIXTURE_PROFILE_COUNT);

    // Ordinals keep counting across OS values within one device.
    assert!(ids.contains("dell-latitude-d630-windows-xp-v1"));
    assert!(ids.contains("dell-latitude-d630-windows-xp-v16"));
    assert!(ids.contains("dell-latitude-d630-windows-7-v17"));
    assert!(ids.contains("dell-latitude-d630-windows-7-v32"));
    assert!(!ids.contains("dell-latitude-d630-windows-7-v1"));

    // Periods are dropped from the OS part.
    assert!(ids.contains("hp-zbook-15-windows-81-v1"));
    assert!(ids.contains("hp-zbook-15-windows-10-v7"));
}

#[test]
fn test_profiles_land_in_os_bucket() {
    let ws = Workspace::generated();

    let xp = read_profile(&ws.profile_path("xp", "dell-latitude-d630-windows-xp-v1")).unwrap();
    assert_eq!(xp.metadata.os_target, "Windows XP");
    assert_eq!(xp.hardware.ram_mb, 1024);

    let win8 = read_profile(&ws.profile_path("win8", "hp-zbook-15-windows-81-v1")).unwrap();
    assert_eq!(win8.metadata.os_target, "Windows 8.1");
    assert_eq!(win8.hardware.gpu_vram_mb, 2048);
}

#[test]
fn test_legacy_browser_only_for_legacy_devices() {
    let ws = Workspace::generated();
    let profiles = all_profiles(&ws.store());

    let ie_makes: HashSet<&str> = profiles
        .iter()
        .filter(|p| p.software.primary_browser == Browser::InternetExplorer)
        .map(|p| p.metadata.make.as_str())
        .collect();
    assert_eq!(ie_makes, HashSet::from(["Dell"]));

    // The Windows 7 half of a legacy device keeps the legacy browser too.
    assert!(profiles.iter().any(|p| p.metadata.os_target == "Windows 7"
        && p.software.primary_browser == Browser::InternetExplorer));
}

#[test]
fn test_regenerate_is_byte_stable() {
    let ws = Workspace::generated();
    let path = ws.profile_path("win10", "lenovo-t480-windows-10-v1");
    let before = std::fs::read(&path).unwrap();

    let devices = load_catalog(&ws.catalog()).unwrap();
    let summary = ProfileGenerator::new(&ws.store()).run(&devices).unwrap();

    assert_eq!(summary.unchanged, FIXTURE_PROFILE_COUNT);
    assert_eq!(summary.created, 0);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn test_regenerate_keeps_stale_profiles() {
    let ws = Workspace::generated();
    let stale = ws.write_profile("win10", "retired-device-v1.json", &serde_json::json!({ "id": "retired-device-v1" }));

    let devices = load_catalog(&ws.catalog()).unwrap();
    ProfileGenerator::new(&ws.store()).run(&devices).unwrap();

    assert!(stale.exists());
    assert_eq!(ws.store().scan().count(), FIXTURE_PROFILE_COUNT + 1);
}

#[test]
fn test_progress_callback_sees_every_profile() {
    let ws = Workspace::new();
    let devices = load_catalog(&ws.catalog()).unwrap();
    let mut seen = 0;
    ProfileGenerator::new(&ws.store())
        .run_with_progress(&devices, |_| seen += 1)
        .unwrap();
    assert_eq!(seen, FIXTURE_PROFILE_COUNT);
}

#[test]
fn test_missing_catalog() {
    let ws = Workspace::new();
    let err = load_catalog(&ws.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, TkError::CatalogNotFound { .. }));
    assert!(err.is_user_recoverable());
}

#[test]
fn test_malformed_catalog_aborts_generation() {
    let ws = Workspace::new();
    let path = ws.write_file("broken.json", r#"[{ "make": "Acme" }]"#);
    let err = load_catalog(&path).unwrap_err();
    assert!(matches!(err, TkError::CatalogParse(_)));
    assert!(!ws.profiles_dir().exists());
}

#[test]
fn test_validate_fixture_catalog() {
    let ws = Workspace::new();
    let contents = std::fs::read_to_string(ws.catalog()).unwrap();
    let report = validate_catalog(&contents).unwrap();

    assert!(report.valid);
    assert_eq!(report.device_count, 3);
    assert_eq!(report.total_profiles, FIXTURE_PROFILE_COUNT);
    assert_eq!(report.error_count(), 0);
}

#[test]
fn test_migrate_round_trips_catalog() {
    let ws = Workspace::new();
    let devices = load_catalog(&ws.catalog()).unwrap();
    let db_path = ws.path().join("db").join("hardware.db");

    let mut db = CatalogDb::open(&db_path).unwrap();
    let summary = db.migrate(&devices).unwrap();
    assert_eq!(summary.devices, 3);
    assert!(db_path.exists());

    let loaded = CatalogDb::open(&db_path).unwrap().load_devices().unwrap();
    let makes: Vec<&str> = loaded.iter().map(|d| d.make.as_str()).collect();
    assert_eq!(makes, vec!["Lenovo", "Dell", "HP"]);
    assert_eq!(loaded[1].ram_options, vec![1024, 2048]);
}
