//! Integration tests for rendering and exporting profiles.

use serde_json::json;

use testkit::batch::{BatchExport, OutputLayout};
use testkit::error::TkError;
use testkit::export::{ExportFormat, LAUNCH_PS1, LAUNCH_SH, export_file, export_profile, render_profile};
use testkit::query::ProfileFilter;
use testkit::store::ProfileDoc;

use crate::common::assertions::{assert_contains_all, assert_file_contains, assert_no_placeholders};
use crate::common::fixtures::{FIXTURE_HP_COUNT, Workspace, list_files};

const HP_ID: &str = "hp-zbook-15-windows-10-v7";

fn hp_doc(ws: &Workspace) -> ProfileDoc {
    ProfileDoc::load(&ws.profile_path("win10", HP_ID)).unwrap()
}

#[test]
fn test_every_format_substitutes_every_field() {
    let ws = Workspace::generated();
    let doc = hp_doc(&ws);

    for format in ExportFormat::ALL {
        let (fields, rendered) = render_profile(&doc, format).unwrap();
        assert_eq!(fields.id, HP_ID);
        assert_no_placeholders(&rendered.content);
        assert!(
            rendered.content.contains(HP_ID) || rendered.content.contains(&fields.ident()),
            "{format} artifact is missing the id"
        );
        assert_contains_all(&rendered.content, &["16384", "2048"]);
    }
}

#[test]
fn test_wsb_vgpu_follows_vram() {
    let ws = Workspace::generated();

    let (_, with_gpu) = render_profile(&hp_doc(&ws), ExportFormat::Wsb).unwrap();
    assert!(with_gpu.content.contains("<VGpu>Enable</VGpu>"));

    let lenovo = ProfileDoc::load(&ws.profile_path("win10", "lenovo-t480-windows-10-v1")).unwrap();
    let (_, without) = render_profile(&lenovo, ExportFormat::Wsb).unwrap();
    assert!(without.content.contains("<VGpu>Disable</VGpu>"));
    assert!(without.content.contains("<MemoryInMB>8192</MemoryInMB>"));
}

#[test]
fn test_terraform_instance_tier_from_ram() {
    let ws = Workspace::generated();
    let (_, rendered) = render_profile(&hp_doc(&ws), ExportFormat::Terraform).unwrap();
    assert!(rendered.content.contains("t2.xlarge"));

    let xp = ProfileDoc::load(&ws.profile_path("xp", "dell-latitude-d630-windows-xp-v1")).unwrap();
    let (_, rendered) = render_profile(&xp, ExportFormat::Terraform).unwrap();
    assert!(rendered.content.contains("t2.micro"));
}

#[test]
fn test_vmware_guest_os_from_target() {
    let ws = Workspace::generated();
    let xp = ProfileDoc::load(&ws.profile_path("xp", "dell-latitude-d630-windows-xp-v1")).unwrap();
    let (_, rendered) = render_profile(&xp, ExportFormat::Vmware).unwrap();
    assert!(rendered.content.contains("guestOS = \"winxppro\""));
}

#[test]
fn test_legacy_flat_profile_exports() {
    let ws = Workspace::new();
    let path = ws.write_profile(
        "other",
        "old-box.json",
        &json!({ "id": "old-box", "make": "Acme", "os": "Windows 2000", "hardware": { "cpu_count": 1, "ram_mb": "512" } }),
    );

    let paths = export_file(&path, ExportFormat::Docker, &ws.out_dir()).unwrap();
    assert_file_contains(
        &paths.artifact,
        &[
            "ENV TESTKIT_MAKE=\"Acme\"",
            "ENV TESTKIT_OS=\"Windows 2000\"",
            "ENV TESTKIT_CPU_CORES=\"1\"",
            "ENV TESTKIT_RAM_MB=\"512\"",
        ],
    );
}

#[test]
fn test_sparse_profile_uses_placeholders() {
    let ws = Workspace::new();
    let doc = ProfileDoc::from_value(json!({}));

    for format in ExportFormat::ALL {
        let paths = export_profile(&doc, format, &ws.out_dir()).unwrap();
        assert_eq!(paths.id, "unknown");
        let content = std::fs::read_to_string(&paths.artifact).unwrap();
        assert_no_placeholders(&content);
    }
}

#[test]
fn test_non_object_profile_is_rejected() {
    let ws = Workspace::new();
    let path = ws.write_file("profiles/other/list.json", "[1, 2, 3]");
    let err = export_file(&path, ExportFormat::Wsb, &ws.out_dir()).unwrap_err();
    assert!(matches!(err, TkError::ProfileNotObject));
    assert!(!ws.out_dir().exists());
}

#[test]
fn test_unparseable_profile_reports_path() {
    let ws = Workspace::new();
    let path = ws.write_file("profiles/other/bad.json", "{ nope");
    let err = export_file(&path, ExportFormat::Wsb, &ws.out_dir()).unwrap_err();
    assert!(matches!(err, TkError::ProfileParse { .. }));
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn test_export_writes_artifact_and_launchers() {
    let ws = Workspace::generated();
    let paths = export_profile(&hp_doc(&ws), ExportFormat::Vagrant, &ws.out_dir()).unwrap();

    assert_eq!(
        list_files(&ws.out_dir()),
        vec![format!("{HP_ID}.Vagrantfile"), LAUNCH_PS1.to_string(), LAUNCH_SH.to_string()]
    );
    assert_file_contains(&paths.launch_sh, &["#!/bin/bash", HP_ID, "vagrant up"]);
    assert_file_contains(&paths.launch_ps1, &["Write-Host", HP_ID, "vagrant up"]);
}

#[test]
fn test_flat_batch_shares_launchers() {
    let ws = Workspace::generated();
    let report = BatchExport::new(ExportFormat::Wsb, ws.out_dir())
        .with_filter(ProfileFilter::new(Some("hp"), None))
        .run(&ws.store())
        .unwrap();

    assert_eq!(report.succeeded, FIXTURE_HP_COUNT);
    // One artifact per profile plus a single pair of launchers.
    assert_eq!(list_files(&ws.out_dir()).len(), FIXTURE_HP_COUNT + 2);

    let last = &report.exported[FIXTURE_HP_COUNT - 1].id;
    assert_file_contains(&ws.out_dir().join(LAUNCH_SH), &[last.as_str()]);
}

#[test]
fn test_per_profile_batch_keeps_launchers() {
    let ws = Workspace::generated();
    let report = BatchExport::new(ExportFormat::Hyperv, ws.out_dir())
        .with_filter(ProfileFilter::new(Some("lenovo"), None))
        .with_layout(OutputLayout::PerProfile)
        .run(&ws.store())
        .unwrap();

    for paths in &report.exported {
        let dir = ws.out_dir().join(&paths.id);
        assert_file_contains(&dir.join(LAUNCH_PS1), &[paths.id.as_str()]);
        assert!(dir.join(format!("{}.hyperv.ps1", paths.id)).is_file());
    }
}
