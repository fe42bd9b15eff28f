
use serde_json::json;
use std::fs::File;
use std::io::Read;
use test_support::{request_ok, sign_in, spawn_sidecar, temp_dir};

#[test]
fn bundle_roundtrip_moves_a_workspace() {
    let source = temp_dir("absend-bundle-src");
    let target = temp_dir("absend-bundle-dst");
    let out_dir = temp_dir("absend-bundle-out");
    let bundle_path = out_dir.join("workspace.absend.zip");

    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": source.to_string_lossy() }),
    );
    let _ = sign_in(&mut stdin, &mut reader, "2", "teacher@example.com");

    // A record the seed never generates, so the restore is distinguishable.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.save",
        json!({
            "classId": "3",
            "date": "2025-01-06",
            "entries": [ { "studentId": "3", "status": "excused", "notes": "field trip" } ]
        }),
    );

    let export = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "store.exportBundle",
        json!({ "outPath": bundle_path.to_string_lossy() }),
    );
    assert_eq!(
        export.get("bundleFormat").and_then(|v| v.as_str()),
        Some("absend-workspace-v1")
    );
    // Four collections, the session blob, and the manifest.
    assert_eq!(export.get("entryCount").and_then(|v| v.as_u64()), Some(6));

    let f = File::open(&bundle_path).expect("open bundle");
    let mut archive = zip::ZipArchive::new(f).expect("open zip archive");
    let mut manifest = String::new();
    archive
        .by_name("manifest.json")
        .expect("manifest entry")
        .read_to_string(&mut manifest)
        .expect("read manifest");
    assert!(manifest.contains("absend-workspace-v1"));
    assert!(manifest.contains("sha256"));
    archive
        .by_name("blobs/absen_school_attendance.json")
        .expect("attendance blob in bundle");

    // Restore into a fresh workspace.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "workspace.select",
        json!({ "path": target.to_string_lossy() }),
    );
    let import = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "store.importBundle",
        json!({ "inPath": bundle_path.to_string_lossy() }),
    );
    assert_eq!(
        import.get("bundleFormatDetected").and_then(|v| v.as_str()),
        Some("absend-workspace-v1")
    );
    assert_eq!(import.get("restoredCount").and_then(|v| v.as_u64()), Some(5));

    // The session blob travelled with the bundle.
    let current = request_ok(&mut stdin, &mut reader, "7", "session.current", json!({}));
    assert_eq!(
        current.pointer("/user/name").and_then(|v| v.as_str()),
        Some("John Smith")
    );

    let history = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "attendance.history",
        json!({ "startDate": "2025-01-06", "endDate": "2025-01-06" }),
    );
    assert_eq!(
        history.get("totalRecords").and_then(|v| v.as_u64()),
        Some(1)
    );
    assert_eq!(
        history
            .pointer("/records/0/records/0/notes")
            .and_then(|v| v.as_str()),
        Some("field trip")
    );

    let _ = std::fs::remove_dir_all(source);
    let _ = std::fs::remove_dir_all(target);
    let _ = std::fs::remove_dir_all(out_dir);
}
