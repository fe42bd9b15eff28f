
use serde_json::json;
use test_support::{day_string, request_ok, sign_in, spawn_sidecar, temp_dir};

#[test]
fn export_renders_one_quoted_row_per_entry() {
    let workspace = temp_dir("absend-export");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = sign_in(&mut stdin, &mut reader, "2", "teacher@example.com");

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.export",
        json!({ "startDate": day_string(6), "endDate": day_string(0) }),
    );

    let csv = result.get("csv").and_then(|v| v.as_str()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,Class,Student,Status,Time In,Notes");
    // 14 owned-class records, one entry each.
    assert_eq!(lines.len(), 15);

    // Today is a seeded absence: no time in, no notes.
    let today = day_string(0);
    let expected = format!("\"{}\",\"TKJ-10A\",\"Alice Cooper\",\"absent\",\"\",\"\"", today);
    assert!(
        lines.contains(&expected.as_str()),
        "missing row {:?} in {:?}",
        expected,
        lines
    );

    // A present day carries the seeded 08:00 time in.
    let yesterday = day_string(1);
    let expected = format!(
        "\"{}\",\"MM-12A\",\"Carol Williams\",\"present\",\"08:00\",\"\"",
        yesterday
    );
    assert!(lines.contains(&expected.as_str()));

    assert_eq!(
        result.get("suggestedFileName").and_then(|v| v.as_str()),
        Some(format!("attendance_report_{}.csv", today).as_str())
    );
}

#[test]
fn export_respects_the_viewer_scope_and_filters() {
    let workspace = temp_dir("absend-export-scope");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = sign_in(&mut stdin, &mut reader, "2", "student@example.com");

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.export",
        json!({
            "startDate": day_string(6),
            "endDate": day_string(0),
            "status": "absent"
        }),
    );

    let csv = result.get("csv").and_then(|v| v.as_str()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    // Header plus the two seeded absence days for this student's class.
    assert_eq!(lines.len(), 3);
    for line in &lines[1..] {
        assert!(line.contains("\"Alice Cooper\""));
        assert!(line.contains("\"absent\""));
    }
}
