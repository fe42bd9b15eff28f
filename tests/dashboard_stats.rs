
use serde_json::json;
use test_support::{day_string, request_ok, sign_in, spawn_sidecar, temp_dir};

// Seeded data: 7 days x 3 classes x 1 student. Day offsets 0 and 5 are
// full-class absences, so 6 of 21 entries are absent and 15 present.

#[test]
fn teacher_dashboard_counts_every_entry() {
    let workspace = temp_dir("absend-dashboard-teacher");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = sign_in(&mut stdin, &mut reader, "2", "teacher@example.com");

    let result = request_ok(&mut stdin, &mut reader, "3", "dashboard.stats", json!({}));

    let stats = result.get("stats").unwrap();
    assert_eq!(stats.get("total").and_then(|v| v.as_u64()), Some(21));
    assert_eq!(stats.get("present").and_then(|v| v.as_u64()), Some(15));
    assert_eq!(stats.get("absent").and_then(|v| v.as_u64()), Some(6));
    assert_eq!(stats.get("late").and_then(|v| v.as_u64()), Some(0));
    assert_eq!(stats.get("excused").and_then(|v| v.as_u64()), Some(0));
    assert_eq!(
        stats.get("percentage").and_then(|v| v.as_f64()),
        Some(71.4)
    );

    let by_day = result
        .get("attendanceByDay")
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(by_day.len(), 7);
    assert_eq!(
        by_day[0].get("date").and_then(|v| v.as_str()),
        Some(day_string(6).as_str())
    );
    assert_eq!(
        by_day[6].get("date").and_then(|v| v.as_str()),
        Some(day_string(0).as_str())
    );
    // Today and today-5 are the seeded absence days.
    assert_eq!(by_day[6].get("absent").and_then(|v| v.as_u64()), Some(3));
    assert_eq!(by_day[6].get("present").and_then(|v| v.as_u64()), Some(0));
    assert_eq!(by_day[1].get("absent").and_then(|v| v.as_u64()), Some(3));
    assert_eq!(by_day[0].get("present").and_then(|v| v.as_u64()), Some(3));

    // Today's records restricted to the classes this teacher owns (1 and 3).
    let today_records = result
        .get("todayRecords")
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(today_records.len(), 2);
    for r in today_records {
        assert_eq!(
            r.get("date").and_then(|v| v.as_str()),
            Some(day_string(0).as_str())
        );
    }
}

#[test]
fn student_dashboard_counts_their_entry_per_record() {
    let workspace = temp_dir("absend-dashboard-student");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = sign_in(&mut stdin, &mut reader, "2", "student@example.com");

    let result = request_ok(&mut stdin, &mut reader, "3", "dashboard.stats", json!({}));

    let stats = result.get("stats").unwrap();
    assert_eq!(stats.get("total").and_then(|v| v.as_u64()), Some(7));
    assert_eq!(stats.get("present").and_then(|v| v.as_u64()), Some(5));
    assert_eq!(stats.get("absent").and_then(|v| v.as_u64()), Some(2));
    assert_eq!(
        stats.get("percentage").and_then(|v| v.as_f64()),
        Some(71.4)
    );

    // The per-day chart is teacher-only.
    assert_eq!(
        result
            .get("attendanceByDay")
            .and_then(|v| v.as_array())
            .map(|a| a.len()),
        Some(0)
    );

    let today_records = result
        .get("todayRecords")
        .and_then(|v| v.as_array())
        .unwrap();
    assert_eq!(today_records.len(), 1);
    assert_eq!(
        today_records[0].get("classId").and_then(|v| v.as_str()),
        Some("1")
    );
}
