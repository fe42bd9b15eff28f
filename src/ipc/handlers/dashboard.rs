use crate::ipc::error::ok;
use crate::ipc::helpers::{require_records, require_viewer};
use crate::ipc::types::{AppState, Request};
use crate::model::User;
use crate::view;
use chrono::Local;
use serde_json::json;

fn handle_dashboard_stats(state: &mut AppState, req: &Request) -> serde_json::Value {
    let viewer = match require_viewer(state) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let records = match require_records(state) {
        Ok(r) => r,
        Err(e) => return e.response(&req.id),
    };

    let today = Local::now().date_naive();
    let today_string = today.format("%Y-%m-%d").to_string();

    // Headline counts span the whole collection; the dashboard has always
    // shown teachers school-wide numbers rather than just their classes.
    let stats = view::overall_stats(&records.attendance, &viewer);

    let by_day = match &viewer {
        User::Teacher(_) => view::attendance_by_day(&records.attendance, today),
        User::Student(_) => Vec::new(),
    };

    let relevant: Vec<&str> = view::visible_classes(&records.classes, &viewer)
        .into_iter()
        .map(|c| c.id.as_str())
        .collect();
    let today_records: Vec<&crate::model::AttendanceRecord> = records
        .attendance
        .iter()
        .filter(|r| r.date == today_string && relevant.contains(&r.class_id.as_str()))
        .collect();

    ok(
        &req.id,
        json!({
            "stats": stats,
            "attendanceByDay": by_day,
            "todayRecords": today_records,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.stats" => Some(handle_dashboard_stats(state, req)),
        _ => None,
    }
}
