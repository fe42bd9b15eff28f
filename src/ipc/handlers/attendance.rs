use crate::ipc::error::ok;
use crate::ipc::helpers::{
    get_date_param, get_optional_status, get_optional_str, get_required_str, require_records,
    require_records_mut, require_teacher, require_viewer, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{
    attendance_qr_code, attendance_record_id, AttendanceRecord, StudentAttendance, User,
};
use crate::store::RecordStore;
use crate::view::{self, HistoryQuery};
use chrono::{Local, Utc};
use serde_json::json;

fn parse_entries(params: &serde_json::Value) -> Result<Vec<StudentAttendance>, HandlerErr> {
    let Some(raw) = params.get("entries") else {
        return Err(HandlerErr::bad_params("missing entries"));
    };
    let entries: Vec<StudentAttendance> = serde_json::from_value(raw.clone())
        .map_err(|e| HandlerErr::bad_params(format!("invalid entries: {}", e)))?;
    if entries.is_empty() {
        return Err(HandlerErr::bad_params("entries must not be empty"));
    }
    Ok(entries)
}

fn attendance_save(
    records: &mut RecordStore,
    viewer: &User,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let class_id = get_required_str(params, "classId")?;
    let date = get_required_str(params, "date")?;
    if view::parse_date(&date).is_none() {
        return Err(HandlerErr::bad_params("date must be YYYY-MM-DD"));
    }
    let entries = parse_entries(params)?;

    if !records.classes.iter().any(|c| c.id == class_id) {
        return Err(HandlerErr::new("not_found", "class not found"));
    }

    let record = AttendanceRecord {
        id: attendance_record_id(&date, &class_id),
        class_id: class_id.clone(),
        date: date.clone(),
        created_by: viewer.id().to_string(),
        last_updated: Utc::now().to_rfc3339(),
        qr_code: attendance_qr_code(&class_id, &date),
        records: entries,
    };
    let stored = record.clone();

    records
        .upsert_attendance(record)
        .map_err(|e| HandlerErr::new("store_save_failed", format!("{e:?}")))?;

    Ok(json!({ "record": stored }))
}

fn history_query(params: &serde_json::Value) -> Result<HistoryQuery, HandlerErr> {
    Ok(HistoryQuery {
        start: get_date_param(params, "startDate")?,
        end: get_date_param(params, "endDate")?,
        class_id: get_optional_str(params, "classId"),
        status: get_optional_status(params)?,
        student_id: get_optional_str(params, "studentId"),
    })
}

fn attendance_history(
    records: &RecordStore,
    viewer: &User,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let query = history_query(params)?;
    let page = match params.get("page") {
        None => 1,
        Some(v) => match v.as_u64() {
            Some(p) if p >= 1 => p as usize,
            _ => return Err(HandlerErr::bad_params("page must be a positive integer")),
        },
    };

    let filtered = view::filter_history(&records.attendance, &records.classes, viewer, &query);
    // Stats cover the whole filtered set, not just the page window.
    let stats = view::count_statuses(&filtered);
    let (window, total_pages) = view::paginate(&filtered, page);

    Ok(json!({
        "records": window,
        "page": page,
        "totalPages": total_pages,
        "totalRecords": filtered.len(),
        "stats": stats,
    }))
}

fn attendance_export(
    records: &RecordStore,
    viewer: &User,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let query = history_query(params)?;
    let filtered = view::filter_history(&records.attendance, &records.classes, viewer, &query);
    let csv = view::export_csv(&filtered, &records.classes, &records.students);

    let today = Local::now().date_naive().format("%Y-%m-%d");
    Ok(json!({
        "csv": csv,
        "suggestedFileName": format!("attendance_report_{}.csv", today),
    }))
}

fn handle_attendance_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let viewer = match require_viewer(state) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    if let Err(e) = require_teacher(&viewer) {
        return e.response(&req.id);
    }
    let records = match require_records_mut(state) {
        Ok(r) => r,
        Err(e) => return e.response(&req.id),
    };
    match attendance_save(records, &viewer, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_attendance_history(state: &mut AppState, req: &Request) -> serde_json::Value {
    let viewer = match require_viewer(state) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let records = match require_records(state) {
        Ok(r) => r,
        Err(e) => return e.response(&req.id),
    };
    match attendance_history(records, &viewer, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_attendance_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let viewer = match require_viewer(state) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let records = match require_records(state) {
        Ok(r) => r,
        Err(e) => return e.response(&req.id),
    };
    match attendance_export(records, &viewer, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.save" => Some(handle_attendance_save(state, req)),
        "attendance.history" => Some(handle_attendance_history(state, req)),
        "attendance.export" => Some(handle_attendance_export(state, req)),
        _ => None,
    }
}
