use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, require_records, require_viewer, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_list_for_class(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Err(e) = require_viewer(state) {
        return e.response(&req.id);
    }
    let class_id = match get_required_str(&req.params, "classId") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let records = match require_records(state) {
        Ok(r) => r,
        Err(e) => return e.response(&req.id),
    };

    let Some(class) = records.classes.iter().find(|c| c.id == class_id) else {
        return HandlerErr::new("not_found", "class not found").response(&req.id);
    };

    // Roster membership is by user id; students whose `class` name disagrees
    // with the roster still show up (nothing reconciles the two).
    let students: Vec<serde_json::Value> = records
        .students
        .iter()
        .filter(|s| class.students.contains(&s.id))
        .map(|s| json!(s))
        .collect();

    ok(&req.id, json!({ "students": students }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.listForClass" => Some(handle_list_for_class(state, req)),
        _ => None,
    }
}
