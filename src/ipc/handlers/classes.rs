use crate::ipc::error::ok;
use crate::ipc::helpers::{require_records, require_viewer};
use crate::ipc::types::{AppState, Request};
use crate::view;
use serde_json::json;

fn handle_classes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let viewer = match require_viewer(state) {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let records = match require_records(state) {
        Ok(r) => r,
        Err(e) => return e.response(&req.id),
    };

    // Include the roster size so the shell can show counts without a second
    // round trip.
    let classes: Vec<serde_json::Value> = view::visible_classes(&records.classes, &viewer)
        .into_iter()
        .map(|cls| {
            let mut value = json!(cls);
            value["studentCount"] = json!(cls.students.len());
            value
        })
        .collect();

    ok(&req.id, json!({ "classes": classes }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.list" => Some(handle_classes_list(state, req)),
        _ => None,
    }
}
