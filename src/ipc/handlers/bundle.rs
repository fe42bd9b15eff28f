use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{RecordStore, SessionStore};
use serde_json::json;
use std::path::PathBuf;

fn handle_export_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(workspace) = state.workspace.clone() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(out_path) = req.params.get("outPath").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing outPath", None);
    };

    match backup::export_workspace_bundle(&workspace, &PathBuf::from(out_path)) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "entryCount": summary.entry_count,
                "outPath": out_path,
            }),
        ),
        Err(e) => err(&req.id, "bundle_export_failed", format!("{e:?}"), None),
    }
}

fn handle_import_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(workspace) = state.workspace.clone() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(in_path) = req.params.get("inPath").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing inPath", None);
    };

    let summary = match backup::import_workspace_bundle(&PathBuf::from(in_path), &workspace) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "bundle_import_failed", format!("{e:?}"), None),
    };

    // Restored blobs replace in-memory state; reopen both stores from disk.
    let records = match RecordStore::open(&workspace) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "store_open_failed", format!("{e:?}"), None),
    };
    let session = match SessionStore::open(&workspace) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "store_open_failed", format!("{e:?}"), None),
    };
    state.records = Some(records);
    state.session = Some(session);

    ok(
        &req.id,
        json!({
            "bundleFormatDetected": summary.bundle_format_detected,
            "restoredCount": summary.restored_count,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "store.exportBundle" => Some(handle_export_bundle(state, req)),
        "store.importBundle" => Some(handle_import_bundle(state, req)),
        _ => None,
    }
}
