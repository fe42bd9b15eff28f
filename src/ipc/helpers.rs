//! Shared plumbing for the method handlers: parameter extraction and the
//! store/session guards every scoped method runs first.

use chrono::NaiveDate;

use crate::ipc::error::err;
use crate::ipc::types::AppState;
use crate::model::{AttendanceStatus, User};
use crate::store::RecordStore;
use crate::view;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        HandlerErr {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        HandlerErr::new("bad_params", message)
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Optional string parameter; an empty string means "not set" (the filter
/// selects came over the wire that way).
pub fn get_optional_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn get_date_param(params: &serde_json::Value, key: &str) -> Result<NaiveDate, HandlerErr> {
    let raw = get_required_str(params, key)?;
    view::parse_date(&raw)
        .ok_or_else(|| HandlerErr::bad_params(format!("{} must be YYYY-MM-DD", key)))
}

pub fn get_optional_status(
    params: &serde_json::Value,
) -> Result<Option<AttendanceStatus>, HandlerErr> {
    let Some(raw) = get_optional_str(params, "status") else {
        return Ok(None);
    };
    AttendanceStatus::parse(&raw)
        .map(Some)
        .ok_or_else(|| HandlerErr::bad_params(format!("unknown status: {}", raw)))
}

pub fn require_records(state: &AppState) -> Result<&RecordStore, HandlerErr> {
    state
        .records
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

pub fn require_records_mut(state: &mut AppState) -> Result<&mut RecordStore, HandlerErr> {
    state
        .records
        .as_mut()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

/// The signed-in viewer, cloned out of the session store so handlers can hold
/// it across mutable store access.
pub fn require_viewer(state: &AppState) -> Result<User, HandlerErr> {
    let session = state
        .session
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))?;
    session
        .current()
        .cloned()
        .ok_or_else(|| HandlerErr::new("no_session", "sign in first"))
}

pub fn require_teacher(viewer: &User) -> Result<(), HandlerErr> {
    match viewer {
        User::Teacher(_) => Ok(()),
        User::Student(_) => Err(HandlerErr::new(
            "forbidden",
            "this method is restricted to teachers",
        )),
    }
}
