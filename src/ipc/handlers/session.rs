use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_sign_in(state: &mut AppState, req: &Request) -> serde_json::Value {
    let email = match get_required_str(&req.params, "email") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let password = match get_required_str(&req.params, "password") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };

    let Some(records) = state.records.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let users = records.users();
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    match session.sign_in(&users, &email, &password) {
        Ok(Some(user)) => ok(&req.id, json!({ "user": user })),
        Ok(None) => err(
            &req.id,
            "invalid_credentials",
            "invalid email or password",
            None,
        ),
        Err(e) => err(&req.id, "session_save_failed", format!("{e:?}"), None),
    }
}

fn handle_sign_out(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match session.sign_out() {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => err(&req.id, "session_save_failed", format!("{e:?}"), None),
    }
}

fn handle_current(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return HandlerErr::new("no_workspace", "select a workspace first").response(&req.id);
    };
    ok(&req.id, json!({ "user": session.current() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.signIn" => Some(handle_sign_in(state, req)),
        "session.signOut" => Some(handle_sign_out(state, req)),
        "session.current" => Some(handle_current(state, req)),
        _ => None,
    }
}
