
use serde_json::json;
use test_support::{request_err_code, request_ok, sign_in, spawn_sidecar, temp_dir};

#[test]
fn sign_in_requires_a_workspace() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "1",
        "session.signIn",
        json!({ "email": "teacher@example.com", "password": "password123" }),
    );
    assert_eq!(code, "no_workspace");
}

#[test]
fn sign_in_matches_email_and_fixed_password() {
    let workspace = temp_dir("absend-session");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let result = sign_in(&mut stdin, &mut reader, "2", "teacher@example.com");
    assert_eq!(
        result.pointer("/user/role").and_then(|v| v.as_str()),
        Some("teacher")
    );
    assert_eq!(
        result.pointer("/user/name").and_then(|v| v.as_str()),
        Some("John Smith")
    );
    assert_eq!(
        result.pointer("/user/id").and_then(|v| v.as_str()),
        Some("1")
    );

    let current = request_ok(&mut stdin, &mut reader, "3", "session.current", json!({}));
    assert_eq!(
        current.pointer("/user/email").and_then(|v| v.as_str()),
        Some("teacher@example.com")
    );
}

#[test]
fn wrong_password_and_unknown_email_are_invalid_credentials() {
    let workspace = temp_dir("absend-session-bad");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "2",
        "session.signIn",
        json!({ "email": "teacher@example.com", "password": "hunter2" }),
    );
    assert_eq!(code, "invalid_credentials");

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "3",
        "session.signIn",
        json!({ "email": "nobody@example.com", "password": "password123" }),
    );
    assert_eq!(code, "invalid_credentials");

    let current = request_ok(&mut stdin, &mut reader, "4", "session.current", json!({}));
    assert!(current.get("user").map(|v| v.is_null()).unwrap_or(false));
}

#[test]
fn session_persists_across_restart_until_sign_out() {
    let workspace = temp_dir("absend-session-persist");

    {
        let (_child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": workspace.to_string_lossy() }),
        );
        let _ = sign_in(&mut stdin, &mut reader, "2", "student@example.com");
    }

    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let current = request_ok(&mut stdin, &mut reader, "2", "session.current", json!({}));
    assert_eq!(
        current.pointer("/user/role").and_then(|v| v.as_str()),
        Some("student")
    );
    assert_eq!(
        current.pointer("/user/name").and_then(|v| v.as_str()),
        Some("Alice Cooper")
    );

    let _ = request_ok(&mut stdin, &mut reader, "3", "session.signOut", json!({}));
    let current = request_ok(&mut stdin, &mut reader, "4", "session.current", json!({}));
    assert!(current.get("user").map(|v| v.is_null()).unwrap_or(false));

    assert!(!workspace.join("absen_school_user.json").exists());
}
