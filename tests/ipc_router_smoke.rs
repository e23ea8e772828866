
use serde_json::json;
use std::io::Write;
use test_support::{
    read_response, request, request_err, request_ok, select_workspace, spawn_sidecar, temp_dir,
};

#[test]
fn health_reports_version_without_workspace() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(
        health.get("version").and_then(|v| v.as_str()),
        Some(env!("CARGO_PKG_VERSION"))
    );
    assert!(health.get("workspacePath").is_some_and(|v| v.is_null()));
}

#[test]
fn student_methods_require_a_workspace() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    for (i, method) in [
        "students.list",
        "students.load",
        "students.create",
        "students.update",
        "students.setStatus",
        "students.delete",
        "students.seedIfEmpty",
    ]
    .iter()
    .enumerate()
    {
        let e = request_err(&mut stdin, &mut reader, &i.to_string(), method, json!({}));
        assert_eq!(
            e.get("code").and_then(|v| v.as_str()),
            Some("no_workspace"),
            "{method}"
        );
    }
}

#[test]
fn malformed_input_is_answered_and_the_loop_continues() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    writeln!(stdin, "{{not json").expect("write");
    stdin.flush().expect("flush");
    let bad = read_response(&mut reader);
    assert_eq!(bad.get("ok"), Some(&json!(false)));
    assert_eq!(bad.pointer("/error/code"), Some(&json!("bad_json")));

    let unknown = request(&mut stdin, &mut reader, "2", "students.frobnicate", json!({}));
    assert_eq!(unknown.pointer("/error/code"), Some(&json!("not_implemented")));

    let _ = request_ok(&mut stdin, &mut reader, "3", "health", json!({}));
}

#[test]
fn missing_params_are_bad_params() {
    let workspace = temp_dir("rosterd-bad-params");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let e = request_err(&mut stdin, &mut reader, "0", "workspace.select", json!({}));
    assert_eq!(e.get("code").and_then(|v| v.as_str()), Some("bad_params"));

    select_workspace(&mut stdin, &mut reader, &workspace);
    for (id, method, params) in [
        ("1", "students.create", json!({})),
        ("2", "students.update", json!({ "record": {} })),
        ("3", "students.update", json!({ "id": "x" })),
        ("4", "students.delete", json!({})),
    ] {
        let e = request_err(&mut stdin, &mut reader, id, method, params);
        assert_eq!(e.get("code").and_then(|v| v.as_str()), Some("bad_params"), "{method}");
    }
}

#[test]
fn validation_errors_list_every_field() {
    let workspace = temp_dir("rosterd-validation");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let e = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "students.create",
        json!({ "record": { "studentId": "x", "name": "", "grade": "abc", "remarks": 5 } }),
    );
    let fields: Vec<&str> = e
        .pointer("/details/fieldErrors")
        .and_then(|v| v.as_array())
        .expect("fieldErrors")
        .iter()
        .filter_map(|f| f.get("field").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(fields, vec!["studentId", "name", "grade", "remarks"]);
}
