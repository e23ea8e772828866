use crate::ipc::error::{action_err, err, ok};
use crate::ipc::types::{AppState, Request};
use crate::students::{self, ActionResult, Success};
use serde_json::json;

fn no_workspace(req: &Request) -> serde_json::Value {
    err(&req.id, "no_workspace", "select a workspace first", None)
}

fn required_id<'a>(req: &'a Request) -> Result<&'a str, serde_json::Value> {
    req.params
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| err(&req.id, "bad_params", "missing id", None))
}

fn required_record(req: &Request) -> Result<&serde_json::Value, serde_json::Value> {
    req.params
        .get("record")
        .filter(|v| !v.is_null())
        .ok_or_else(|| err(&req.id, "bad_params", "missing record", None))
}

/// Mutation responses carry the list generation so the client knows which
/// list snapshot is now stale.
fn mutation_response(
    state: &AppState,
    req: &Request,
    res: ActionResult<Success>,
) -> serde_json::Value {
    match res {
        Ok(s) => ok(
            &req.id,
            json!({ "success": s.success, "listGeneration": state.list.generation() }),
        ),
        Err(e) => action_err(&req.id, &e),
    }
}

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return no_workspace(req);
    };
    match students::list_students(conn) {
        Ok(rows) => ok(
            &req.id,
            json!({ "students": rows, "listGeneration": state.list.generation() }),
        ),
        Err(e) => action_err(&req.id, &e),
    }
}

fn handle_students_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return no_workspace(req);
    };
    match students::load_students(conn, &mut state.list) {
        Ok(rows) => ok(
            &req.id,
            json!({ "students": rows, "listGeneration": state.list.generation() }),
        ),
        Err(e) => action_err(&req.id, &e),
    }
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return no_workspace(req);
    };
    let record = match required_record(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let res = students::create_student(conn, &mut state.list, record);
    mutation_response(state, req, res)
}

fn handle_students_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return no_workspace(req);
    };
    let id = match required_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let record = match required_record(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let res = students::update_student(conn, &mut state.list, id, record);
    mutation_response(state, req, res)
}

fn handle_students_set_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return no_workspace(req);
    };
    let id = match required_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(status) = req.params.get("status").and_then(|v| v.as_bool()) else {
        return err(&req.id, "bad_params", "missing status", None);
    };
    let res = students::set_student_status(conn, &mut state.list, id, status);
    mutation_response(state, req, res)
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return no_workspace(req);
    };
    let id = match required_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let res = students::delete_student(conn, &mut state.list, id);
    mutation_response(state, req, res)
}

fn handle_students_seed(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return no_workspace(req);
    };
    let res = students::seed_if_empty(conn, &mut state.list);
    mutation_response(state, req, res)
}

fn handle_students_generation(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "listGeneration": state.list.generation() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.load" => Some(handle_students_load(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        "students.update" => Some(handle_students_update(state, req)),
        "students.setStatus" => Some(handle_students_set_status(state, req)),
        "students.delete" => Some(handle_students_delete(state, req)),
        "students.seedIfEmpty" => Some(handle_students_seed(state, req)),
        "students.generation" => Some(handle_students_generation(state, req)),
        _ => None,
    }
}
