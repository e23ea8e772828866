use serde_json::json;

use crate::students::ActionError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Failure response for a student operation; validation failures carry the
/// per-field messages in `details.fieldErrors`.
pub fn action_err(id: &str, e: &ActionError) -> serde_json::Value {
    let details = match e {
        ActionError::Validation(errors) => Some(json!({ "fieldErrors": errors.fields() })),
        ActionError::Duplicate | ActionError::Storage(_) => None,
    };
    err(id, e.code(), e.to_string(), details)
}
