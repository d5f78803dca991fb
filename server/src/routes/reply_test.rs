use super::*;

#[test]
fn auth_failure_maps_statuses() {
    assert_eq!(auth_failure(AuthError::EmailTaken).status, StatusCode::CONFLICT);
    assert_eq!(auth_failure(AuthError::UnknownUser).status, StatusCode::UNAUTHORIZED);
    assert_eq!(auth_failure(AuthError::WrongPassword).status, StatusCode::UNAUTHORIZED);
    assert_eq!(auth_failure(AuthError::Invalid("x")).status, StatusCode::BAD_REQUEST);
}

#[test]
fn auth_failure_keeps_user_facing_messages() {
    assert_eq!(auth_failure(AuthError::EmailTaken).message, "Email is already registered.");
    assert_eq!(auth_failure(AuthError::WrongPassword).message, "Incorrect password.");
}

#[test]
fn store_errors_hide_details() {
    let failure = note_failure(NoteError::Store(StoreError::Corrupt("bad kind in row 7".into())));
    assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failure.message, STORE_FAILURE_MESSAGE);
}

#[test]
fn hashing_errors_hide_details() {
    let failure = auth_failure(AuthError::Hash("salt too short".into()));
    assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failure.message, STORE_FAILURE_MESSAGE);
}

#[test]
fn parse_id_rejects_garbage() {
    let failure = parse_id("nope", "Invalid Note ID.").unwrap_err();
    assert_eq!(failure, ApiFailure::bad_request("Invalid Note ID."));
    let id = Uuid::new_v4();
    assert_eq!(parse_id(&format!(" {id} "), "x").unwrap(), id);
}

#[test]
fn success_merges_fields() {
    let Json(value) = success(json!({ "theme": "dark" }));
    assert_eq!(value, json!({ "success": true, "theme": "dark" }));
    let Json(bare) = success(Value::Null);
    assert_eq!(bare, json!({ "success": true }));
}
