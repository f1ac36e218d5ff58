use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Envelope;
use models::user::{validate_update, User};
use service::ServiceError;
use serde_json::{Map, Value};

use crate::errors::ApiError;
use crate::state::AppState;

/// Path ids that are not a positive integer cannot name a record.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>().map_err(|_| ApiError::user_not_found())
}

/// Decode a JSON object body. Anything that is not a JSON object, including
/// an empty or malformed body, counts as `{}`.
fn parse_object(body: &Bytes) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// List every user
#[utoipa::path(get, path = "/api/users", tag = "users", responses((status = 200, description = "All users with count", body = crate::openapi::UserListResponse)))]
pub async fn list_users(State(state): State<AppState>) -> Json<Envelope<Vec<User>>> {
    let users = state.store.list().await;
    let count = users.len();
    Json(Envelope::ok(users).with_count(count))
}

/// Fetch one user
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::UserResponse),
        (status = 404, description = "User not found", body = crate::openapi::FailureResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<User>>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.store.get(id).await?;
    Ok(Json(Envelope::ok(user)))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = crate::openapi::CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::UserResponse),
        (status = 422, description = "Validation failed", body = crate::openapi::ValidationResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Envelope<User>>), ApiError> {
    let input = parse_object(&body);
    let user = state.store.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(user).with_message("User created successfully")),
    ))
}

/// Update the supplied fields of a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User id")),
    request_body = crate::openapi::UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::UserResponse),
        (status = 404, description = "User not found", body = crate::openapi::FailureResponse),
        (status = 422, description = "Validation failed", body = crate::openapi::ValidationResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<User>>, ApiError> {
    let input = parse_object(&body);
    let Ok(id) = parse_id(&id) else {
        // keep validation ahead of the lookup even for ids that match nothing
        validate_update(&input).map_err(ServiceError::from)?;
        return Err(ApiError::user_not_found());
    };
    let user = state.store.update(id, &input).await?;
    Ok(Json(Envelope::ok(user).with_message("User updated successfully")))
}

/// Delete a user, returning the removed record
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::UserResponse),
        (status = 404, description = "User not found", body = crate::openapi::FailureResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<User>>, ApiError> {
    let id = parse_id(&id)?;
    let user = state.store.delete(id).await?;
    Ok(Json(Envelope::ok(user).with_message("User deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("7").ok(), Some(7));
        assert!(matches!(parse_id("abc"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_id("-1"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn parse_object_falls_back_to_empty() {
        assert!(parse_object(&Bytes::new()).is_empty());
        assert!(parse_object(&Bytes::from_static(b"  \n")).is_empty());
        assert!(parse_object(&Bytes::from_static(b"[1]")).is_empty());
        assert!(parse_object(&Bytes::from_static(b"{nope")).is_empty());
        assert_eq!(parse_object(&Bytes::from_static(br#"{"name":"A"}"#)).len(), 1);
    }
}
