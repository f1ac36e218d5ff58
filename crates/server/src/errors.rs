use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::Envelope;
use models::errors::FieldErrors;
use service::ServiceError;
use thiserror::Error;
use tracing::debug;

/// Handler failure, rendered as JSON.
#[derive(Debug)]
pub enum ApiError {
    /// 404 with `{success: false, message}`
    NotFound(String),
    /// 422 with `{message, errors: {field: [..]}}`
    Validation(FieldErrors),
}

impl ApiError {
    pub fn user_not_found() -> Self {
        Self::NotFound("User not found".into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(entity) => Self::NotFound(format!("{} not found", capitalize(entity))),
            ServiceError::Validation(errors) => Self::Validation(errors),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(Envelope::failure(msg))).into_response()
            }
            ApiError::Validation(errors) => {
                debug!(error = %errors, "rejecting request with 422");
                let body = serde_json::json!({ "message": errors.summary(), "errors": errors });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_not_found_maps_to_user_message() {
        match ApiError::from(ServiceError::not_found("user")) {
            ApiError::NotFound(msg) => assert_eq!(msg, "User not found"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::user_not_found().into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Validation(FieldErrors::new()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
