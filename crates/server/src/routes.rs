pub mod meta;
pub mod users;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::api_doc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Routes mounted under the API prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/products", get(meta::products))
        .route("/me", get(meta::me))
}

/// Build the full application router. `api_prefix` must be empty or a
/// `/`-led path without a trailing slash.
pub fn build_router(state: AppState, cors: CorsLayer, api_prefix: &str) -> Router {
    let public = Router::new()
        .route("/", get(meta::home))
        .route("/health", get(health));

    let app = if api_prefix.is_empty() {
        public.merge(api_routes())
    } else {
        public.nest(api_prefix, api_routes().route("/health", get(health)))
    };

    app.with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api_doc(api_prefix)))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use configs::IdStrategy;
    use serde_json::{json, Value};
    use service::UserStore;
    use tower::ServiceExt;

    fn app_with(prefix: &str, strategy: IdStrategy) -> Router {
        let state = AppState::new(UserStore::seeded(strategy), "Users API", "test-host".into());
        build_router(state, CorsLayer::very_permissive(), prefix)
    }

    fn app() -> Router {
        app_with("/api", IdStrategy::CountPlusOne)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send_raw(app, method, uri, body.map(|v| v.to_string())).await
    }

    async fn send_raw(app: &Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(raw) => {
                req = req.header("content-type", "application/json");
                Body::from(raw)
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    #[tokio::test]
    async fn list_returns_seeded_users_with_count() {
        let (status, body) = send(&app(), "GET", "/api/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 3);
        assert_eq!(body["data"][0], json!({"id": 1, "name": "John Doe", "email": "john@example.com"}));
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn create_delete_then_missing() {
        let app = app();
        let (status, body) = send(&app, "POST", "/api/users", Some(json!({"name": "Ann", "email": "ann@x.com"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["data"]["id"], 4);

        let (status, body) = send(&app, "DELETE", "/api/users/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");
        assert_eq!(body["data"]["id"], 2);

        let (status, body) = send(&app, "GET", "/api/users/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "message": "User not found"}));
    }

    #[tokio::test]
    async fn invalid_create_is_422_with_field_errors() {
        let (status, body) = send(&app(), "POST", "/api/users", Some(json!({"name": "", "email": "bad"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["name"][0], "The name field is required.");
        assert_eq!(body["errors"]["email"][0], "The email field must be a valid email address.");
        assert_eq!(body["message"], "The name field is required. (and 1 more error)");
    }

    #[tokio::test]
    async fn update_email_keeps_name() {
        let (status, body) = send(&app(), "PUT", "/api/users/1", Some(json!({"email": "new@x.com"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["data"]["name"], "John Doe");
        assert_eq!(body["data"]["email"], "new@x.com");
    }

    #[tokio::test]
    async fn update_and_delete_missing_are_404() {
        let app = app();
        let (status, _) = send(&app, "PUT", "/api/users/99", Some(json!({"name": "X"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", "/api/users/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) = send(&app, "GET", "/api/users/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn malformed_create_body_counts_as_empty() {
        let app = app();
        for raw in ["{nope", "[\"Ann\"]", ""] {
            let (status, body) = send_raw(&app, "POST", "/api/users", Some(raw.to_string())).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{raw}");
            assert_eq!(body["errors"]["name"][0], "The name field is required.");
            assert_eq!(body["errors"]["email"][0], "The email field is required.");
        }
        let (_, body) = send(&app, "GET", "/api/users", None).await;
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn malformed_update_body_leaves_record_unchanged() {
        let app = app();
        let (_, before) = send(&app, "GET", "/api/users/1", None).await;
        let (status, body) = send_raw(&app, "PUT", "/api/users/1", Some("{nope".to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], before["data"]);
    }

    #[tokio::test]
    async fn update_validates_before_resolving_id() {
        let app = app();
        for uri in ["/api/users/abc", "/api/users/99"] {
            let (status, body) = send(&app, "PUT", uri, Some(json!({"email": "bad"}))).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            assert_eq!(body["errors"]["email"][0], "The email field must be a valid email address.");
        }
        let (status, body) = send(&app, "PUT", "/api/users/abc", Some(json!({"name": "X"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn repeated_get_is_identical() {
        let app = app();
        let (_, first) = send(&app, "GET", "/api/users/1", None).await;
        for _ in 0..3 {
            let (status, again) = send(&app, "GET", "/api/users/1", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(again, first);
        }
    }

    #[tokio::test]
    async fn health_at_root_and_prefix() {
        let app = app();
        for uri in ["/health", "/api/health"] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "ok");
            assert!(body["timestamp"].is_string());
        }
    }

    #[tokio::test]
    async fn static_routes() {
        let app = app();
        let (_, body) = send(&app, "GET", "/", None).await;
        assert_eq!(body, json!({"app": "Users API", "message": "Hello from Users API!", "endpoint": "/", "host": "test-host"}));
        let (_, body) = send(&app, "GET", "/api/products", None).await;
        assert_eq!(body["products"][1], json!({"id": 2, "name": "Mouse", "price": 29}));
        let (_, body) = send(&app, "GET", "/api/me", None).await;
        assert_eq!(body["user"]["email"], "demo@example.com");
    }

    #[tokio::test]
    async fn empty_prefix_mounts_at_root() {
        let app = app_with("", IdStrategy::Monotonic);
        let (status, body) = send(&app, "GET", "/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        let (status, _) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = send(&app(), "GET", "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/users"].is_object());
    }

    #[tokio::test]
    async fn openapi_paths_follow_prefix() {
        let (_, body) = send(&app_with("/v1", IdStrategy::CountPlusOne), "GET", "/api-docs/openapi.json", None).await;
        assert!(body["paths"]["/v1/users/{id}"].is_object());
        assert!(body["paths"]["/api/users"].is_null());
        assert!(body["paths"]["/health"].is_object());

        let (_, body) = send(&app_with("", IdStrategy::CountPlusOne), "GET", "/api-docs/openapi.json", None).await;
        assert!(body["paths"]["/users"].is_object());
        assert!(body["paths"]["/products"].is_object());
    }
}
