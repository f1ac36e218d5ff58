use std::collections::HashMap;

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub timestamp: String }

#[derive(ToSchema)]
pub struct ServiceInfoResponse { pub app: String, pub message: String, pub endpoint: String, pub host: String }

#[derive(ToSchema)]
pub struct UserDoc { pub id: u64, pub name: String, pub email: String }

#[derive(ToSchema)]
pub struct CreateUserRequest { pub name: String, pub email: String }

#[derive(ToSchema)]
pub struct UpdateUserRequest { pub name: Option<String>, pub email: Option<String> }

#[derive(ToSchema)]
pub struct UserResponse { pub success: bool, pub message: Option<String>, pub data: UserDoc }

#[derive(ToSchema)]
pub struct UserListResponse { pub success: bool, pub data: Vec<UserDoc>, pub count: usize }

#[derive(ToSchema)]
pub struct FailureResponse { pub success: bool, pub message: String }

#[derive(ToSchema)]
pub struct ValidationResponse { pub message: String, pub errors: HashMap<String, Vec<String>> }

#[derive(ToSchema)]
pub struct ProductDoc { pub id: u32, pub name: String, pub price: u32 }

#[derive(ToSchema)]
pub struct ProductListResponse { pub products: Vec<ProductDoc> }

#[derive(ToSchema)]
pub struct CurrentUserResponse { pub user: UserDoc }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::meta::home,
        crate::routes::meta::products,
        crate::routes::meta::me,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::create_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceInfoResponse,
            UserDoc,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            UserListResponse,
            FailureResponse,
            ValidationResponse,
            ProductDoc,
            ProductListResponse,
            CurrentUserResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "meta")
    )
)]
pub struct ApiDoc;

/// Prefix the handler annotations are written against.
const DOCUMENTED_PREFIX: &str = "/api";

/// The OpenAPI document with users routes moved under `api_prefix`.
pub fn api_doc(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if api_prefix != DOCUMENTED_PREFIX {
        let paths = std::mem::take(&mut doc.paths.paths);
        doc.paths.paths = paths
            .into_iter()
            .map(|(path, item)| match path.strip_prefix(DOCUMENTED_PREFIX) {
                Some(rest) if rest.starts_with('/') => (format!("{api_prefix}{rest}"), item),
                _ => (path, item),
            })
            .collect();
    }
    doc
}
