use axum::{extract::State, Json};
use common::types::ServiceInfo;
use models::user::User;
use serde::Serialize;
use service::catalog::{self, Product};

use crate::state::AppState;

#[derive(Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

#[derive(Serialize)]
pub struct CurrentUser {
    pub user: User,
}

#[utoipa::path(get, path = "/", tag = "meta", responses((status = 200, description = "Service identification", body = crate::openapi::ServiceInfoResponse)))]
pub async fn home(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(state.info.as_ref().clone())
}

#[utoipa::path(get, path = "/api/products", tag = "meta", responses((status = 200, description = "Static product catalog", body = crate::openapi::ProductListResponse)))]
pub async fn products() -> Json<ProductList> {
    Json(ProductList { products: catalog::products() })
}

#[utoipa::path(get, path = "/api/me", tag = "meta", responses((status = 200, description = "Demo identity", body = crate::openapi::CurrentUserResponse)))]
pub async fn me() -> Json<CurrentUser> {
    Json(CurrentUser { user: catalog::demo_user() })
}
