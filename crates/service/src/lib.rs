//! Service layer: the in-memory user store and the static catalog data.
//! - Validation rules live in `models::user`; the store only applies them.
//! - Errors are surfaced as `ServiceError` for the HTTP layer to map.

pub mod catalog;
pub mod errors;
pub mod user_store;

pub use errors::ServiceError;
pub use user_store::UserStore;
