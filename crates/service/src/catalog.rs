//! Fixed demo data served by the static routes.

use models::user::User;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub price: u32,
}

const PRODUCTS: [Product; 3] = [
    Product { id: 1, name: "Laptop", price: 999 },
    Product { id: 2, name: "Mouse", price: 29 },
    Product { id: 3, name: "Keyboard", price: 79 },
];

pub fn products() -> Vec<Product> {
    PRODUCTS.to_vec()
}

/// Placeholder identity returned by `/me`; not backed by the user store.
pub fn demo_user() -> User {
    User { id: 1, name: "Demo User".into(), email: "demo@example.com".into() }
}
