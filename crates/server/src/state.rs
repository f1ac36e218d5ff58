use std::sync::Arc;

use common::types::ServiceInfo;
use service::UserStore;

/// Shared handler state. Cheap to clone; every clone sees the same store.
#[derive(Clone)]
pub struct AppState {
    pub store: UserStore,
    pub info: Arc<ServiceInfo>,
}

impl AppState {
    pub fn new(store: UserStore, app_name: &str, host: String) -> Self {
        let info = ServiceInfo {
            app: app_name.to_string(),
            message: format!("Hello from {app_name}!"),
            endpoint: "/".to_string(),
            host,
        };
        Self { store, info: Arc::new(info) }
    }
}
