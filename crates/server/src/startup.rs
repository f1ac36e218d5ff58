use axum::Router;
use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use dotenvy::dotenv;
use service::UserStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Value reported as `host` by the root route.
fn hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

/// Build the application router with a fresh store from `cfg`.
pub fn build_app(cfg: &AppConfig) -> Router {
    let store = UserStore::from_config(&cfg.store);
    let state = AppState::new(store, &cfg.service.app_name, hostname());
    routes::build_router(state, build_cors(), &cfg.server.api_prefix)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging(LogFormat::from_env());

    let cfg = AppConfig::load_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let addr = cfg
        .server
        .bind_addr()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let app = build_app(&cfg);

    info!(
        %addr,
        api_prefix = %cfg.server.api_prefix,
        seed = cfg.store.seed,
        id_strategy = ?cfg.store.id_strategy,
        "starting users api"
    );
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
