use dotenvy::dotenv;
use tracing::{error, info};

fn init_logging() {
    // .env may carry RUST_LOG / LOG_FORMAT
    dotenv().ok();
    common::utils::logging::init_logging(common::utils::logging::LogFormat::from_env());
}

fn main() -> std::process::ExitCode {
    init_logging();

    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "users-api", event = "panic", pid, message = %info, "unhandled panic occurred");
    }));

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "users-api", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(service = "users-api", event = "start", pid, version, "users api starting");

    match rt.block_on(server::run()) {
        Ok(()) => {
            info!(service = "users-api", event = "stop", pid, "users api exited cleanly");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "users-api", event = "run_failed", error = %e, "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
