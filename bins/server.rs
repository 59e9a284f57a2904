use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // Load .env early so RUST_LOG takes effect
    dotenv().ok();
    // LOG_FORMAT=json for container deployments, compact otherwise
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => common::utils::logging::init_logging_json(),
        _ => common::utils::logging::init_logging_default(),
    }
}

fn main() -> std::process::ExitCode {
    init_logging();

    let instance_id = Uuid::new_v4();
    let pid = std::process::id();

    std::panic::set_hook(Box::new(move |info| {
        error!(event = "panic", %instance_id, pid, message = %info, "unhandled panic");
    }));

    let workers =
        std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok());

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = workers {
        builder.worker_threads(n);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "could not build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        event = "start",
        %instance_id,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        "tims backend starting"
    );

    rt.block_on(async move {
        let serve = tokio::spawn(server::run());

        tokio::select! {
            res = serve => match res {
                Ok(Ok(())) => {
                    info!(event = "stop", %instance_id, "server stopped");
                    std::process::ExitCode::SUCCESS
                }
                Ok(Err(e)) => {
                    error!(event = "run_failed", error = %e, "server exited with error");
                    std::process::ExitCode::FAILURE
                }
                Err(e) => {
                    error!(event = "join_error", error = %e, "server task panicked");
                    std::process::ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(event = "shutdown_signal", %instance_id, "Ctrl+C received, shutting down");
                std::process::ExitCode::SUCCESS
            }
        }
    })
}
