mod handlers;
mod openapi;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use clap::Parser;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hoststat_core::collector::{CollectorConfig, MetricsCollector, RealFs};

use openapi::ApiDoc;
use state::AppState;

/// Log filter used when `RUST_LOG` is unset. Collector warnings name the
/// metrics a snapshot is missing.
const DEFAULT_LOG_FILTER: &str = "hoststat_web=info,hoststat_core=warn";

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "hoststat-web", about = "hoststat HTTP API server", version = hoststat_core::VERSION)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:8080", env = "HOSTSTAT_LISTEN")]
    listen: String,

    /// Directory whose filesystem capacity is reported.
    #[arg(long, default_value = ".", env = "HOSTSTAT_DIR")]
    dir: PathBuf,

    /// Path to /proc filesystem.
    #[arg(long, default_value = "/proc", env = "HOSTSTAT_PROC_PATH")]
    proc_path: String,

    /// Pause before each CPU load read, in milliseconds.
    #[arg(long, default_value = "100", env = "HOSTSTAT_SAMPLE_MS")]
    sample_ms: u64,

    /// Also estimate the server's CPU usage from two CPU time samples.
    #[arg(long, env = "HOSTSTAT_PROCESS_USAGE")]
    process_usage: bool,
}

// ============================================================
// Main
// ============================================================

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> ExitCode {
    let addr: SocketAddr = match args.listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(listen = %args.listen, error = %e, "invalid listen address");
            return ExitCode::FAILURE;
        }
    };

    let config = CollectorConfig::default()
        .with_working_dir(args.dir.clone())
        .with_proc_path(args.proc_path.clone())
        .with_sample_interval(Duration::from_millis(args.sample_ms))
        .with_process_usage(args.process_usage);
    info!(
        version = hoststat_core::VERSION,
        dir = %config.working_dir.display(),
        proc = %config.proc_path,
        sample_ms = args.sample_ms,
        "starting"
    );
    let state = AppState::new(Arc::new(MetricsCollector::new(RealFs::new(), config)));

    let app = build_router(state).into_make_service_with_connect_info::<SocketAddr>();

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(%addr, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    info!("server stopped");
    ExitCode::SUCCESS
}

pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::handle_health))
        .route("/rest/server/statistics", get(handlers::handle_statistics))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl-C; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
