use std::{
    fs::OpenOptions,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    process::exit,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use ledgr::{
    AppState,
    backend::{BackendConfig, HostedBackend},
    build_router, get_local_offset, graceful_shutdown,
};

/// The web server for Ledgr.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the hosted backend, e.g. "https://example.supabase.co".
    #[arg(long, env = "LEDGR_BACKEND_URL")]
    backend_url: String,

    /// The public API key sent with every request to the hosted backend.
    #[arg(long, env = "LEDGR_BACKEND_KEY", hide_env_values = true)]
    backend_key: String,

    /// The port to serve the app from.
    #[arg(short, long, env = "LEDGR_PORT", default_value_t = 3000)]
    port: u16,

    /// The address to listen on.
    #[arg(long, env = "LEDGR_ADDRESS", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    address: IpAddr,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, env = "LEDGR_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    /// Where to keep the signed-in session between restarts.
    ///
    /// If not set, the session only lives as long as the server.
    #[arg(long, env = "LEDGR_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Where to write debug logs, in addition to stdout.
    #[arg(long, env = "LEDGR_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(args.log_file.as_deref());

    if get_local_offset(&args.timezone).is_none() {
        tracing::error!(
            "Invalid timezone \"{}\", expected a canonical timezone name such as \"Pacific/Auckland\"",
            args.timezone
        );
        exit(1);
    }

    let backend = match HostedBackend::new(BackendConfig {
        url: args.backend_url,
        api_key: args.backend_key,
        session_file: args.session_file,
    })
    .await
    {
        Ok(backend) => backend,
        Err(error) => {
            tracing::error!("Could not create the backend client: {error}");
            exit(1);
        }
    };

    let state = AppState::new(Arc::new(backend), &args.timezone);
    let session = state.session.clone();

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::new(args.address, args.port);
    tracing::info!("HTTP server listening on {}", addr);

    let result = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await;

    session.teardown();

    if let Err(error) = result {
        tracing::error!("Server stopped with an error: {error}");
        exit(1);
    }
}

fn setup_logging(log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(env_filter);

    let debug_log = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(filter::LevelFilter::DEBUG),
            ),
            Err(error) => {
                eprintln!("Could not open log file {}: {error}", path.display());
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged by the handlers, so the default 5xx logging would
        // only duplicate them.
        .on_failure(());

    router.layer(tracing_layer)
}
