//! Tenant edge router.
//!
//! Sits in front of the panel frontend and decides, for every request, which
//! tenant it belongs to and whether it may proceed.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ tenant routing ─┬─▶ redirect (307) / reject (404)
//!                                                   │
//!                                                   └─▶ forward (+ X-Tenant) ─▶ panel upstream
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tenant_edge::config::{load_config, ConfigWatcher, EdgeConfig};
use tenant_edge::http::HttpServer;
use tenant_edge::lifecycle::{signals, CancellationToken};
use tenant_edge::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "tenant-edge")]
#[command(about = "Host-based tenant resolution and routing for the panel", long_about = None)]
struct Args {
    /// Path to the TOML configuration file (defaults are used when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload routing rules when the configuration file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("tenant-edge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        root_domain = %config.tenancy.root_domain,
        upstream = %config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher stops when dropped, so it lives until main returns.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = CancellationToken::new();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.clone()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
