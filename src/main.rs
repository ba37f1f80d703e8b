//! `logspec` daemon.
//!
//! Applies a TOML logging config to the process-wide facility, bridges
//! `tracing` into it, and serves the admin API so the level spec can be
//! changed while the process runs.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use logspec::admin::{self, AdminState};
use logspec::config::watcher::ConfigWatcher;
use logspec::config::{load_config, ServiceConfig};
use logspec::lifecycle::{shutdown_signal, ReloadSignal};
use logspec::observability::logging::init_tracing;
use logspec::observability::metrics::init_metrics;
use logspec::observability::{MetricsObserver, MetricsProvider};
use logspec::{fields, Logging};

#[derive(Parser)]
#[command(name = "logspec")]
#[command(about = "Logging facility daemon with a runtime level-spec admin API", long_about = None)]
struct Args {
    /// Path to the TOML config file. Defaults are used when it does not exist.
    #[arg(short, long, default_value = "logspec.toml")]
    config: PathBuf,

    /// Level spec overriding `logging.level_spec`.
    #[arg(long)]
    spec: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_exists = args.config.exists();
    let config = if config_exists {
        load_config(&args.config)?
    } else {
        ServiceConfig::default()
    };

    let logging = logspec::global().clone();
    logging.apply(&config.logging)?;
    if let Some(spec) = &args.spec {
        logging.activate_spec(spec)?;
    }
    init_tracing(&logging)?;

    let log = logging.logger("logspec.daemon");
    log.infow(
        concat!("logspec v", env!("CARGO_PKG_VERSION"), " starting"),
        &fields![
            "config" => args.config.display().to_string(),
            "config_found" => config_exists,
            "spec" => logging.spec(),
        ],
    );

    if config.metrics.enabled {
        let addr = config.metrics.bind_address.parse()?;
        init_metrics(addr)?;
        logging.set_observer(Some(Arc::new(MetricsObserver::new(&MetricsProvider))));
    }

    let (watcher, updates) = ConfigWatcher::new(&args.config);
    let _watcher = if config_exists {
        match watcher.run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "Config watcher unavailable, SIGHUP reload only");
                None
            }
        }
    } else {
        None
    };

    let reload = ReloadSignal::new()?;
    tokio::spawn(reload_loop(logging.clone(), args.config.clone(), updates, reload));

    if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %listener.local_addr()?, "Admin API listening");

        let state = AdminState::new(logging.clone(), config.admin.api_key.as_deref());
        axum::serve(listener, admin::router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        shutdown_signal().await;
    }

    log.info(&[&"Shutdown complete"]);
    logging.sync()?;
    Ok(())
}

/// Apply configs from the file watcher and from SIGHUP until both sources end.
async fn reload_loop(
    logging: Logging,
    path: PathBuf,
    mut updates: tokio::sync::mpsc::UnboundedReceiver<ServiceConfig>,
    mut reload: ReloadSignal,
) {
    loop {
        tokio::select! {
            Some(config) = updates.recv() => apply_reload(&logging, &config),
            Some(()) = reload.recv() => {
                tracing::info!(path = %path.display(), "Received SIGHUP, reloading config");
                match load_config(&path) {
                    Ok(config) => apply_reload(&logging, &config),
                    Err(e) => tracing::error!(error = %e, "Rejected config reload, keeping current configuration"),
                }
            }
            else => break,
        }
    }
}

fn apply_reload(logging: &Logging, config: &ServiceConfig) {
    match logging.apply(&config.logging) {
        Ok(()) => tracing::info!(spec = %logging.spec(), "Logging config reloaded"),
        Err(e) => tracing::error!(error = %e, "Failed to apply reloaded config"),
    }
}
