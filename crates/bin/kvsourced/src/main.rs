//! # kvsourced: kvsource daemon
//!
//! Composition root that wires all adapters together and runs the datasource
//! lifecycle.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialise logging
//! - Construct the storage engine, event bus, registry and services,
//!   injecting adapters via port traits
//! - Run the startup sweep (eager datasources)
//! - Serve the monitoring API until SIGTERM/SIGINT
//! - Run the shutdown sweep and purge delete-on-exit files
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use kvsource_adapter_http_axum::router;
use kvsource_adapter_http_axum::state::AppState;
use kvsource_adapter_storage_sqlite_sqlx::{SqliteEngine, SqliteKvStore};
use kvsource_app::deletion::DeleteOnExit;
use kvsource_app::event_bus::InProcessEventBus;
use kvsource_app::monitor::DatasourceMonitor;
use kvsource_app::ports::{ConfigResolver, ConnectionHandle, EventPublisher, StorageEngine};
use kvsource_app::registry::ConnectionRegistry;
use kvsource_app::services::connection_factory::ConnectionFactory;
use kvsource_app::services::connection_handler::ConnectionHandler;
use kvsource_app::services::lifecycle::LifecycleCoordinator;
use kvsource_domain::event::Event;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let resolver = config.resolver()?;
    let working_dir = std::env::current_dir()?;

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::<SqliteKvStore>::new(256));
    tokio::spawn(log_events(event_bus.subscribe()));

    // Services
    let deletions = Arc::new(DeleteOnExit::new());
    let factory = Arc::new(ConnectionFactory::new(
        SqliteEngine::new(),
        Arc::clone(&event_bus),
        Arc::clone(&deletions),
        working_dir,
    ));
    let registry = Arc::new(ConnectionRegistry::new());
    let handler = Arc::new(ConnectionHandler::new(
        factory,
        Arc::clone(&registry),
        resolver,
    ));
    let lifecycle = LifecycleCoordinator::new(handler);
    let monitor = DatasourceMonitor::new(registry);

    run(&lifecycle, &deletions, serve(&config, monitor)).await
}

/// Run the startup sweep, then `serve` until it returns.
///
/// The shutdown sweep and the delete-on-exit purge run whether `serve`
/// succeeded or not; its error is reported afterwards.
async fn run<E, P, C>(
    lifecycle: &LifecycleCoordinator<E, P, C>,
    deletions: &DeleteOnExit,
    serve: impl Future<Output = std::io::Result<()>>,
) -> Result<(), Box<dyn std::error::Error>>
where
    E: StorageEngine,
    P: EventPublisher<E::Handle>,
    C: ConfigResolver,
{
    let startup = lifecycle.on_startup().await;
    if !startup.is_success() {
        tracing::warn!(
            failed = startup.failures.len(),
            "some datasources failed to open at startup"
        );
    }

    let served = serve.await;
    if let Err(err) = &served {
        tracing::error!(error = %err, "monitoring server failed");
    }

    let report = lifecycle.on_shutdown().await;
    let purged = deletions.purge();
    tracing::info!(purged, "kvsourced stopped");

    served?;
    report.into_result()?;
    Ok(())
}

/// Serve the monitoring API until a shutdown signal arrives, or just wait
/// for the signal when the server is disabled.
async fn serve<H: ConnectionHandle>(
    config: &Config,
    monitor: DatasourceMonitor<H>,
) -> std::io::Result<()> {
    if !config.server.enabled {
        tracing::info!(open = monitor.size(), "kvsourced running without monitoring");
        shutdown_signal().await;
        return Ok(());
    }

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("kvsourced monitoring on http://{bind_addr}");
    axum::serve(listener, router::build(AppState::new(monitor)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Log every lifecycle notification published on the bus.
async fn log_events<H: Clone>(mut events: broadcast::Receiver<Event<H>>) {
    loop {
        match events.recv().await {
            Ok(event) => tracing::debug!(
                id = %event.id,
                kind = event.kind.label(),
                datasource = %event.kind.name(),
                "datasource event"
            ),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event logger fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
