use anyhow::Context;
use axum::extract::State;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod api;
mod app_env;
mod db;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routes;
mod routing_utils;

/// Data every request handler has access to
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

pub type AppState = State<Arc<SharedData>>;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if dotenv().is_err() {
        println!("Starting server without .env file.");
    }

    let telemetry = match logging::OtelEndpoints::from_env() {
        Some(endpoints) => Some(logging::Telemetry::connect(&endpoints)?),
        None => None,
    };
    logging::setup_logging_and_tracing(logging::init_env_filter()?, telemetry.as_ref());
    if telemetry.is_none() {
        info!("OpenTelemetry export URLs not set, only logging to stdout");
    }

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("the {} environment variable must be set", app_env::DB_URL))?;
    let sqlx_db_connection = db::connect_sqlx(&db_url).await?;
    db::migrate(&sqlx_db_connection).await?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(sqlx_db_connection),
    });
    let router = routes::build_router(shared_data);

    let server_address = env::var(app_env::SERVER_ADDRESS)
        .unwrap_or_else(|_| app_env::DEFAULT_SERVER_ADDRESS.to_owned());
    let listener = TcpListener::bind(&server_address)
        .await
        .with_context(|| format!("binding to {server_address}"))?;

    info!(address = %server_address, "Starting server");
    let serve_result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running the HTTP server");
    info!("Server stopped");

    if let Some(telemetry) = telemetry {
        telemetry.shutdown();
    }

    serve_result
}

/// Resolves on Ctrl-C or SIGTERM so in-flight requests can finish before the process exits
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
    info!("Shutdown signal received, draining connections");
}
