mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use pragma_common::telemetry::init_telemetry;
use tokio_util::sync::CancellationToken;

use daytrade_api::{ApiService, AppState};
use daytrade_db::{init_pool, run_migrations};
use daytrade_metrics::MetricsRegistry;

use crate::cli::JournalCli;

const APP_NAME: &str = "daytrade_journal";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let JournalCli {
        database_url,
        database_max_connections,
        api_host,
        api_port,
        otel_collector_endpoint,
        openapi_output_dir,
    } = JournalCli::parse();

    // Installs the tracing subscriber and the global meter provider the
    // journal counters report to.
    init_telemetry(APP_NAME, otel_collector_endpoint)
        .map_err(|e| anyhow::anyhow!("Could not init telemetry: {e}"))?;

    let pool = init_pool(&database_url, database_max_connections)
        .context("Could not build the database pool")?;
    run_migrations(&pool)
        .await
        .context("Could not apply database migrations")?;

    let app_state = AppState {
        pool,
        metrics: MetricsRegistry::new(),
    };

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                signal_token.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Could not listen for the shutdown signal"),
        }
    });

    ApiService::new(app_state, &api_host, api_port)
        .with_openapi_output(openapi_output_dir)
        .run(shutdown)
        .await
}
