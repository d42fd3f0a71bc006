mod api;
mod catalog;
mod config;
mod error;
mod generator;
mod state;
mod types;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::state::CompanyStore;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Company directory ---
    let companies = CompanyStore::new();
    companies.add_companies(catalog::companies());
    info!("Loaded {} companies", companies.len());

    match cfg.rng_seed {
        Some(seed) => info!(seed, "Synthetic data seeded: responses are reproducible for this run"),
        None => info!("Synthetic data seeded from entropy"),
    }
    if !cfg.simulate_latency {
        warn!("SIMULATE_LATENCY=false: responses are returned without the simulated delay");
    }
    info!(max_history_days = cfg.max_history_days, "History window ceiling");

    // --- HTTP API server ---
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let app = router(ApiState::new(cfg, companies));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
