// src/main.rs
//! Gopher Farm
//!
//! Usage: `gopher-farm [CONFIG]`. Without a path the roster comes from
//! `FARM_CONFIG`, or the built-in sample when that is unset too.

use anyhow::Result;
use gopher_farm::observability::init_tracing;
use gopher_farm::runtime::{Coordinator, FoodPool};
use gopher_farm::utils::config::FarmConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {:#}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting Gopher Farm v{}", env!("CARGO_PKG_VERSION"));

    // Fatal errors are reported once, through the subscriber
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Simulation aborted: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("FARM_CONFIG"))
        .map(PathBuf::from);

    // Load configuration before anything is spawned
    let config = FarmConfig::load(path.as_deref())?;
    info!(
        gophers = config.gophers.len(),
        total_food = config.total_food,
        "Configuration loaded"
    );

    let pool = Arc::new(FoodPool::new(config.total_food));
    let mut coordinator = Coordinator::new(config.roster(), pool);
    if let Some(deadline) = config.simulation.deadline() {
        coordinator = coordinator.with_deadline(deadline);
    }

    let outcome = coordinator.run().await?;
    info!(
        run_id = %outcome.run_id,
        reports = outcome.reports.len(),
        consumed = outcome.pool.consumed,
        remaining = outcome.pool.remaining_food,
        "Simulation finished"
    );

    Ok(())
}
