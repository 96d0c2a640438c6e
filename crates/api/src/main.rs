//! AgendaFlow - headless dashboard session
//!
//! Loads configuration, loads the meeting list and keeps it reconciled with
//! the backend until Ctrl-C.

use agendaflow_lib::{logging, DashboardContext};
use anyhow::Context;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config first: the log level lives in it
    let config = agendaflow_infra::config::load().context("failed to load configuration")?;
    logging::init_tracing(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "AgendaFlow starting...");

    let ctx = DashboardContext::new(config).context("failed to build dashboard context")?;

    match agendaflow_lib::reload_meetings(&ctx).await {
        Ok(count) => info!(count, "Meetings loaded"),
        Err(err) => warn!(error = %err, "Initial meeting load failed"),
    }

    agendaflow_lib::start_monitoring(&ctx).await?;

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    info!("Shutdown requested");

    ctx.dispose().await?;
    info!(status = ?agendaflow_lib::monitoring_status(&ctx).metrics, "AgendaFlow stopped");
    Ok(())
}
