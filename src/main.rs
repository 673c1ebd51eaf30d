mod config;
mod discovery;
mod handlers;
mod main_axum;
mod models;
mod service;
mod utils;

use anyhow::Result;
use tracing::info;

use crate::config::settings::WidgetConfig;
use crate::main_axum::start_axum_server;
use crate::utils::log::init_logger_once;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger_once();

    let config = WidgetConfig::from_env()?;
    let (addr, _widget) = start_axum_server(config).await?;
    info!("Listening on http://{}", addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}
