use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tracing::{error, info, warn};

use crate::config::settings::WidgetConfig;
use crate::discovery::fetchers::ApiFetcher;
use crate::handlers::handlers::{back, dashboard, get_status, player_event, skip};
use crate::service::state::AppState;
use crate::service::widget::Widget;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/status", get(get_status))
        .route("/skip", post(skip))
        .route("/back", post(back))
        .route("/player/{player_id}/{event}", post(player_event))
        .with_state(state)
}

/// Builds the widget, loads the playlist in the background and starts
/// serving. Returns the bound address and the widget.
pub async fn start_axum_server(config: WidgetConfig) -> Result<(String, Arc<Widget>)> {
    let addr = config.listen_address;
    // Bind before spawning so a taken port fails start-up.
    let listener = std::net::TcpListener::bind(addr)
        .with_context(|| format!("binding {addr}"))?;
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;

    info!("Using API at {}", config.base_endpoint);
    let fetcher = ApiFetcher::new(&config).context("building HTTP client")?;
    let widget = Widget::new(config, Arc::new(fetcher));

    let startup = Arc::clone(&widget);
    tokio::spawn(async move {
        if let Err(e) = startup.start().await {
            warn!("Widget started without a video: {e}");
        }
    });

    let app = router(AppState::new(Arc::clone(&widget)));
    info!("Starting server at {addr}");

    tokio::spawn(async move {
        if let Err(e) = axum_server::from_tcp(listener)
            .serve(app.into_make_service())
            .await
        {
            error!("Server stopped: {e}");
        }
    });

    Ok((addr.to_string(), widget))
}
