use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::handlers::dashboard::render_dashboard;
use crate::models::models::{LoadOutcome, PlayerEvent, WidgetSnapshot};
use crate::service::state::AppState;

/// The widget page.
pub async fn dashboard(State(state): State<AppState>) -> Html<String> {
    Html(render_dashboard(&state.widget.snapshot().await))
}

/// Returns JSON status of the widget.
pub async fn get_status(State(state): State<AppState>) -> Json<WidgetSnapshot> {
    Json(state.widget.snapshot().await)
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub outcome: &'static str,
    pub status: WidgetSnapshot,
}

fn outcome_name(outcome: &LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Skipped => "skipped",
        LoadOutcome::Rendered(_) => "rendered",
        LoadOutcome::Stale => "stale",
        LoadOutcome::Failed => "failed",
    }
}

pub async fn skip(State(state): State<AppState>) -> Json<ActionResponse> {
    let outcome = state.widget.skip().await;
    Json(ActionResponse {
        outcome: outcome_name(&outcome),
        status: state.widget.snapshot().await,
    })
}

pub async fn back(State(state): State<AppState>) -> Json<ActionResponse> {
    let outcome = state.widget.back().await;
    Json(ActionResponse {
        outcome: outcome_name(&outcome),
        status: state.widget.snapshot().await,
    })
}

/// Relay of an event reported by the embedded player on the page.
///
/// Example usage: POST /player/<id>/ended
pub async fn player_event(
    State(state): State<AppState>,
    Path((player_id, event)): Path<(Uuid, String)>,
) -> impl IntoResponse {
    let Ok(event) = event.parse::<PlayerEvent>() else {
        return StatusCode::NOT_FOUND;
    };

    if state.widget.player_event(player_id, event) {
        StatusCode::NO_CONTENT
    } else {
        debug!("{event} for player {player_id} arrived after it was replaced");
        StatusCode::CONFLICT
    }
}
