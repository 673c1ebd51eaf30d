use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sequence number handed out to every video load.
pub type LoadToken = u64;

/// Lifecycle events an embedded player reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerEvent {
    Ready,
    Ended,
}

impl PlayerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerEvent::Ready => "ready",
            PlayerEvent::Ended => "ended",
        }
    }
}

impl fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(PlayerEvent::Ready),
            "ended" => Ok(PlayerEvent::Ended),
            other => Err(format!("unknown player event: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Embedded, waiting for the player to report `ready`.
    Loading,
    Ready,
    Playing,
    Ended,
}

/// What a single presenter load ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No URL to load; nothing was fetched.
    Skipped,
    /// Rendered and handed the player with this id to the ready callback.
    Rendered(Uuid),
    /// A newer load was issued while this one was in flight.
    Stale,
    /// The error channel shows why.
    Failed,
}

/// JSON view of the widget, served by `/status`.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSnapshot {
    pub title: String,
    pub description: String,
    pub video_markup: String,
    pub error: Option<String>,
    pub playlist_index: usize,
    pub playlist_length: usize,
    pub current_url: Option<String>,
    pub player_id: Option<Uuid>,
    pub player_state: Option<PlayerState>,
    pub autoplay: bool,
}
