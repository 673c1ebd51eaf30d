use std::sync::{Arc, Weak};

use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::settings::WidgetConfig;
use crate::discovery::fetchers::ResourceFetcher;
use crate::models::errors::WidgetError;
use crate::models::models::{LoadOutcome, PlayerEvent, WidgetSnapshot};
use crate::service::player::{PlayerHandle, SubscriptionId};
use crate::service::playlist::Playlist;
use crate::service::presenter::{ReadyCallback, VideoPresenter};
use crate::service::view::{WidgetDisplay, WidgetView};

/// Wires the playlist to the presenter: startup, skip/back, and the
/// autoplay chain driven by player events.
pub struct Widget {
    config: WidgetConfig,
    fetcher: Arc<dyn ResourceFetcher>,
    playlist: Mutex<Playlist>,
    view: Arc<WidgetView>,
    presenter: VideoPresenter,
}

impl Widget {
    pub fn new(config: WidgetConfig, fetcher: Arc<dyn ResourceFetcher>) -> Arc<Self> {
        let view = Arc::new(WidgetView::new());
        let presenter =
            VideoPresenter::new(fetcher.clone(), view.clone(), config.discard_stale_loads);
        Arc::new(Self {
            config,
            fetcher,
            playlist: Mutex::new(Playlist::new()),
            view,
            presenter,
        })
    }

    /// Load the playlist, then the first video.
    pub async fn start(self: &Arc<Self>) -> Result<LoadOutcome, WidgetError> {
        let loaded = {
            let mut playlist = self.playlist.lock().await;
            playlist
                .load(self.fetcher.as_ref())
                .await
                .map(|()| playlist.is_empty())
        };

        match loaded {
            Err(e) => {
                let err = WidgetError::from(e);
                error!("Playlist load failed: {err}");
                self.view
                    .show_error(&format!("Error loading media playlist: {err}"));
                Err(err)
            }
            Ok(true) => {
                let err = WidgetError::EmptyPlaylist;
                self.view.show_error(&err.to_string());
                Err(err)
            }
            Ok(false) => {
                self.view.clear_error();
                Ok(self.load_current().await)
            }
        }
    }

    /// Move to the next video and load it.
    pub async fn skip(self: &Arc<Self>) -> LoadOutcome {
        let moved = self.playlist.lock().await.forward();
        self.after_move(moved).await
    }

    /// Move to the previous video and load it.
    pub async fn back(self: &Arc<Self>) -> LoadOutcome {
        let moved = self.playlist.lock().await.back();
        self.after_move(moved).await
    }

    /// Route an event reported by the page to the player it belongs to.
    /// Events for players that have since been replaced are dropped.
    pub fn player_event(&self, player_id: Uuid, event: PlayerEvent) -> bool {
        match self.presenter.active_player() {
            Some(player) if player.id() == player_id => {
                player.emit(event);
                true
            }
            _ => {
                debug!("Ignoring {event} for inactive player {player_id}");
                false
            }
        }
    }

    pub async fn snapshot(&self) -> WidgetSnapshot {
        let regions = self.view.regions();
        let (playlist_index, playlist_length, current_url) = {
            let playlist = self.playlist.lock().await;
            (
                playlist.index(),
                playlist.len(),
                playlist.current().map(str::to_string),
            )
        };
        let player = self.presenter.active_player();

        WidgetSnapshot {
            title: regions.title,
            description: regions.description,
            video_markup: regions.video_markup,
            error: regions.error,
            playlist_index,
            playlist_length,
            current_url,
            player_id: player.as_ref().map(|p| p.id()),
            player_state: player.as_ref().map(|p| p.state()),
            autoplay: self.config.autoplay,
        }
    }

    async fn after_move(self: &Arc<Self>, moved: Result<usize, WidgetError>) -> LoadOutcome {
        match moved {
            Ok(index) => {
                info!("Playlist moved to {index}");
                self.load_current().await
            }
            Err(e) => {
                let never_loaded = !self.playlist.lock().await.is_loaded();
                if never_loaded {
                    info!("Playlist was never loaded, retrying");
                    return self.start().await.unwrap_or(LoadOutcome::Failed);
                }
                warn!("Cannot move playlist: {e}");
                self.view.show_error(&e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    async fn load_current(self: &Arc<Self>) -> LoadOutcome {
        let url = self.playlist.lock().await.current().map(str::to_string);
        self.presenter.load(url, self.autoplay_setup()).await
    }

    /// Ready callback for every load: play on `ready`, then advance on
    /// `ended`. Does nothing when autoplay is off.
    fn autoplay_setup(self: &Arc<Self>) -> ReadyCallback {
        if !self.config.autoplay {
            return Arc::new(|_: PlayerHandle| {});
        }

        let widget: Weak<Self> = Arc::downgrade(self);
        Arc::new(move |player: PlayerHandle| {
            let widget = widget.clone();
            // At most one `ended` binding per player, dropped once it fires.
            let ended: Arc<SyncMutex<Option<SubscriptionId>>> = Arc::new(SyncMutex::new(None));
            player.subscribe(PlayerEvent::Ready, move |player: &PlayerHandle| {
                player.play();
                let mut binding = ended.lock();
                if binding.is_some() {
                    return;
                }
                let widget = widget.clone();
                let fired = Arc::clone(&ended);
                *binding = Some(player.subscribe(PlayerEvent::Ended, move |player| {
                    let Some(id) = fired.lock().take() else {
                        return;
                    };
                    player.unsubscribe(id);
                    if let Some(widget) = widget.upgrade() {
                        tokio::spawn(async move {
                            widget.skip().await;
                        });
                    }
                }));
            });
        })
    }
}
