use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::discovery::models::PlayerElement;
use crate::models::models::{PlayerEvent, PlayerState};

pub type EventHandler = Arc<dyn Fn(&PlayerHandle) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

struct Subscription {
    id: SubscriptionId,
    event: PlayerEvent,
    handler: EventHandler,
}

struct PlayerInner {
    id: Uuid,
    element: PlayerElement,
    state: Mutex<PlayerState>,
    subscriptions: Mutex<Vec<Subscription>>,
}

/// Control and event surface of one embedded player. Clones share the
/// same player.
#[derive(Clone)]
pub struct PlayerHandle {
    inner: Arc<PlayerInner>,
}

impl PlayerHandle {
    pub fn new(element: PlayerElement) -> Self {
        Self {
            inner: Arc::new(PlayerInner {
                id: Uuid::new_v4(),
                element,
                state: Mutex::new(PlayerState::Loading),
                subscriptions: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn element(&self) -> &PlayerElement {
        &self.inner.element
    }

    pub fn state(&self) -> PlayerState {
        *self.inner.state.lock()
    }

    pub fn subscribe<F>(&self, event: PlayerEvent, handler: F) -> SubscriptionId
    where
        F: Fn(&PlayerHandle) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.inner.subscriptions.lock().push(Subscription {
            id,
            event,
            handler: Arc::new(handler),
        });
        id
    }

    /// Returns whether the subscription was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.inner.subscriptions.lock();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    #[cfg(test)]
    pub fn subscription_count(&self, event: PlayerEvent) -> usize {
        self.inner
            .subscriptions
            .lock()
            .iter()
            .filter(|s| s.event == event)
            .count()
    }

    /// Ask the player to start playback.
    pub fn play(&self) {
        info!("Player {} play", self.inner.id);
        *self.inner.state.lock() = PlayerState::Playing;
    }

    /// Deliver an event reported by the player and run its handlers.
    /// Returns how many handlers ran.
    pub fn emit(&self, event: PlayerEvent) -> usize {
        {
            let mut state = self.inner.state.lock();
            *state = match event {
                PlayerEvent::Ready if *state == PlayerState::Loading => PlayerState::Ready,
                PlayerEvent::Ready => *state,
                PlayerEvent::Ended => PlayerState::Ended,
            };
        }

        // Handlers may subscribe further handlers, so run them unlocked.
        let handlers: Vec<EventHandler> = self
            .inner
            .subscriptions
            .lock()
            .iter()
            .filter(|s| s.event == event)
            .map(|s| Arc::clone(&s.handler))
            .collect();

        debug!("Player {} {event}: {} handlers", self.inner.id, handlers.len());
        for handler in &handlers {
            handler(self);
        }
        handlers.len()
    }
}

impl fmt::Debug for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerHandle")
            .field("id", &self.inner.id)
            .field("src", &self.inner.element.src)
            .field("state", &self.state())
            .finish()
    }
}
