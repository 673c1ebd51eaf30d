//! Scripted stand-ins for the API, shared by the service tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::discovery::fetchers::ResourceFetcher;
use crate::models::errors::FetchError;

type Reply = Result<Value, FetchError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Answers fetches from per-path queues. Paths with nothing queued fall
/// back to their sticky response, then to a 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    queued: Mutex<HashMap<String, VecDeque<Scripted>>>,
    sticky: Mutex<HashMap<String, Value>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one reply for `path`.
    pub fn respond(&self, path: &str, reply: Reply) {
        self.queued
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(Scripted::Ready(reply));
    }

    /// Answer every otherwise unscripted fetch of `path` with `value`.
    pub fn respond_always(&self, path: &str, value: Value) {
        self.sticky.lock().insert(path.to_string(), value);
    }

    /// Queue a reply for `path` that is only delivered once the returned
    /// sender fires.
    pub fn gate(&self, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.queued
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(Scripted::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Yield until at least `count` fetches have been issued.
    pub async fn wait_for_requests(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.requests.lock().len() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("fetches were never issued");
    }
}

#[async_trait]
impl ResourceFetcher for ScriptedFetcher {
    async fn fetch(&self, path: &str) -> Result<Value, FetchError> {
        self.requests.lock().push(path.to_string());
        let next = self
            .queued
            .lock()
            .get_mut(path)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx.await.unwrap_or(Err(FetchError::Http { status: 499 })),
            None => match self.sticky.lock().get(path) {
                Some(value) => Ok(value.clone()),
                None => Err(FetchError::Http { status: 404 }),
            },
        }
    }
}

/// A detail response as the API sends it.
pub fn detail(title: &str, description: &str, embed: &str) -> Value {
    json!({
        "title": title,
        "description_plain": description,
        "joins": { "embedcode": { "html": embed } }
    })
}

/// A listing whose items link to `links`.
pub fn listing(links: &[&str]) -> Value {
    let items: Vec<Value> = links
        .iter()
        .map(|link| json!({ "links": { "self": link } }))
        .collect();
    json!({ "items": items })
}
