use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::discovery::fetchers::{fetch_as, ResourceFetcher};
use crate::discovery::models::{VideoDetails, VideoDetailsPayload};
use crate::discovery::parsers::find_player_element;
use crate::models::errors::WidgetError;
use crate::models::models::{LoadOutcome, LoadToken};
use crate::service::player::PlayerHandle;
use crate::service::view::WidgetDisplay;

pub type ReadyCallback = Arc<dyn Fn(PlayerHandle) + Send + Sync>;

/// Loads one video at a time into the display and hands out its player.
pub struct VideoPresenter {
    fetcher: Arc<dyn ResourceFetcher>,
    display: Arc<dyn WidgetDisplay>,
    active: Mutex<Option<PlayerHandle>>,
    latest_token: AtomicU64,
    discard_stale_loads: bool,
}

impl VideoPresenter {
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        display: Arc<dyn WidgetDisplay>,
        discard_stale_loads: bool,
    ) -> Self {
        Self {
            fetcher,
            display,
            active: Mutex::new(None),
            latest_token: AtomicU64::new(0),
            discard_stale_loads,
        }
    }

    /// Fetch the video behind `url`, render it, and pass its player to
    /// `on_ready`. A missing `url` does nothing.
    pub async fn load(&self, url: Option<String>, on_ready: ReadyCallback) -> LoadOutcome {
        let Some(url) = url else {
            debug!("No video to load");
            return LoadOutcome::Skipped;
        };

        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Load #{token}: {url}");
        let fetched = fetch_as::<VideoDetailsPayload>(self.fetcher.as_ref(), &url).await;

        if self.is_stale(token) {
            info!("Load #{token} superseded, discarding response for {url}");
            return LoadOutcome::Stale;
        }

        let details = match fetched {
            Ok(payload) => VideoDetails::from(payload),
            Err(e) => {
                self.fail(WidgetError::from(e));
                return LoadOutcome::Failed;
            }
        };

        self.display.set_title(&details.title);
        self.display.set_description(&details.description);
        self.display.set_video_markup(&details.embed_markup);

        let Some(element) = find_player_element(&details.embed_markup) else {
            self.fail(WidgetError::MissingPlayerElement);
            return LoadOutcome::Failed;
        };

        let player = PlayerHandle::new(element);
        *self.active.lock() = Some(player.clone());
        self.display.clear_error();
        info!(
            "Load #{token} rendered \"{}\" as player {} ({})",
            details.title,
            player.id(),
            player.element().src.as_deref().unwrap_or("no src")
        );

        let id = player.id();
        on_ready(player);
        LoadOutcome::Rendered(id)
    }

    /// The player of the most recently rendered video.
    pub fn active_player(&self) -> Option<PlayerHandle> {
        self.active.lock().clone()
    }

    pub fn latest_token(&self) -> LoadToken {
        self.latest_token.load(Ordering::SeqCst)
    }

    fn is_stale(&self, token: LoadToken) -> bool {
        self.discard_stale_loads && token != self.latest_token()
    }

    /// The previous player is superseded even when this load fails, so its
    /// events no longer count.
    fn fail(&self, error: WidgetError) {
        *self.active.lock() = None;
        self.display.show_error(&format!("Error loading video: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::FetchError;
    use crate::service::testing::{detail, ScriptedFetcher};
    use crate::service::view::WidgetView;
    use std::sync::atomic::AtomicUsize;

    struct Fixture {
        fetcher: Arc<ScriptedFetcher>,
        view: Arc<WidgetView>,
        presenter: Arc<VideoPresenter>,
    }

    fn fixture(discard_stale_loads: bool) -> Fixture {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let view = Arc::new(WidgetView::new());
        let presenter = Arc::new(VideoPresenter::new(
            fetcher.clone(),
            view.clone(),
            discard_stale_loads,
        ));
        Fixture {
            fetcher,
            view,
            presenter,
        }
    }

    fn counting_callback() -> (ReadyCallback, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let callback: ReadyCallback = Arc::new(move |_: PlayerHandle| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (callback, calls)
    }

    #[tokio::test]
    async fn missing_url_is_a_no_op() {
        let f = fixture(true);
        let (callback, calls) = counting_callback();

        assert_eq!(f.presenter.load(None, callback).await, LoadOutcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(f.fetcher.requests().is_empty());
        assert_eq!(f.view.regions(), Default::default());
    }

    #[tokio::test]
    async fn renders_details_and_builds_player() {
        let f = fixture(true);
        f.view.show_error("stale error");
        f.fetcher
            .respond("/v?joins=embedcode", Ok(detail("T", "D", "<iframe></iframe>")));
        let (callback, calls) = counting_callback();

        let outcome = f
            .presenter
            .load(Some("/v?joins=embedcode".into()), callback)
            .await;

        let player = f.presenter.active_player().unwrap();
        assert_eq!(outcome, LoadOutcome::Rendered(player.id()));
        assert_eq!(player.element().markup, "<iframe></iframe>");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let regions = f.view.regions();
        assert_eq!(regions.title, "T");
        assert_eq!(regions.description, "D");
        assert_eq!(regions.video_markup, "<iframe></iframe>");
        assert_eq!(regions.error, None);
    }

    #[tokio::test]
    async fn fetch_failure_goes_to_error_channel() {
        let f = fixture(true);
        f.fetcher
            .respond("/v?joins=embedcode", Err(FetchError::Http { status: 500 }));
        let (callback, calls) = counting_callback();

        let outcome = f
            .presenter
            .load(Some("/v?joins=embedcode".into()), callback)
            .await;

        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let error = f.view.regions().error.unwrap();
        assert!(error.starts_with("Error loading video"));
        assert!(error.contains("500"));
    }

    #[tokio::test]
    async fn incomplete_details_are_schema_errors() {
        let f = fixture(true);
        f.fetcher.respond(
            "/v",
            Ok(serde_json::json!({ "title": "T", "description_plain": "D" })),
        );
        let (callback, calls) = counting_callback();

        assert_eq!(
            f.presenter.load(Some("/v".into()), callback).await,
            LoadOutcome::Failed
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(f.view.regions().error.unwrap().contains("Unexpected response shape"));
        assert_eq!(f.view.regions().title, "");
    }

    #[tokio::test]
    async fn embed_without_iframe_is_reported() {
        let f = fixture(true);
        f.fetcher.respond("/v", Ok(detail("T", "D", "<p>no player</p>")));
        let (callback, calls) = counting_callback();

        assert_eq!(
            f.presenter.load(Some("/v".into()), callback).await,
            LoadOutcome::Failed
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(f.presenter.active_player().is_none());
        assert!(f.view.regions().error.unwrap().contains("player element"));
    }

    #[tokio::test]
    async fn failed_load_retires_previous_player() {
        let f = fixture(true);
        f.fetcher.respond("/ok", Ok(detail("T", "D", "<iframe></iframe>")));
        f.fetcher.respond("/broken", Ok(detail("U", "E", "<p>no player</p>")));
        f.fetcher.respond("/down", Err(FetchError::Http { status: 503 }));
        let (callback, _) = counting_callback();

        f.presenter.load(Some("/ok".into()), Arc::clone(&callback)).await;
        assert!(f.presenter.active_player().is_some());
        f.presenter.load(Some("/broken".into()), Arc::clone(&callback)).await;
        assert!(f.presenter.active_player().is_none());

        f.fetcher.respond("/ok", Ok(detail("T", "D", "<iframe></iframe>")));
        f.presenter.load(Some("/ok".into()), Arc::clone(&callback)).await;
        f.presenter.load(Some("/down".into()), callback).await;
        assert!(f.presenter.active_player().is_none());
    }

    /// Starts loads of `/a` then `/b`, lets `/b` resolve before `/a`.
    async fn overlapping_loads(f: &Fixture) -> (LoadOutcome, LoadOutcome) {
        let gate_a = f.fetcher.gate("/a");
        let gate_b = f.fetcher.gate("/b");
        let (callback, _) = counting_callback();

        let presenter = Arc::clone(&f.presenter);
        let cb = Arc::clone(&callback);
        let load_a = tokio::spawn(async move { presenter.load(Some("/a".into()), cb).await });
        f.fetcher.wait_for_requests(1).await;

        let presenter = Arc::clone(&f.presenter);
        let load_b = tokio::spawn(async move { presenter.load(Some("/b".into()), callback).await });
        f.fetcher.wait_for_requests(2).await;

        gate_b
            .send(Ok(detail("B", "second", "<iframe src=\"b\"></iframe>")))
            .unwrap();
        let outcome_b = load_b.await.unwrap();

        gate_a
            .send(Ok(detail("A", "first", "<iframe src=\"a\"></iframe>")))
            .unwrap();
        let outcome_a = load_a.await.unwrap();

        (outcome_a, outcome_b)
    }

    #[tokio::test]
    async fn stale_responses_are_discarded() {
        let f = fixture(true);
        let (outcome_a, outcome_b) = overlapping_loads(&f).await;

        assert_eq!(outcome_a, LoadOutcome::Stale);
        assert!(matches!(outcome_b, LoadOutcome::Rendered(_)));
        assert_eq!(f.view.regions().title, "B");
        assert_eq!(
            f.presenter.active_player().unwrap().element().src.as_deref(),
            Some("b")
        );
    }

    #[tokio::test]
    async fn without_discarding_last_response_wins() {
        let f = fixture(false);
        let (outcome_a, outcome_b) = overlapping_loads(&f).await;

        assert!(matches!(outcome_a, LoadOutcome::Rendered(_)));
        assert!(matches!(outcome_b, LoadOutcome::Rendered(_)));
        assert_eq!(f.view.regions().title, "A");
        assert_eq!(
            f.presenter.active_player().unwrap().element().src.as_deref(),
            Some("a")
        );
    }
}
