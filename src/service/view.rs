use parking_lot::RwLock;
use tracing::warn;

/// The display regions a presenter writes to, plus the shared error
/// channel.
pub trait WidgetDisplay: Send + Sync {
    /// Plain text; never interpreted as markup.
    fn set_title(&self, text: &str);
    /// Plain text; never interpreted as markup.
    fn set_description(&self, text: &str);
    /// Trusted embed markup, rendered as HTML.
    fn set_video_markup(&self, markup: &str);
    fn show_error(&self, message: &str);
    fn clear_error(&self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRegions {
    pub title: String,
    pub description: String,
    pub video_markup: String,
    pub error: Option<String>,
}

/// In-memory display rendered by the dashboard.
#[derive(Debug, Default)]
pub struct WidgetView {
    regions: RwLock<ViewRegions>,
}

impl WidgetView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> ViewRegions {
        self.regions.read().clone()
    }
}

impl WidgetDisplay for WidgetView {
    fn set_title(&self, text: &str) {
        self.regions.write().title = text.to_string();
    }

    fn set_description(&self, text: &str) {
        self.regions.write().description = text.to_string();
    }

    fn set_video_markup(&self, markup: &str) {
        self.regions.write().video_markup = markup.to_string();
    }

    fn show_error(&self, message: &str) {
        warn!("{message}");
        self.regions.write().error = Some(message.to_string());
    }

    fn clear_error(&self) {
        self.regions.write().error = None;
    }
}
