use serde::{Deserialize, Serialize};

/// Body of `GET /api2/media`.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaListing {
    pub items: Vec<MediaItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    pub links: MediaLinks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaLinks {
    /// API-relative URL of the item itself.
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Body of `GET <self>?joins=embedcode`, as the API sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoDetailsPayload {
    pub title: String,
    pub description_plain: String,
    pub joins: VideoJoins,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoJoins {
    pub embedcode: EmbedCode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedCode {
    pub html: String,
}

/// What the presenter needs to render one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
    pub embed_markup: String,
}

impl From<VideoDetailsPayload> for VideoDetails {
    fn from(payload: VideoDetailsPayload) -> Self {
        Self {
            title: payload.title,
            description: payload.description_plain,
            embed_markup: payload.joins.embedcode.html,
        }
    }
}

/// The embeddable player element located inside embed markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerElement {
    /// Outer HTML of the element.
    pub markup: String,
    pub src: Option<String>,
}
