use tracing::{debug, info};

use crate::discovery::fetchers::{fetch_as, ResourceFetcher};
use crate::discovery::models::MediaListing;
use crate::discovery::parsers::{detail_urls, LISTING_PATH};
use crate::models::errors::{FetchError, WidgetError};

/// Ordered detail URLs with a cursor that wraps at both ends.
#[derive(Debug)]
pub struct Playlist {
    id: String,
    index: usize,
    urls: Vec<String>,
    loaded: bool,
}

impl Playlist {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            index: 0,
            urls: Vec::new(),
            loaded: false,
        }
    }

    /// Replace the sequence with the API's listing and rewind to the first
    /// entry. On error the playlist is left as it was.
    pub async fn load(&mut self, fetcher: &dyn ResourceFetcher) -> Result<(), FetchError> {
        let listing: MediaListing = fetch_as(fetcher, LISTING_PATH).await?;
        self.replace(detail_urls(&listing));
        Ok(())
    }

    pub fn replace(&mut self, urls: Vec<String>) {
        info!("Playlist {} loaded with {} videos", self.id, urls.len());
        self.urls = urls;
        self.index = 0;
        self.loaded = true;
    }

    /// Whether a listing has ever been loaded, even an empty one.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn current(&self) -> Option<&str> {
        self.urls.get(self.index).map(String::as_str)
    }

    /// Advance, wrapping to the first entry after the last.
    pub fn forward(&mut self) -> Result<usize, WidgetError> {
        let count = self.non_empty_len()?;
        self.index = (self.index + 1) % count;
        debug!("Playlist {} forward to {}", self.id, self.index);
        Ok(self.index)
    }

    /// Retreat, wrapping to the last entry before the first.
    pub fn back(&mut self) -> Result<usize, WidgetError> {
        let count = self.non_empty_len()?;
        self.index = (self.index + count - 1) % count;
        debug!("Playlist {} back to {}", self.id, self.index);
        Ok(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    #[cfg(test)]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    fn non_empty_len(&self) -> Result<usize, WidgetError> {
        match self.urls.len() {
            0 => Err(WidgetError::EmptyPlaylist),
            count => Ok(count),
        }
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}
