use scraper::{Html, Selector};

use crate::discovery::models::{MediaListing, PlayerElement};

/// Path of the media listing on the API.
pub const LISTING_PATH: &str = "/api2/media";

/// Query that asks the detail endpoint to join the embed code.
pub const EMBED_JOIN_QUERY: &str = "joins=embedcode";

/// Turns a listing into detail URLs, one per item, in listing order.
pub fn detail_urls(listing: &MediaListing) -> Vec<String> {
    listing
        .items
        .iter()
        .map(|item| with_embed_join(&item.links.self_link))
        .collect()
}

/// Appends the embed-code join to a self-link, keeping any query it
/// already carries.
pub fn with_embed_join(self_link: &str) -> String {
    let separator = if self_link.contains('?') { '&' } else { '?' };
    format!("{self_link}{separator}{EMBED_JOIN_QUERY}")
}

/// Locates the first `<iframe>` in embed markup.
pub fn find_player_element(embed_markup: &str) -> Option<PlayerElement> {
    let fragment = Html::parse_fragment(embed_markup);
    let selector = Selector::parse("iframe").ok()?;
    let iframe = fragment.select(&selector).next()?;

    Some(PlayerElement {
        markup: iframe.html(),
        src: iframe.value().attr("src").map(str::to_string),
    })
}
