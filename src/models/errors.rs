use thiserror::Error;

/// Failures produced by a single resource fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: DNS, refused connection, interrupted body.
    #[error("Failed to load URL: {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with anything other than 200.
    #[error("Failed to load, HTTP code {status}")]
    Http { status: u16 },

    /// The body of a 200 response was not JSON.
    #[error("Malformed JSON response: {0}")]
    Parse(#[source] serde_json::Error),

    /// The body was JSON but did not have the expected shape.
    #[error("Unexpected response shape: {0}")]
    Schema(#[source] serde_json::Error),
}

impl FetchError {
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// Errors surfaced through the widget's error channel.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("The playlist is empty")]
    EmptyPlaylist,

    #[error("Embed markup does not contain a player element")]
    MissingPlayerElement,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: not an http(s) URL: {value}")]
    InvalidEndpoint { name: &'static str, value: String },

    #[error("{name}: expected user:password, got an empty credential")]
    EmptyCredential { name: &'static str },

    #[error("{name}: not a boolean: {value}")]
    InvalidBool { name: &'static str, value: String },

    #[error("{name}: not a socket address: {value}")]
    InvalidAddress { name: &'static str, value: String },
}
