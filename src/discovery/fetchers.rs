use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::settings::WidgetConfig;
use crate::models::errors::FetchError;

/// Performs one authenticated GET against the API and decodes the JSON body.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Value, FetchError>;
}

/// Fetch `path` and deserialize it into `T`. A JSON body of the wrong shape
/// is a [`FetchError::Schema`].
pub async fn fetch_as<T: DeserializeOwned>(
    fetcher: &dyn ResourceFetcher,
    path: &str,
) -> Result<T, FetchError> {
    let value = fetcher.fetch(path).await?;
    serde_json::from_value(value).map_err(FetchError::Schema)
}

/// `ResourceFetcher` backed by reqwest, talking to the configured endpoint.
#[derive(Debug, Clone)]
pub struct ApiFetcher {
    client: Client,
    base_endpoint: String,
    user: String,
    password: Option<String>,
}

impl ApiFetcher {
    pub fn new(config: &WidgetConfig) -> Result<Self, reqwest::Error> {
        let (user, password) = config.basic_auth();
        Ok(Self {
            client: Client::builder().build()?,
            base_endpoint: config.base_endpoint.trim_end_matches('/').to_string(),
            user: user.to_string(),
            password: password.map(str::to_string),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_endpoint, path)
    }
}

#[async_trait]
impl ResourceFetcher for ApiFetcher {
    async fn fetch(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.url_for(path);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.user, self.password.as_ref())
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("GET {url} answered {status}");
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;
        serde_json::from_str(&body).map_err(FetchError::Parse)
    }
}
