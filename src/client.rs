use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{Level, event, instrument};

use crate::error::{ContentError, Result};

/// Thin JSON-over-HTTP wrapper shared by the HTTP content source.
#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
}

impl Client {
    pub fn default() -> Self {
        Client {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Client {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    #[instrument(level = "debug", skip(self, url), fields(url = %url))]
    pub async fn get<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound(url.path().to_string()));
        }
        if !status.is_success() {
            event!(Level::WARN, status = status.as_u16(), "content service returned an error");
            return Err(ContentError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let text = response.text().await?;
        event!(Level::TRACE, response = %text);

        Ok(serde_json::from_str::<T>(&text)?)
    }
}
