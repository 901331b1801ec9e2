use async_trait::async_trait;
use bytes::Bytes;

use crate::{FetchConfig, MediaError, MediaResult};

/// Plain HTTP GET used to reach remote providers
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Fetch the full body at `url`; non-success statuses are errors
    async fn get(&self, url: &str) -> MediaResult<Bytes>;
}

/// [`HttpFetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(config: &FetchConfig) -> MediaResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|e| MediaError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    #[tracing::instrument(skip(self))]
    async fn get(&self, url: &str) -> MediaResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MediaError::retrieval_with(url, "request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::retrieval(
                url,
                format!("unexpected status {}", status),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MediaError::retrieval_with(url, "failed to read response body", e))?;

        tracing::debug!(size = body.len(), "Fetched remote content");
        Ok(body)
    }
}

/// GET `url` and decode the body as a JSON object
pub async fn fetch_json(
    fetcher: &dyn HttpFetcher,
    url: &str,
) -> MediaResult<serde_json::Map<String, serde_json::Value>> {
    let body = fetcher
        .get(url)
        .await
        .map_err(|e| match e {
            MediaError::Retrieval { source, .. } => MediaError::Retrieval {
                url: url.to_string(),
                message: "unable to retrieve video information".to_string(),
                source,
            },
            other => other,
        })?;

    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(serde_json::Value::Object(map)) if !map.is_empty() => Ok(map),
        Ok(_) => Err(MediaError::retrieval(url, "unable to decode video information")),
        Err(e) => Err(MediaError::retrieval_with(
            url,
            "unable to decode video information",
            e,
        )),
    }
}
