use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::{
    models::{CreateIndexForModelRequest, IndexList, IndexModel},
    IndexClient, PineconeError,
};

pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
pub const API_VERSION: &str = "2025-01";

/// Control plane client: lists, describes and creates indexes.
#[derive(Clone)]
pub struct PineconeClient {
    http: reqwest::Client,
    api_key: String,
    control_plane_url: String,
}

impl PineconeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            control_plane_url: DEFAULT_CONTROL_PLANE_URL.to_string(),
        }
    }

    /// Creates a client from the environment variable `PINECONE_API_KEY`.
    pub fn from_env() -> Result<Self, PineconeError> {
        std::env::var("PINECONE_API_KEY")
            .map(Self::new)
            .map_err(|_| PineconeError::Unauthorized)
    }

    pub fn with_control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.control_plane_url,
            path.trim_start_matches('/')
        )
    }

    pub async fn list_indexes(&self) -> Result<IndexList, PineconeError> {
        let request = self.http.get(self.url("/indexes"));
        send_json(request, &self.api_key).await
    }

    pub async fn describe_index(&self, name: &str) -> Result<IndexModel, PineconeError> {
        let request = self.http.get(self.url(&format!("/indexes/{}", name)));
        send_json(request, &self.api_key).await
    }

    pub async fn create_index_for_model(
        &self,
        request: &CreateIndexForModelRequest,
    ) -> Result<IndexModel, PineconeError> {
        tracing::info!(index = %request.name, model = %request.embed.model, "Creating index");
        let request = self
            .http
            .post(self.url("/indexes/create-for-model"))
            .json(request);
        send_json(request, &self.api_key).await
    }

    /// Polls `describe_index` until the index reports ready or `timeout` elapses.
    pub async fn wait_until_ready(
        &self,
        name: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<IndexModel, PineconeError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let index = self.describe_index(name).await?;
            if index.status.ready {
                return Ok(index);
            }

            tracing::debug!(index = %name, state = ?index.status.state, "Index not ready yet");
            if tokio::time::Instant::now() + poll_interval > deadline {
                return Err(PineconeError::Timeout(format!(
                    "index '{}' not ready after {}s",
                    name,
                    timeout.as_secs()
                )));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Returns a data plane client for the given index, resolving its host.
    pub async fn index(&self, name: &str) -> Result<IndexClient, PineconeError> {
        let index = self.describe_index(name).await?;
        if index.host.is_empty() {
            return Err(PineconeError::ParsingError(format!(
                "index '{}' has no host",
                name
            )));
        }
        Ok(IndexClient::new(
            self.http.clone(),
            self.api_key.clone(),
            &index.host,
        ))
    }
}

pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    api_key: &str,
) -> Result<reqwest::Response, PineconeError> {
    let resp = request
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
        .send()
        .await
        .map_err(|e| PineconeError::ResponseError(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(PineconeError::from_status(status, body));
    }

    Ok(resp)
}

pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    api_key: &str,
) -> Result<T, PineconeError> {
    send(request, api_key).await?.json::<T>().await.map_err(|e| {
        PineconeError::ParsingError(format!("Failed to parse response as JSON: {}", e))
    })
}
