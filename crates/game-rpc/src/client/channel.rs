//! JSON-over-HTTP channel to one remote address

use crate::error::{RpcError, RpcResult};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Upper bound on any single request; callers normally apply tighter deadlines
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connections kept per host
const POOL_IDLE_PER_HOST: usize = 16;

/// A lazily connecting HTTP client bound to one base URL
#[derive(Debug, Clone)]
pub struct HttpChannel {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChannel {
    /// Build a channel for `address` (`host:port` or a full `http://` URL).
    ///
    /// No connection is opened here.
    pub fn connect(address: &str) -> RpcResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(POOL_IDLE_PER_HOST)
            .build()
            .map_err(|e| RpcError::dial(address, e))?;
        Self::with_client(address, client)
    }

    /// Build a channel sharing an existing `reqwest::Client`
    pub fn with_client(address: &str, client: reqwest::Client) -> RpcResult<Self> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(RpcError::dial(address, "empty address"));
        }

        let base_url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.trim_end_matches('/').to_string()
        } else {
            format!("http://{trimmed}")
        };
        reqwest::Url::parse(&base_url).map_err(|e| RpcError::dial(address, e))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` as JSON and decode the JSON reply. A 404 is `RpcError::NotFound`.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> RpcResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.post_json_optional(path, body)
            .await?
            .ok_or_else(|| RpcError::NotFound(format!("{}{path}", self.base_url)))
    }

    /// Like [`post_json`](Self::post_json) but a 404 is `Ok(None)`
    pub async fn post_json_optional<B, R>(&self, path: &str, body: &B) -> RpcResult<Option<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decoded = response
            .json::<R>()
            .await
            .map_err(|e| RpcError::Decode(e.to_string()))?;
        Ok(Some(decoded))
    }
}
