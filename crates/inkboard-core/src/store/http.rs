//! Remote store over the `/canvas` HTTP endpoints.

use super::{
    BoxFuture, CanvasFile, CanvasStore, CreateRequest, FileId, StoreError, StoreResult,
    UpdateRequest, validate_name,
};
use crate::config::Config;
use crate::shapes::Element;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// `{ success, data }` response wrapper.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// Servers answer either with the envelope or with the bare payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope(Envelope<T>),
    Bare(T),
}

fn decode<T: DeserializeOwned>(body: &str) -> StoreResult<T> {
    let payload: Payload<T> = serde_json::from_str(body)
        .map_err(|e| StoreError::Serialization(format!("Failed to parse response: {}", e)))?;
    match payload {
        Payload::Bare(data) => Ok(data),
        Payload::Envelope(Envelope {
            success: true,
            data: Some(data),
            ..
        }) => Ok(data),
        Payload::Envelope(Envelope { success: true, .. }) => Err(StoreError::Serialization(
            "Response envelope has no data".to_string(),
        )),
        Payload::Envelope(Envelope { message, .. }) => Err(StoreError::Rejected(
            message.unwrap_or_else(|| "success: false".to_string()),
        )),
    }
}

/// Map a non-success status to an error.
fn status_error(status: reqwest::StatusCode, body: String, target: &str) -> StoreError {
    match status.as_u16() {
        401 | 403 => StoreError::Unauthorized,
        404 => StoreError::NotFound(target.to_string()),
        code => StoreError::Http {
            status: code,
            message: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        },
    }
}

async fn read_body(response: Response, target: &str) -> StoreResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| StoreError::Network(e.to_string()))?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(status_error(status, body, target))
    }
}

/// Remote store talking to `{api_url}/canvas`.
///
/// Every request carries `Authorization: Bearer <token>` and `X-Channel-Id`
/// when those are configured.
pub struct HttpStore {
    client: Client,
    /// API root without a trailing slash.
    base: String,
    token: Option<String>,
    channel_id: Option<String>,
}

impl HttpStore {
    /// Create a store for the API rooted at `api_url`.
    pub fn new(api_url: &Url, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base: api_url.as_str().trim_end_matches('/').to_string(),
            token: None,
            channel_id: None,
        })
    }

    /// Create a store from the loaded configuration.
    pub fn from_config(config: &Config) -> StoreResult<Self> {
        let mut store = Self::new(&config.api_url, config.request_timeout())?;
        store.token = config.token.clone();
        store.channel_id = config.channel_id.clone();
        Ok(store)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    fn url(&self, id: Option<FileId>) -> String {
        match id {
            Some(id) => format!("{}/canvas/{}", self.base, id),
            None => format!("{}/canvas", self.base),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        log::debug!("{} {}", method, url);
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(channel_id) = &self.channel_id {
            builder = builder.header("X-Channel-Id", channel_id);
        }
        builder
    }

    async fn send(builder: RequestBuilder, target: &str) -> StoreResult<String> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        read_body(response, target).await
    }
}

impl CanvasStore for HttpStore {
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<CanvasFile>>> {
        Box::pin(async move {
            let url = self.url(None);
            let body = Self::send(self.request(Method::GET, &url), &url).await?;
            let files: Vec<CanvasFile> = decode(&body)?;
            log::debug!("Listed {} document(s)", files.len());
            Ok(files)
        })
    }

    fn create(&self, name: &str) -> BoxFuture<'_, StoreResult<CanvasFile>> {
        let name = validate_name(name);
        Box::pin(async move {
            let request = CreateRequest { name: name? };
            let url = self.url(None);
            let body = Self::send(self.request(Method::POST, &url).json(&request), &url).await?;
            decode(&body)
        })
    }

    fn update(&self, id: FileId, data: &[Element]) -> BoxFuture<'_, StoreResult<CanvasFile>> {
        let request = UpdateRequest {
            data: data.to_vec(),
        };
        Box::pin(async move {
            let url = self.url(Some(id));
            let body = Self::send(self.request(Method::PUT, &url).json(&request), &url).await?;
            decode(&body)
        })
    }

    fn delete(&self, id: FileId) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let url = self.url(Some(id));
            let body = Self::send(self.request(Method::DELETE, &url), &url).await?;
            if body.trim().is_empty() {
                return Ok(());
            }
            // Bodies are optional here; only an explicit failure counts.
            match serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
                Ok(Envelope { success: false, message, .. }) => Err(StoreError::Rejected(
                    message.unwrap_or_else(|| "success: false".to_string()),
                )),
                _ => Ok(()),
            }
        })
    }
}
