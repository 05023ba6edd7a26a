use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::TelegramConfig;
use crate::telegram::types::{BotUser, SendMessageRequest};

pub const METHOD_GET_ME: &str = "getMe";
pub const METHOD_SEND_MESSAGE: &str = "sendMessage";

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Encode(serde_json::Error),

    #[error("{0}")]
    Decode(serde_json::Error),

    #[error("got: {description} [{code}]")]
    Api { description: String, code: i64 },
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        // The request URL embeds the bot token.
        let error = error.without_url();
        let mut text = error.to_string();
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        ApiError::Transport(text)
    }
}

/// Generic response wrapper returned by every Bot API method.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub result: serde_json::Value,
}

impl ApiEnvelope {
    pub fn into_result(self) -> Result<serde_json::Value, ApiError> {
        if !self.ok {
            return Err(ApiError::Api {
                description: self.description.unwrap_or_default(),
                code: self.error_code.unwrap_or_default(),
            });
        }
        Ok(self.result)
    }
}

/// Raw outbound HTTP leg: POST a JSON body, hand back the response bytes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, ApiError>;
}

/// reqwest-backed transport with client defaults (no request timeout).
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body)
            .send()
            .await?;

        // Status is deliberately ignored; the envelope carries success.
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

pub struct TelegramClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(config: &TelegramConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
        }
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Call `method` and decode the envelope's `result` into `R`.
    pub async fn call<P, R>(&self, method: &str, params: Option<&P>) -> Result<R, ApiError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let result = self.request(method, params).await?;
        serde_json::from_value(result).map_err(ApiError::Decode)
    }

    /// Call `method` for its side effect only; the result is never decoded.
    pub async fn execute<P>(&self, method: &str, params: Option<&P>) -> Result<(), ApiError>
    where
        P: Serialize + ?Sized,
    {
        self.request(method, params).await.map(|_| ())
    }

    pub async fn send_message(&self, req: &SendMessageRequest) -> Result<(), ApiError> {
        self.execute(METHOD_SEND_MESSAGE, Some(req)).await
    }

    pub async fn get_me(&self) -> Result<BotUser, ApiError> {
        self.call::<(), _>(METHOD_GET_ME, None).await
    }

    async fn request<P>(&self, method: &str, params: Option<&P>) -> Result<serde_json::Value, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let body = match params {
            Some(p) => serde_json::to_vec(p).map_err(ApiError::Encode)?,
            None => Vec::new(),
        };

        debug!(method, bytes = body.len(), "Calling Telegram API");

        let raw = self.transport.post(&self.method_url(method), body).await?;
        let envelope: ApiEnvelope = serde_json::from_slice(&raw).map_err(ApiError::Decode)?;

        envelope.into_result()
    }
}
