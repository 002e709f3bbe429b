//! Model gateway: turns one user turn into a Gemini request and returns the
//! answer text.
//!
//! The gateway is stateless. Each call is single-turn: no earlier messages
//! are sent to the model. The HTTP exchange sits behind [`ModelBackend`] so
//! the conversation flow can run against an in-memory backend.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};
use crate::core::message::Attachment;
use crate::utils::url::{construct_api_url, generate_content_path};

pub const SYSTEM_INSTRUCTION: &str =
    "You are Gemini Spark, a helpful, concise, and intelligent AI assistant.";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Failures of the underlying model call.
#[derive(Debug)]
pub enum TransportError {
    /// No API key was configured in the environment.
    MissingApiKey,

    /// The request could not be sent or the body could not be read.
    Http(reqwest::Error),

    /// The API answered with a non-success status.
    Status {
        status: u16,
        /// Short summary extracted from the error body.
        summary: String,
    },

    /// The response body was not a valid `generateContent` response.
    Decode(serde_json::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::MissingApiKey => write!(
                f,
                "no API key found (set {} or {})",
                API_KEY_ENV_VARS[0], API_KEY_ENV_VARS[1]
            ),
            TransportError::Http(err) => write!(f, "request failed: {err}"),
            TransportError::Status { status, summary } => {
                write!(f, "API request failed with status {status}: {summary}")
            }
            TransportError::Decode(err) => write!(f, "malformed response: {err}"),
        }
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            TransportError::Http(err) => Some(err),
            TransportError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Http(err)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err)
    }
}

#[derive(Debug)]
pub enum GatewayError {
    /// The model answered without any text.
    EmptyResponse,
    Transport(TransportError),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::EmptyResponse => write!(f, "no text returned from the model"),
            GatewayError::Transport(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for GatewayError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            GatewayError::EmptyResponse => None,
            GatewayError::Transport(err) => Some(err),
        }
    }
}

impl From<TransportError> for GatewayError {
    fn from(err: TransportError) -> Self {
        GatewayError::Transport(err)
    }
}

/// The remote model capability: one request in, one response out.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransportError>;
}

/// Ordered request parts: the image first, then the text when non-empty.
pub fn build_parts(text: &str, attachment: Option<&Attachment>) -> Vec<Part> {
    let mut parts = Vec::with_capacity(2);
    if let Some(attachment) = attachment {
        parts.push(Part::inline_data(
            attachment.mime_type.clone(),
            attachment.data.clone(),
        ));
    }
    if !text.is_empty() {
        parts.push(Part::text(text));
    }
    parts
}

#[derive(Clone)]
pub struct ModelGateway {
    backend: Arc<dyn ModelBackend>,
    model: String,
    generation: GenerationConfig,
}

impl ModelGateway {
    pub fn new(backend: Arc<dyn ModelBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(
        &self,
        text: &str,
        attachment: Option<&Attachment>,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            model: self.model.clone(),
            contents: vec![Content::user(build_parts(text, attachment))],
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(SYSTEM_INSTRUCTION)],
            },
            generation_config: (!self.generation.is_empty()).then(|| self.generation.clone()),
        }
    }

    pub async fn generate(
        &self,
        text: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, GatewayError> {
        let request = self.build_request(text, attachment);
        debug!(
            model = %self.model,
            has_image = attachment.is_some(),
            text_len = text.len(),
            "Sending generateContent request"
        );

        let response = self.backend.generate_content(&request).await.map_err(|err| {
            warn!(model = %self.model, error = %err, "Model call failed");
            GatewayError::from(err)
        })?;

        match response.text() {
            Some(text) => Ok(text),
            None => {
                warn!(model = %self.model, "Model returned no text");
                Err(GatewayError::EmptyResponse)
            }
        }
    }
}

/// First non-empty API key from [`API_KEY_ENV_VARS`].
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Gemini REST backend.
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        construct_api_url(&self.base_url, &generate_content_path(model))
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TransportError> {
        // A missing key is reported per call, never at startup.
        let api_key = self.api_key.as_deref().ok_or(TransportError::MissingApiKey)?;

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                summary: summarize_api_error(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// One-line summary of an API error body, preferring `error.message`.
fn summarize_api_error(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let summary = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .or_else(|| value.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| trimmed.to_string());

    summary.split_whitespace().collect::<Vec<_>>().join(" ")
}
