//! HTTP client for OpenAI-compatible chat completion endpoints.

use super::conversion;
use super::dto::{WireChunk, WireRequest, WireResponse};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, instrument};
use vasari_core::{ChatRequest, ChatResponse};
use vasari_error::{BackendError, BackendErrorKind, VasariResult};
use vasari_interface::{ChunkStream, StreamChunk, Streaming, VasariDriver};

/// Client for any endpoint speaking the OpenAI chat completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    provider: &'static str,
}

impl OpenAiCompatibleClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token for the endpoint
    /// * `model` - Default model identifier
    /// * `endpoint` - Full chat completions URL (e.g., `https://api.groq.com/openai/v1/chat/completions`)
    /// * `provider` - Short provider label used in logs
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        provider: &'static str,
    ) -> Self {
        debug!(provider, "Creating new OpenAI-compatible client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: endpoint.into(),
            provider,
        }
    }

    /// Creates a client reading the API key from the named environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is not set.
    pub fn from_env(
        var: &str,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        provider: &'static str,
    ) -> VasariResult<Self> {
        let api_key = std::env::var(var).map_err(|_| {
            BackendError::new(BackendErrorKind::MissingApiKey(var.to_string()))
        })?;
        Ok(Self::new(api_key, model, endpoint, provider))
    }

    /// Sends a request body and returns the raw response after status checks.
    async fn send(&self, body: &WireRequest) -> Result<reqwest::Response, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::new(BackendErrorKind::Timeout(e.to_string()))
                } else {
                    BackendError::new(BackendErrorKind::Http(format!("Request failed: {}", e)))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::new(Self::status_error(
                status.as_u16(),
                body,
            )));
        }
        Ok(response)
    }

    /// Maps a non-success HTTP status to a backend error kind.
    fn status_error(status: u16, message: String) -> BackendErrorKind {
        match status {
            401 | 403 => BackendErrorKind::Auth(message),
            429 => BackendErrorKind::RateLimited(message),
            400 | 422 => BackendErrorKind::InvalidRequest(message),
            404 if message.contains("model") => BackendErrorKind::ModelNotFound(message),
            _ => BackendErrorKind::Api { status, message },
        }
    }
}

#[async_trait]
impl VasariDriver for OpenAiCompatibleClient {
    #[instrument(skip(self, req), fields(provider = %self.provider, model = %self.model))]
    async fn complete(&self, req: &ChatRequest) -> VasariResult<ChatResponse> {
        let body = conversion::to_wire_request(req, &self.model, false);
        let response = self.send(&body).await?;

        let wire: WireResponse = response.json().await.map_err(|e| {
            BackendError::new(BackendErrorKind::Parse(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        debug!("Received completion response");
        Ok(conversion::from_wire_response(wire)?)
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Streaming for OpenAiCompatibleClient {
    #[instrument(skip(self, req), fields(provider = %self.provider, model = %self.model))]
    async fn complete_stream(&self, req: &ChatRequest) -> VasariResult<ChunkStream> {
        let body = conversion::to_wire_request(req, &self.model, true);
        let response = self.send(&body).await?;
        let mut bytes = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut buf = String::new();
            // Some providers send the finish_reason chunk before the usage
            // trailer; hold the finishing chunk back so usage lands on it.
            let mut pending_final: Option<StreamChunk> = None;

            'recv: while let Some(next) = bytes.next().await {
                let data = match next {
                    Ok(b) => b,
                    Err(e) => {
                        yield Err(BackendError::new(BackendErrorKind::Stream(format!(
                            "Stream error: {}",
                            e
                        )))
                        .into());
                        return;
                    }
                };
                buf.push_str(&String::from_utf8_lossy(&data));

                while let Some(pos) = buf.find('\n') {
                    let line = buf[..pos].trim().to_string();
                    buf.drain(..=pos);
                    let Some(payload) = line.strip_prefix("data:") else {
                        continue;
                    };
                    let payload = payload.trim();
                    if payload == "[DONE]" {
                        break 'recv;
                    }

                    let WireChunk { choices, usage } = match serde_json::from_str(payload) {
                        Ok(w) => w,
                        Err(e) => {
                            yield Err(BackendError::new(BackendErrorKind::Parse(format!(
                                "Bad stream chunk: {}",
                                e
                            )))
                            .into());
                            return;
                        }
                    };
                    let usage = usage.map(conversion::from_wire_usage);

                    if choices.is_empty() {
                        // Usage-only trailer chunk.
                        if let (Some(u), Some(mut held)) = (usage, pending_final.take()) {
                            held.usage = Some(u);
                            yield Ok(held);
                        }
                        continue;
                    }

                    for choice in choices {
                        let chunk = StreamChunk {
                            delta: choice.delta.content.unwrap_or_default(),
                            tool_calls: Vec::new(),
                            usage,
                            finish_reason: choice
                                .finish_reason
                                .as_deref()
                                .map(conversion::finish_reason),
                        };
                        if chunk.finish_reason.is_some() && chunk.usage.is_none() {
                            pending_final = Some(chunk);
                        } else {
                            yield Ok(chunk);
                        }
                    }
                }
            }

            if let Some(held) = pending_final.take() {
                yield Ok(held);
            }
        };

        Ok(Box::pin(stream))
    }
}
