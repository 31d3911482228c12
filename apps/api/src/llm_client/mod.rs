//! Model Gateway: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the provider directly.
//! Both the dialogue manager and the profile extractor go through
//! [`ModelGateway::generate`].
//!
//! One call = one request. There is deliberately no retry or backoff here:
//! the conversational caller absorbs a failure into a fallback turn, the
//! extraction caller surfaces it, and neither wants a second request fired
//! on its behalf.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::transcript::Transcript;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Reply substituted when the provider withholds the answer for safety
/// reasons. A withheld answer is still a successful call: the conversation
/// keeps flowing instead of breaking.
const WITHHELD_REPLY: &str =
    "Minha resposta foi bloqueada por questões de segurança. Poderia reformular?";

/// Reply substituted when the provider returns a choice with no text at all.
const UNCLEAR_REPLY: &str = "Não consegui gerar uma resposta clara.";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider client was never initialized (missing credentials).
    #[error("AI provider client is not initialized")]
    Unavailable,

    /// The single request failed: transport error, timeout, non-2xx status,
    /// or an undecodable success body. Terminal for this call.
    #[error("chat completion request failed: {0}")]
    RequestFailed(String),
}

/// Sampling settings for one call. Two presets exist: free-flowing
/// conversation and near-deterministic JSON extraction.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Open conversation: higher temperature, replies kept short.
    pub const CONVERSATIONAL: GenerationConfig = GenerationConfig {
        temperature: 0.75,
        max_output_tokens: 800,
    };

    /// Profile extraction: near-zero temperature to minimize structural
    /// drift, with room for the full JSON document.
    pub const EXTRACTION: GenerationConfig = GenerationConfig {
        temperature: 0.1,
        max_output_tokens: 2048,
    };
}

/// The generation seam. Production uses [`LlmClient`]; tests script replies.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        transcript: &Transcript,
        new_input: &str,
        config: &GenerationConfig,
    ) -> Result<String, GatewayError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider client
// ────────────────────────────────────────────────────────────────────────────

/// Chat-completion client for the OpenAI-compatible API.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn generate(
        &self,
        system: &str,
        transcript: &Transcript,
        new_input: &str,
        config: &GenerationConfig,
    ) -> Result<String, GatewayError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: build_messages(system, transcript, new_input),
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
        };

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(error_detail(
                status.as_u16(),
                &body,
            )));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("undecodable response body: {e}")))?;

        if let Some(usage) = &response.usage {
            debug!(
                "chat completion ok: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(reply_text(response))
    }
}

/// Converts the transcript plus the new input into the provider's message
/// list: system instruction first, then history in order, then the new turn.
fn build_messages(system: &str, transcript: &Transcript, new_input: &str) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 2);
    messages.push(WireMessage {
        role: "system",
        content: system.to_string(),
    });
    for turn in transcript.turns() {
        messages.push(WireMessage {
            role: turn.speaker.provider_role(),
            content: turn.text(),
        });
    }
    messages.push(WireMessage {
        role: "user",
        content: new_input.to_string(),
    });
    messages
}

/// Picks the reply out of a decoded response. A safety-withheld answer and a
/// contentless choice both become fixed replacement texts so the caller still
/// gets a well-formed assistant turn.
fn reply_text(response: ChatResponse) -> String {
    let Some(choice) = response.choices.into_iter().next() else {
        return UNCLEAR_REPLY.to_string();
    };
    if choice.finish_reason.as_deref() == Some("content_filter") {
        return WITHHELD_REPLY.to_string();
    }
    match choice.message.content {
        Some(text) if !text.is_empty() => text,
        _ => UNCLEAR_REPLY.to_string(),
    }
}

/// Extracts the provider's error message from a failure body, falling back
/// to the raw body when it is not the documented error shape.
fn error_detail(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<ApiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    format!("status {status}: {message}")
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway handle
// ────────────────────────────────────────────────────────────────────────────

/// Process-wide handle to the chat model, constructed once at startup and
/// injected everywhere. Built without credentials it still exists; every
/// call then fails with [`GatewayError::Unavailable`], which route guards
/// translate to 503 before any work happens.
#[derive(Clone)]
pub struct ModelGateway {
    model: Option<Arc<dyn ChatModel>>,
}

impl ModelGateway {
    pub fn with_model(model: Arc<dyn ChatModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn unavailable() -> Self {
        Self { model: None }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub async fn generate(
        &self,
        system: &str,
        transcript: &Transcript,
        new_input: &str,
        config: &GenerationConfig,
    ) -> Result<String, GatewayError> {
        match &self.model {
            Some(model) => model.generate(system, transcript, new_input, config).await,
            None => Err(GatewayError::Unavailable),
        }
    }
}
