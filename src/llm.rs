//! # Answer Generation Module
//!
//! ## Purpose
//! Client for the external answer-generation collaborator: builds the
//! grounding prompt from selected context and the user's question, sends it to
//! an OpenAI-compatible chat-completions endpoint, and returns the reply as
//! opaque text.
//!
//! ## Input/Output Specification
//! - **Input**: Selected context text, free-text question
//! - **Output**: Free-text answer from the remote model
//! - **Failure Mode**: Any fault (auth, network, rate limit, malformed body)
//!   is surfaced as an error for the user; the session continues
//!
//! ## Key Features
//! - Prompt pattern: instruction + quoted context + quoted question
//! - Scoped request timeout from configuration; no retries
//! - Response parsed only far enough to pull the first choice's message
//!   content; everything else is treated as opaque

use crate::config::LlmConfig;
use crate::errors::{BillSearchError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Instruction prefixed to every prompt
const PROMPT_INSTRUCTION: &str =
    "You are a helpful assistant answering questions about a legislative bill. \
     Answer using only the excerpt below. If the excerpt does not contain the \
     answer, say so.";

/// Chat message in the completions request/response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat completions request payload
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// Chat completions response payload (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for the remote answer-generation service
pub struct AnswerClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl AnswerClient {
    /// Create a client with the configured timeout
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BillSearchError::Internal {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { config, client })
    }

    /// Build the grounding prompt: instruction, quoted context, quoted question
    pub fn build_prompt(context: &str, question: &str) -> String {
        format!(
            "{}\n\nBill excerpt:\n\"{}\"\n\nQuestion: \"{}\"",
            PROMPT_INSTRUCTION, context, question
        )
    }

    /// Ask the remote service to answer a question grounded in `context`
    ///
    /// Empty context is forwarded as-is; the resulting answer quality is the
    /// caller's concern, not an error here.
    pub async fn ask(&self, context: &str, question: &str) -> Result<String> {
        let prompt = Self::build_prompt(context, question);

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let url = format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'));

        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BillSearchError::AnswerGenerationFailed {
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BillSearchError::AnswerGenerationFailed {
                details: format!("HTTP {}: {}", status, body),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| BillSearchError::AnswerResponseMalformed {
                    details: e.to_string(),
                })?;

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| BillSearchError::AnswerResponseMalformed {
                details: "Response contained no choices".to_string(),
            })?;

        tracing::debug!(chars = answer.chars().count(), "Answer received");

        Ok(answer)
    }
}
