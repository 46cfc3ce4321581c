//! Ollama chat client
//!
//! Non-streaming chat completions via POST /api/chat. The pipeline only
//! needs deterministic-leaning text completion given a system instruction
//! and a user message, so temperature is passed per request and streaming
//! is never enabled.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::errors::{Result, TriageError};
use crate::models::types::{ChatMessage, ChatOptions, ChatRequest, ChatResponse};

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default chat model
pub const DEFAULT_CHAT_MODEL: &str = "qwen2.5:7b-instruct";

/// Request timeout for generation calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A chat-completion provider: role-tagged messages in, generated text out.
/// The seam the classifier and composer are tested through.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String>;
}

/// HTTP client for the Ollama chat API
#[derive(Debug, Clone)]
pub struct OllamaChatClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaChatClient {
    /// Create a client against the default local endpoint
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_CHAT_MODEL)
    }

    /// Create a client with a custom endpoint and model
    pub fn with_config(base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(TriageError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Check if the Ollama server is reachable
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatModel for OllamaChatClient {
    async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            stream: false,
            options: Some(ChatOptions { temperature }),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TriageError::Provider(format!("failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TriageError::Provider(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| TriageError::Provider(format!("failed to parse response: {}", e)))?;

        Ok(chat_response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaChatClient::new().unwrap();
        assert_eq!(client.model(), DEFAULT_CHAT_MODEL);
        assert_eq!(client.base_url(), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = OllamaChatClient::with_config("http://localhost:11434/", "llama3.1:8b").unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.model(), "llama3.1:8b");
    }

    #[tokio::test]
    #[ignore] // Requires Ollama running
    async fn test_chat_integration() {
        let client = OllamaChatClient::new().unwrap();
        let reply = client
            .chat(&[ChatMessage::user("Say 'pong' and nothing else.")], 0.0)
            .await
            .unwrap();
        assert!(!reply.is_empty());
    }
}
