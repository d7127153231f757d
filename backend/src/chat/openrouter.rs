//! OpenRouter (OpenAI-compatible) chat completions.

use super::{ChatError, ChatResponder, SYSTEM_PROMPT};
use crate::config::ChatConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OpenRouterResponder {
    client: Client,
    config: ChatConfig,
}

impl OpenRouterResponder {
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionContent,
}

#[derive(Deserialize)]
struct CompletionContent {
    content: String,
}

fn timeout_aware(err: reqwest::Error) -> ChatError {
    if err.is_timeout() {
        ChatError::Timeout
    } else {
        ChatError::Http(err)
    }
}

/// Pulls `error.message` out of an upstream error body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[async_trait]
impl ChatResponder for OpenRouterResponder {
    fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        if !self.is_configured() {
            return Err(ChatError::NotConfigured);
        }

        let request = CompletionRequest {
            model: &self.config.model,
            messages: vec![
                CompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                CompletionMessage {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", "https://neuroscan-ai.app")
            .header("X-Title", "NeuroScan AI")
            .json(&request)
            .send()
            .await
            .map_err(timeout_aware)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body);
            log::error!("OpenRouter API error: {} - {}", status, message);
            return Err(ChatError::Upstream { status, message });
        }

        let completion: CompletionResponse = response.json().await.map_err(timeout_aware)?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_extraction() {
        assert_eq!(upstream_message(r#"{"error":{"message":"Invalid key","code":401}}"#), "Invalid key");
        assert_eq!(upstream_message(r#"{"error":"flat"}"#), "Unknown error");
        assert_eq!(upstream_message(""), "Unknown error");
    }

    #[actix_web::test]
    async fn test_unconfigured_responder_does_not_call_out() {
        let responder = OpenRouterResponder::new(ChatConfig::default()).unwrap();
        assert!(!responder.is_configured());
        assert!(matches!(responder.reply("hello").await, Err(ChatError::NotConfigured)));
    }
}
