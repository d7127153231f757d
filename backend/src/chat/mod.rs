mod openrouter;

pub use openrouter::OpenRouterResponder;

use async_trait::async_trait;
use shared::ChatResponse;
use thiserror::Error;

pub const SYSTEM_PROMPT: &str = "You are NeuroScan AI Assistant, a helpful medical AI assistant specializing in brain tumor information and MRI imaging. You provide educational information about:

- Brain tumor types (Glioma, Meningioma, Pituitary tumors)
- MRI imaging and how it's used in diagnosis
- General information about symptoms, treatments, and prognosis
- Explaining medical terminology in simple terms

IMPORTANT GUIDELINES:
1. Always clarify that you provide educational information only, NOT medical diagnosis
2. Encourage users to consult qualified healthcare professionals for medical advice
3. Be compassionate and supportive when discussing sensitive health topics
4. If asked about unrelated topics, politely redirect to brain health and MRI topics
5. Keep responses concise but informative (2-3 paragraphs max)

You are integrated into the NeuroScan AI brain tumor classification application.";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Chatbot not configured. Please set OPENROUTER_API_KEY environment variable.")]
    NotConfigured,

    #[error("API error: {status}")]
    Upstream { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion had no choices")]
    EmptyCompletion,
}

impl ChatError {
    /// The body `/chat` sends back for this failure. The status stays 200 and
    /// `response` carries text meant for the user.
    pub fn to_response(&self) -> ChatResponse {
        let user_text = match self {
            ChatError::NotConfigured => "I apologize, but the chatbot is not configured yet. \
                 Please add your OpenRouter API key to enable this feature."
                .to_string(),
            ChatError::Upstream { message, .. } => {
                format!("API Error: {}. Please try again later.", message)
            }
            ChatError::Timeout => "The request took too long. Please try again.".to_string(),
            ChatError::Http(_) | ChatError::EmptyCompletion => {
                "An error occurred. Please try again.".to_string()
            }
        };
        ChatResponse::failure(self.to_string(), user_text)
    }
}

/// Produces a reply to one user message.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn reply(&self, message: &str) -> Result<String, ChatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_body() {
        let body = ChatError::Upstream {
            status: 429,
            message: "Rate limited".into(),
        }
        .to_response();
        assert_eq!(body.error.as_deref(), Some("API error: 429"));
        assert_eq!(body.response.as_deref(), Some("API Error: Rate limited. Please try again later."));
    }

    #[test]
    fn test_timeout_body() {
        let body = ChatError::Timeout.to_response();
        assert_eq!(body.error.as_deref(), Some("Request timeout"));
        assert_eq!(body.response.as_deref(), Some("The request took too long. Please try again."));
    }
}
