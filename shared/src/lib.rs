use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod analysis;
pub mod chat;
pub mod classes;
pub mod error;
pub mod upload;

pub use analysis::{PredictionResult, RankedClass};
pub use chat::{ChatController, ChatMessage, Sender};
pub use classes::TumorClass;
pub use error::{RequestError, UploadError};
pub use upload::{SelectedFile, UploadController, ViewState};

/// Largest image accepted for analysis, before encoding.
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

pub const ACCEPTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

pub const PREDICT_ENDPOINT: &str = "/predict";
pub const CHAT_ENDPOINT: &str = "/chat";

/// Delay between a successful analysis and the chat widget's greeting.
pub const GREETING_DELAY_MS: u32 = 1500;

/// Delay before result bars grow from zero to their target width.
pub const BAR_REVEAL_DELAY_MS: u32 = 100;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictRequest {
    pub image: String,
}

/// Body of a `/predict` reply. Success and error replies share the shape;
/// every field is optional so that missing fields can be reported precisely.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PredictResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictResponse {
    pub fn success(prediction: impl Into<String>, confidence: f64, probabilities: Map<String, Value>) -> Self {
        Self {
            success: Some(true),
            prediction: Some(prediction.into()),
            confidence: Some(confidence),
            probabilities: Some(probabilities),
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode.then_some(true);
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            response: Some(text.into()),
            error: None,
        }
    }

    /// An error carrying a user-facing explanation alongside it.
    pub fn failure(error: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            success: None,
            response: Some(response.into()),
            error: Some(error.into()),
        }
    }

    pub fn bare_error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }
}
