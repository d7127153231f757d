//! Interpretation of `/predict` replies and the ordering of result bars.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;

use crate::classes::TumorClass;
use crate::error::RequestError;
use crate::PredictResponse;

/// Encodes image bytes as a `data:` URI, the format `/predict` expects.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// A classifier verdict as received from the prediction service.
///
/// Probabilities keep the order in which the service listed them and are
/// neither normalised nor range-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    label: String,
    confidence: f64,
    probabilities: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedClass {
    pub label: String,
    pub class: TumorClass,
    pub probability: f64,
}

impl RankedClass {
    /// Inline style for the bar; zero width until the reveal fires.
    pub fn width_style(&self, revealed: bool) -> String {
        let width = if revealed { self.probability.clamp(0.0, 100.0) } else { 0.0 };
        format!("width: {}%", width)
    }

    pub fn percent_text(&self) -> String {
        format!("{:.1}%", self.probability)
    }
}

impl PredictionResult {
    pub fn new(label: impl Into<String>, confidence: f64, probabilities: Vec<(String, f64)>) -> Self {
        Self {
            label: label.into(),
            confidence,
            probabilities,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn class(&self) -> TumorClass {
        TumorClass::from_label(&self.label)
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Confidence with one decimal place, without the percent sign.
    pub fn confidence_text(&self) -> String {
        format!("{:.1}", self.confidence)
    }

    pub fn confidence_percent_text(&self) -> String {
        format!("{}%", self.confidence_text())
    }

    pub fn probabilities(&self) -> &[(String, f64)] {
        &self.probabilities
    }

    /// Bars sorted by descending probability. Equal values keep the
    /// service's order.
    pub fn ranked(&self) -> Vec<RankedClass> {
        let mut ranked: Vec<RankedClass> = self
            .probabilities
            .iter()
            .map(|(label, probability)| RankedClass {
                label: label.clone(),
                class: TumorClass::from_label(label),
                probability: *probability,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

impl TryFrom<PredictResponse> for PredictionResult {
    type Error = RequestError;

    fn try_from(response: PredictResponse) -> Result<Self, Self::Error> {
        if let Some(error) = response.error {
            return Err(RequestError::Service(error));
        }

        let label = response
            .prediction
            .ok_or_else(|| RequestError::Malformed("missing prediction".into()))?;
        let confidence = response
            .confidence
            .ok_or_else(|| RequestError::Malformed("missing confidence".into()))?;
        let raw = response
            .probabilities
            .ok_or_else(|| RequestError::Malformed("missing probabilities".into()))?;

        let probabilities = raw
            .into_iter()
            .map(|(label, value)| match value {
                Value::Number(n) => n
                    .as_f64()
                    .map(|p| (label.clone(), p))
                    .ok_or_else(|| RequestError::Malformed(format!("bad probability for {}", label))),
                _ => Err(RequestError::Malformed(format!("non-numeric probability for {}", label))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PredictionResult::new(label, confidence, probabilities))
    }
}

/// Turns an HTTP status and body from `/predict` into a result.
///
/// An `error` field always wins, whatever the status. A non-2xx reply
/// without one is a service error; an undecodable 2xx body is a transport
/// error.
pub fn interpret_response(status: u16, body: &str) -> Result<PredictionResult, RequestError> {
    let ok = (200..300).contains(&status);

    let response: PredictResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) if ok => {
            return Err(RequestError::Transport(format!("Failed to parse response: {}", e)));
        }
        Err(_) => return Err(RequestError::Service(format!("Server error: {}", status))),
    };

    if response.error.is_none() && !ok {
        return Err(RequestError::Service(format!("Server error: {}", status)));
    }

    PredictionResult::try_from(response)
}
