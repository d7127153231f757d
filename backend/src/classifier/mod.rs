pub mod demo;
pub mod preprocess;

use ndarray::Array4;
use serde_json::{Map, Value};
use shared::classes::MODEL_OUTPUT_ORDER;
use shared::PredictResponse;
use thiserror::Error;

pub use demo::DemoClassifier;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Model returned {0} scores, expected {expected}", expected = MODEL_OUTPUT_ORDER.len())]
    OutputShape(usize),
}

/// Maps a preprocessed `[1, 299, 299, 3]` batch to one probability per
/// class, in `MODEL_OUTPUT_ORDER`.
pub trait Classifier: Send + Sync {
    /// True when predictions are simulated rather than computed.
    fn is_simulated(&self) -> bool;

    fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>, ClassifierError>;
}

/// Runs the full pipeline on raw image bytes.
pub fn predict(classifier: &dyn Classifier, image: &[u8]) -> Result<PredictResponse, ClassifierError> {
    preprocess::sniff_format(image)?;
    let input = preprocess::to_input_tensor(image)?;
    let scores = classifier.classify(&input)?;
    summarize(&scores)
}

/// Builds the `/predict` success body from raw scores in `[0, 1]`.
pub fn summarize(scores: &[f32]) -> Result<PredictResponse, ClassifierError> {
    if scores.len() != MODEL_OUTPUT_ORDER.len() {
        return Err(ClassifierError::OutputShape(scores.len()));
    }

    // First maximum wins on ties.
    let (best, best_score) = scores
        .iter()
        .copied()
        .enumerate()
        .fold((0, scores[0]), |acc, (i, score)| if score > acc.1 { (i, score) } else { acc });

    let confidence = (f64::from(best_score) * 100.0 * 100.0).round() / 100.0;

    let mut probabilities = Map::new();
    for (class, &score) in MODEL_OUTPUT_ORDER.iter().zip(scores) {
        probabilities.insert(class.label().to_string(), Value::from(f64::from(score) * 100.0));
    }

    Ok(PredictResponse::success(MODEL_OUTPUT_ORDER[best].label(), confidence, probabilities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_picks_argmax() {
        let response = summarize(&[0.1, 0.2, 0.6, 0.1]).unwrap();
        assert_eq!(response.prediction.as_deref(), Some("No Tumor"));
        assert_eq!(response.success, Some(true));
        assert!((response.confidence.unwrap() - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_summarize_tie_prefers_first_class() {
        let response = summarize(&[0.4, 0.4, 0.1, 0.1]).unwrap();
        assert_eq!(response.prediction.as_deref(), Some("Glioma"));
    }

    #[test]
    fn test_summarize_lists_classes_in_model_order() {
        let response = summarize(&[0.25, 0.25, 0.25, 0.25]).unwrap();
        let labels: Vec<&String> = response.probabilities.as_ref().unwrap().keys().collect();
        assert_eq!(labels, vec!["Glioma", "Meningioma", "No Tumor", "Pituitary"]);
    }

    #[test]
    fn test_confidence_rounded_to_two_places() {
        let response = summarize(&[0.123456, 0.8, 0.05, 0.026544]).unwrap();
        assert_eq!(response.confidence, Some(80.0));
        let response = summarize(&[0.912345, 0.05, 0.03, 0.007655]).unwrap();
        assert_eq!(response.confidence, Some(91.23));
    }

    #[test]
    fn test_wrong_output_length() {
        assert!(matches!(summarize(&[0.5, 0.5]), Err(ClassifierError::OutputShape(2))));
    }
}
