use ndarray::Array4;
use rand::Rng;

use super::{Classifier, ClassifierError};

const CLASS_COUNT: usize = 4;

/// Stand-in classifier for running the UI without a trained model.
#[derive(Debug, Default, Clone)]
pub struct DemoClassifier;

impl DemoClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for DemoClassifier {
    fn is_simulated(&self) -> bool {
        true
    }

    fn classify(&self, _input: &Array4<f32>) -> Result<Vec<f32>, ClassifierError> {
        Ok(simulate(&mut rand::rng()))
    }
}

/// Draws from Dirichlet(2, 2, 2, 2), and 70% of the time boosts one class
/// by 0.5 before renormalising.
pub fn simulate<R: Rng + ?Sized>(rng: &mut R) -> Vec<f32> {
    let mut probs: Vec<f64> = (0..CLASS_COUNT).map(|_| gamma_shape_two(rng)).collect();
    normalize(&mut probs);

    if rng.random::<f64>() > 0.3 {
        let dominant = rng.random_range(0..CLASS_COUNT);
        probs[dominant] += 0.5;
        normalize(&mut probs);
    }

    probs.into_iter().map(|p| p as f32).collect()
}

// Gamma(2, 1) is the sum of two unit exponentials.
fn gamma_shape_two<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = 1.0 - rng.random::<f64>();
    -u1.ln() - u2.ln()
}

fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    } else {
        let uniform = 1.0 / values.len() as f64;
        values.iter_mut().for_each(|v| *v = uniform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_simulated_scores_form_a_distribution() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let scores = simulate(&mut rng);
            assert_eq!(scores.len(), CLASS_COUNT);
            assert!(scores.iter().all(|&p| (0.0..=1.0).contains(&p)));
            let total: f32 = scores.iter().sum();
            assert!((total - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_normalize_handles_zero_total() {
        let mut values = vec![0.0; 4];
        normalize(&mut values);
        assert_eq!(values, vec![0.25; 4]);
    }

    #[test]
    fn test_demo_classifier_is_simulated() {
        let classifier = DemoClassifier::new();
        assert!(classifier.is_simulated());
        let input = Array4::<f32>::zeros((1, 299, 299, 3));
        assert_eq!(classifier.classify(&input).unwrap().len(), CLASS_COUNT);
    }
}
