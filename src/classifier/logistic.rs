//! Multinomial logistic regression trained by gradient descent.

use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, check_training_set};
use crate::error::{RepertoireError, Result};
use crate::scoring::{ScoreCapability, softmax};

/// Logistic regression with a softmax output layer.
///
/// Full-batch gradient descent on the cross-entropy loss, capped at 2000
/// iterations with early stopping once the gradient is flat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Weight matrix, one row per class.
    weights: Vec<Vec<f64>>,
    /// One intercept per class.
    bias: Vec<f64>,
    n_classes: usize,
    learning_rate: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Create an untrained model with default hyperparameters.
    pub fn new() -> Self {
        Self {
            weights: Vec::new(),
            bias: Vec::new(),
            n_classes: 0,
            learning_rate: 0.5,
            max_iterations: 2000,
            tolerance: 1e-5,
        }
    }

    /// Override the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn logits(&self, features: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(self.bias.iter())
            .map(|(w, &b)| w.iter().zip(features.iter()).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, features: &[Vec<f64>], classes: &[usize], n_classes: usize) -> Result<()> {
        let n_features = check_training_set(features, classes, n_classes)?;
        let n = features.len() as f64;

        self.n_classes = n_classes;
        self.weights = vec![vec![0.0; n_features]; n_classes];
        self.bias = vec![0.0; n_classes];

        for _ in 0..self.max_iterations {
            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];

            for (row, &label) in features.iter().zip(classes.iter()) {
                let probs = softmax(&self.logits(row));

                for (class, &p) in probs.iter().enumerate() {
                    let error = p - f64::from(u8::from(class == label));
                    for (g, &x) in grad_w[class].iter_mut().zip(row.iter()) {
                        *g += error * x;
                    }
                    grad_b[class] += error;
                }
            }

            let mut max_step: f64 = 0.0;
            for class in 0..n_classes {
                for (w, g) in self.weights[class].iter_mut().zip(grad_w[class].iter()) {
                    let step = self.learning_rate * g / n;
                    *w -= step;
                    max_step = max_step.max(step.abs());
                }
                let step = self.learning_rate * grad_b[class] / n;
                self.bias[class] -= step;
                max_step = max_step.max(step.abs());
            }

            if max_step < self.tolerance {
                break;
            }
        }

        Ok(())
    }

    fn capability(&self) -> ScoreCapability {
        ScoreCapability::Probabilistic
    }

    fn predict(&self, features: &[f64]) -> Result<usize> {
        let probs = self.predict_proba(features)?;
        let mut best = 0;
        for (idx, &p) in probs.iter().enumerate() {
            if p > probs[best] {
                best = idx;
            }
        }
        Ok(best)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        if !self.is_trained() {
            return Err(RepertoireError::model(
                "logistic regression has not been trained",
            ));
        }

        Ok(softmax(&self.logits(features)))
    }

    fn is_trained(&self) -> bool {
        !self.weights.is_empty()
    }

    fn name(&self) -> &'static str {
        "logreg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_set() -> (Vec<Vec<f64>>, Vec<usize>) {
        let features = vec![
            vec![1.0, 0.0, 0.1],
            vec![0.9, 0.1, 0.0],
            vec![1.0, 0.2, 0.1],
            vec![0.0, 1.0, 0.1],
            vec![0.1, 0.9, 0.0],
            vec![0.0, 1.0, 0.2],
        ];
        let classes = vec![0, 0, 0, 1, 1, 1];
        (features, classes)
    }

    #[test]
    fn test_training_separates_classes() {
        let (features, classes) = training_set();
        let mut model = LogisticRegression::new();
        model.fit(&features, &classes, 2).unwrap();

        assert_eq!(model.predict(&features[0]).unwrap(), 0);
        assert_eq!(model.predict(&features[3]).unwrap(), 1);
    }

    #[test]
    fn test_probabilities_form_a_distribution() {
        let (features, classes) = training_set();
        let mut model = LogisticRegression::new();
        model.fit(&features, &classes, 2).unwrap();

        let probs = model.predict_proba(&features[0]).unwrap();
        assert_eq!(probs.len(), 2);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-6);
        assert!(probs.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn test_untrained_prediction_fails() {
        let model = LogisticRegression::new();
        assert!(model.predict_proba(&[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_capability_is_probabilistic() {
        assert_eq!(
            LogisticRegression::new().capability(),
            ScoreCapability::Probabilistic
        );
    }

    #[test]
    fn test_iteration_cap_override() {
        let (features, classes) = training_set();
        let mut model = LogisticRegression::new().with_max_iterations(5);
        model.fit(&features, &classes, 2).unwrap();
        assert!(model.is_trained());
    }
}
