//! Linear-margin SVM trained by subgradient descent on the hinge loss.

use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, check_training_set};
use crate::error::{RepertoireError, Result};
use crate::scoring::ScoreCapability;

/// Linear support vector classifier.
///
/// Binary problems train a single separator and report one signed margin;
/// multi-class problems train one-vs-rest separators and report one margin
/// per class. Training is full-batch subgradient descent on the L2-regularized
/// hinge loss, which keeps fitting deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvm {
    /// One weight row per separator (1 for binary, `n_classes` otherwise).
    weights: Vec<Vec<f64>>,
    /// One intercept per separator.
    bias: Vec<f64>,
    n_classes: usize,
    learning_rate: f64,
    regularization: f64,
    max_iterations: usize,
}

impl Default for LinearSvm {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearSvm {
    /// Create an untrained SVM with default hyperparameters.
    pub fn new() -> Self {
        Self {
            weights: Vec::new(),
            bias: Vec::new(),
            n_classes: 0,
            learning_rate: 0.1,
            regularization: 1e-4,
            max_iterations: 1000,
        }
    }

    /// Override the training hyperparameters.
    pub fn with_params(learning_rate: f64, regularization: f64, max_iterations: usize) -> Self {
        Self {
            learning_rate,
            regularization,
            max_iterations,
            ..Self::new()
        }
    }

    /// Fit one separator against `targets` in {-1, +1}.
    fn fit_separator(&self, features: &[Vec<f64>], targets: &[f64], n_features: usize) -> (Vec<f64>, f64) {
        let n = features.len() as f64;
        let mut w = vec![0.0; n_features];
        let mut b = 0.0;

        for _ in 0..self.max_iterations {
            let mut grad_w = vec![0.0; n_features];
            let mut grad_b = 0.0;

            for (row, &y) in features.iter().zip(targets.iter()) {
                let margin = y * (dot(&w, row) + b);
                if margin < 1.0 {
                    for (g, &x) in grad_w.iter_mut().zip(row.iter()) {
                        *g -= y * x;
                    }
                    grad_b -= y;
                }
            }

            for (wi, gi) in w.iter_mut().zip(grad_w.iter()) {
                *wi -= self.learning_rate * (self.regularization * *wi + gi / n);
            }
            b -= self.learning_rate * grad_b / n;
        }

        (w, b)
    }

    fn margins(&self, features: &[f64]) -> Result<Vec<f64>> {
        if !self.is_trained() {
            return Err(RepertoireError::model("linear SVM has not been trained"));
        }

        Ok(self
            .weights
            .iter()
            .zip(self.bias.iter())
            .map(|(w, &b)| dot(w, features) + b)
            .collect())
    }
}

impl Classifier for LinearSvm {
    fn fit(&mut self, features: &[Vec<f64>], classes: &[usize], n_classes: usize) -> Result<()> {
        let n_features = check_training_set(features, classes, n_classes)?;

        self.n_classes = n_classes;
        self.weights.clear();
        self.bias.clear();

        if n_classes == 2 {
            // Single separator: positive margin means class 1.
            let targets: Vec<f64> = classes
                .iter()
                .map(|&c| if c == 1 { 1.0 } else { -1.0 })
                .collect();
            let (w, b) = self.fit_separator(features, &targets, n_features);
            self.weights.push(w);
            self.bias.push(b);
        } else {
            for class in 0..n_classes {
                let targets: Vec<f64> = classes
                    .iter()
                    .map(|&c| if c == class { 1.0 } else { -1.0 })
                    .collect();
                let (w, b) = self.fit_separator(features, &targets, n_features);
                self.weights.push(w);
                self.bias.push(b);
            }
        }

        Ok(())
    }

    fn capability(&self) -> ScoreCapability {
        ScoreCapability::MarginBased
    }

    fn predict(&self, features: &[f64]) -> Result<usize> {
        let margins = self.margins(features)?;

        if self.n_classes == 2 {
            Ok(usize::from(margins[0] >= 0.0))
        } else {
            Ok(argmax(&margins))
        }
    }

    fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.margins(features)
    }

    fn is_trained(&self) -> bool {
        !self.weights.is_empty()
    }

    fn name(&self) -> &'static str {
        "svm"
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_set() -> (Vec<Vec<f64>>, Vec<usize>) {
        let features = vec![
            vec![1.0, 0.0, 0.1],
            vec![0.9, 0.1, 0.0],
            vec![1.0, 0.2, 0.0],
            vec![0.0, 1.0, 0.1],
            vec![0.1, 0.9, 0.0],
            vec![0.0, 1.0, 0.2],
        ];
        let classes = vec![0, 0, 0, 1, 1, 1];
        (features, classes)
    }

    #[test]
    fn test_binary_training_and_margin_shape() {
        let (features, classes) = binary_set();
        let mut svm = LinearSvm::new();
        svm.fit(&features, &classes, 2).unwrap();
        assert!(svm.is_trained());

        // Binary classifiers report a single signed margin.
        let margins = svm.decision_function(&features[0]).unwrap();
        assert_eq!(margins.len(), 1);

        assert_eq!(svm.predict(&features[0]).unwrap(), 0);
        assert_eq!(svm.predict(&features[4]).unwrap(), 1);
    }

    #[test]
    fn test_multiclass_margins() {
        let features = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.9, 0.0, 0.1],
            vec![0.0, 1.0, 0.0],
            vec![0.1, 0.9, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.1, 0.9],
        ];
        let classes = vec![0, 0, 1, 1, 2, 2];

        let mut svm = LinearSvm::new();
        svm.fit(&features, &classes, 3).unwrap();

        let margins = svm.decision_function(&features[2]).unwrap();
        assert_eq!(margins.len(), 3);
        assert_eq!(svm.predict(&features[2]).unwrap(), 1);
    }

    #[test]
    fn test_untrained_prediction_fails() {
        let svm = LinearSvm::new();
        assert!(svm.predict(&[0.0, 1.0]).is_err());
        assert!(svm.decision_function(&[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_no_probability_capability() {
        let (features, classes) = binary_set();
        let mut svm = LinearSvm::new();
        svm.fit(&features, &classes, 2).unwrap();

        assert_eq!(svm.capability(), ScoreCapability::MarginBased);
        assert!(svm.predict_proba(&features[0]).is_err());
    }

    #[test]
    fn test_training_is_deterministic() {
        let (features, classes) = binary_set();

        let mut first = LinearSvm::new();
        first.fit(&features, &classes, 2).unwrap();
        let mut second = LinearSvm::new();
        second.fit(&features, &classes, 2).unwrap();

        assert_eq!(
            first.decision_function(&features[0]).unwrap(),
            second.decision_function(&features[0]).unwrap()
        );
    }
}
