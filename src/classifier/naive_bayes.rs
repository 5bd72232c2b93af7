//! Multinomial naive Bayes over TF-IDF features.

use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, check_training_set};
use crate::error::{RepertoireError, Result};
use crate::scoring::ScoreCapability;

/// Multinomial naive Bayes with Laplace smoothing.
///
/// Feature values are treated as (possibly fractional) term counts. Class
/// probabilities come from the joint log-likelihood, normalized in log space
/// so small likelihoods do not underflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Log prior per class.
    class_log_prior: Vec<f64>,
    /// Log feature likelihood per class.
    feature_log_prob: Vec<Vec<f64>>,
    /// Laplace smoothing strength.
    alpha: f64,
}

impl Default for MultinomialNb {
    fn default() -> Self {
        Self::new()
    }
}

impl MultinomialNb {
    /// Create an untrained model with Laplace smoothing `alpha = 1`.
    pub fn new() -> Self {
        Self::with_alpha(1.0)
    }

    /// Create an untrained model with explicit smoothing strength.
    pub fn with_alpha(alpha: f64) -> Self {
        Self {
            class_log_prior: Vec::new(),
            feature_log_prob: Vec::new(),
            alpha,
        }
    }

    /// Joint log-likelihood of one feature vector under every class.
    fn joint_log_likelihood(&self, features: &[f64]) -> Result<Vec<f64>> {
        if !self.is_trained() {
            return Err(RepertoireError::model("naive Bayes has not been trained"));
        }

        Ok(self
            .class_log_prior
            .iter()
            .zip(self.feature_log_prob.iter())
            .map(|(&prior, log_probs)| {
                prior
                    + features
                        .iter()
                        .zip(log_probs.iter())
                        .map(|(&x, &lp)| x * lp)
                        .sum::<f64>()
            })
            .collect())
    }
}

impl Classifier for MultinomialNb {
    fn fit(&mut self, features: &[Vec<f64>], classes: &[usize], n_classes: usize) -> Result<()> {
        let n_features = check_training_set(features, classes, n_classes)?;
        let n = features.len() as f64;

        let mut class_counts = vec![0.0; n_classes];
        let mut feature_counts = vec![vec![0.0; n_features]; n_classes];

        for (row, &class) in features.iter().zip(classes.iter()) {
            class_counts[class] += 1.0;
            for (total, &value) in feature_counts[class].iter_mut().zip(row.iter()) {
                *total += value;
            }
        }

        if class_counts.iter().any(|&c| c == 0.0) {
            return Err(RepertoireError::input(
                "every class needs at least one training example",
            ));
        }

        self.class_log_prior = class_counts.iter().map(|&c| (c / n).ln()).collect();
        self.feature_log_prob = feature_counts
            .into_iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + self.alpha * n_features as f64;
                counts
                    .into_iter()
                    .map(|c| ((c + self.alpha) / total).ln())
                    .collect()
            })
            .collect();

        Ok(())
    }

    fn capability(&self) -> ScoreCapability {
        ScoreCapability::Probabilistic
    }

    fn predict(&self, features: &[f64]) -> Result<usize> {
        let jll = self.joint_log_likelihood(features)?;
        let mut best = 0;
        for (idx, &value) in jll.iter().enumerate() {
            if value > jll[best] {
                best = idx;
            }
        }
        Ok(best)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        let jll = self.joint_log_likelihood(features)?;

        // Normalize in log space: exp(jll - logsumexp(jll)).
        let max = jll.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let log_sum = max + jll.iter().map(|&v| (v - max).exp()).sum::<f64>().ln();

        Ok(jll.into_iter().map(|v| (v - log_sum).exp()).collect())
    }

    fn is_trained(&self) -> bool {
        !self.feature_log_prob.is_empty()
    }

    fn name(&self) -> &'static str {
        "nb"
    }
}
