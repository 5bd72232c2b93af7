//! Score normalization: classifier outputs to probability distributions.
//!
//! Classifiers differ in what they can report — native probabilities,
//! decision margins, or only a hard label. The capability is a static
//! property of the classifier type, inspected once, and the matching
//! normalization turns whatever the classifier emits into a probability
//! distribution over all known classes.

use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;
use crate::error::{RepertoireError, Result};

/// What a classifier can report for one input, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreCapability {
    /// Emits per-class probabilities; used as-is.
    Probabilistic,
    /// Emits decision margins; converted through a softmax.
    MarginBased,
    /// Emits only a predicted label; converted to a one-hot distribution.
    HardLabel,
}

/// Numerically stable softmax: subtract the max, exponentiate, normalize.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }

    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f64 = exp.iter().sum();

    exp.into_iter().map(|e| e / sum).collect()
}

/// One-hot distribution: probability 1 at `index`, 0 elsewhere.
pub fn one_hot(n_classes: usize, index: usize) -> Vec<f64> {
    let mut scores = vec![0.0; n_classes];
    if index < n_classes {
        scores[index] = 1.0;
    }
    scores
}

/// Normalize a classifier's output on one feature vector into a probability
/// distribution over `n_classes` classes.
///
/// A margin-based classifier reporting a single signed margin for a binary
/// problem is expanded into the two-column form `[-margin, margin]` before
/// the softmax.
pub fn normalize_scores(
    classifier: &dyn Classifier,
    features: &[f64],
    n_classes: usize,
) -> Result<Vec<f64>> {
    match classifier.capability() {
        ScoreCapability::Probabilistic => classifier.predict_proba(features),
        ScoreCapability::MarginBased => {
            let mut margins = classifier.decision_function(features)?;
            if margins.len() == 1 && n_classes == 2 {
                margins = vec![-margins[0], margins[0]];
            }
            if margins.len() != n_classes {
                return Err(RepertoireError::model(format!(
                    "classifier returned {} margins for {} classes",
                    margins.len(),
                    n_classes
                )));
            }
            Ok(softmax(&margins))
        }
        ScoreCapability::HardLabel => {
            let predicted = classifier.predict(features)?;
            Ok(one_hot(n_classes, predicted))
        }
    }
}
