//! Classifier variants for genre prediction.
//!
//! The closed set of algorithms is `svm` (linear-margin SVM, the default),
//! `logreg` (multinomial logistic regression), and `nb` (multinomial naive
//! Bayes). All operate on dense TF-IDF feature vectors and class indices
//! into the model's ordered label list.

pub mod linear_svm;
pub mod logistic;
pub mod naive_bayes;

pub use linear_svm::LinearSvm;
pub use logistic::LogisticRegression;
pub use naive_bayes::MultinomialNb;

use serde::{Deserialize, Serialize};

use crate::error::{RepertoireError, Result};
use crate::scoring::ScoreCapability;

/// A multi-class text classifier over dense feature vectors.
///
/// `capability` is a static property of the concrete type; callers inspect
/// it once and then use only the matching score accessor.
pub trait Classifier {
    /// Train on parallel feature vectors and class indices (`0..n_classes`).
    fn fit(&mut self, features: &[Vec<f64>], classes: &[usize], n_classes: usize) -> Result<()>;

    /// What this classifier can report for one input.
    fn capability(&self) -> ScoreCapability;

    /// Predict the class index for one feature vector.
    fn predict(&self, features: &[f64]) -> Result<usize>;

    /// Per-class probabilities, for `Probabilistic` classifiers.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        Err(RepertoireError::model(format!(
            "{} does not expose class probabilities",
            self.name()
        )))
    }

    /// Per-class decision margins, for `MarginBased` classifiers. Binary
    /// classifiers report a single signed margin.
    fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>> {
        Err(RepertoireError::model(format!(
            "{} does not expose decision margins",
            self.name()
        )))
    }

    /// Whether the classifier has been trained.
    fn is_trained(&self) -> bool;

    /// Short algorithm name.
    fn name(&self) -> &'static str;
}

/// The closed set of supported training algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Linear-margin SVM (the default).
    Svm,
    /// Logistic regression, capped at 2000 iterations.
    Logreg,
    /// Multinomial naive Bayes.
    Nb,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Svm
    }
}

impl Algorithm {
    /// Parse an algorithm name. Unknown names are a configuration error.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s {
            "svm" => Ok(Algorithm::Svm),
            "logreg" => Ok(Algorithm::Logreg),
            "nb" => Ok(Algorithm::Nb),
            other => Err(RepertoireError::configuration(format!(
                "unknown classifier: {other} (expected svm, logreg, or nb)"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Svm => "svm",
            Algorithm::Logreg => "logreg",
            Algorithm::Nb => "nb",
        }
    }

    /// Construct an untrained classifier of this kind.
    pub fn build(&self) -> TrainedClassifier {
        match self {
            Algorithm::Svm => TrainedClassifier::Svm(LinearSvm::new()),
            Algorithm::Logreg => TrainedClassifier::Logreg(LogisticRegression::new()),
            Algorithm::Nb => TrainedClassifier::Nb(MultinomialNb::new()),
        }
    }
}

/// A serializable classifier of any supported kind.
///
/// The tagged representation lets one model artifact carry whichever variant
/// was trained.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum TrainedClassifier {
    Svm(LinearSvm),
    Logreg(LogisticRegression),
    Nb(MultinomialNb),
}

impl TrainedClassifier {
    fn inner(&self) -> &dyn Classifier {
        match self {
            TrainedClassifier::Svm(c) => c,
            TrainedClassifier::Logreg(c) => c,
            TrainedClassifier::Nb(c) => c,
        }
    }
}

impl Classifier for TrainedClassifier {
    fn fit(&mut self, features: &[Vec<f64>], classes: &[usize], n_classes: usize) -> Result<()> {
        match self {
            TrainedClassifier::Svm(c) => c.fit(features, classes, n_classes),
            TrainedClassifier::Logreg(c) => c.fit(features, classes, n_classes),
            TrainedClassifier::Nb(c) => c.fit(features, classes, n_classes),
        }
    }

    fn capability(&self) -> ScoreCapability {
        self.inner().capability()
    }

    fn predict(&self, features: &[f64]) -> Result<usize> {
        self.inner().predict(features)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.inner().predict_proba(features)
    }

    fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.inner().decision_function(features)
    }

    fn is_trained(&self) -> bool {
        self.inner().is_trained()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

/// Validate the shape of a training set before fitting.
pub(crate) fn check_training_set(
    features: &[Vec<f64>],
    classes: &[usize],
    n_classes: usize,
) -> Result<usize> {
    if features.is_empty() {
        return Err(RepertoireError::input("training set is empty"));
    }
    if features.len() != classes.len() {
        return Err(RepertoireError::input(format!(
            "features ({}) and classes ({}) must have the same length",
            features.len(),
            classes.len()
        )));
    }
    if n_classes < 2 {
        return Err(RepertoireError::input(
            "training requires at least two distinct genres",
        ));
    }
    if let Some(&bad) = classes.iter().find(|&&c| c >= n_classes) {
        return Err(RepertoireError::input(format!(
            "class index {bad} out of range for {n_classes} classes"
        )));
    }

    let n_features = features[0].len();
    if features.iter().any(|row| row.len() != n_features) {
        return Err(RepertoireError::input(
            "feature vectors must all have the same length",
        ));
    }

    Ok(n_features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_algorithms() {
        assert_eq!(Algorithm::parse_str("svm").unwrap(), Algorithm::Svm);
        assert_eq!(Algorithm::parse_str("logreg").unwrap(), Algorithm::Logreg);
        assert_eq!(Algorithm::parse_str("nb").unwrap(), Algorithm::Nb);
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let err = Algorithm::parse_str("forest").unwrap_err();
        match err {
            RepertoireError::Configuration(msg) => assert!(msg.contains("forest")),
            other => panic!("Expected configuration error, got {other}"),
        }
    }

    #[test]
    fn test_capability_per_algorithm() {
        assert_eq!(
            Algorithm::Svm.build().capability(),
            ScoreCapability::MarginBased
        );
        assert_eq!(
            Algorithm::Logreg.build().capability(),
            ScoreCapability::Probabilistic
        );
        assert_eq!(
            Algorithm::Nb.build().capability(),
            ScoreCapability::Probabilistic
        );
    }

    #[test]
    fn test_check_training_set() {
        let features = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(check_training_set(&features, &[0, 1], 2).unwrap(), 2);

        assert!(check_training_set(&[], &[], 2).is_err());
        assert!(check_training_set(&features, &[0], 2).is_err());
        assert!(check_training_set(&features, &[0, 0], 1).is_err());
        assert!(check_training_set(&features, &[0, 5], 2).is_err());

        let ragged = vec![vec![1.0], vec![0.0, 1.0]];
        assert!(check_training_set(&ragged, &[0, 1], 2).is_err());
    }
}
