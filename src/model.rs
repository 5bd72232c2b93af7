//! The trained model artifact: vectorizer + classifier + labels.
//!
//! A [`GenreModel`] is immutable after training and serializes to a single
//! JSON artifact. Only this crate's loader reads it back; the vocabulary
//! inside is frozen, so predictions are reproducible across processes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::{Algorithm, Classifier, TrainedClassifier};
use crate::error::{RepertoireError, Result};
use crate::metrics::unique_labels;
use crate::ranking::top_k;
use crate::scoring::normalize_scores;
use crate::vectorize::TfIdfVectorizer;

/// Metadata recorded at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Algorithm name (`svm`, `logreg`, `nb`).
    pub algorithm: String,
    /// Training timestamp.
    pub trained_at: chrono::DateTime<chrono::Utc>,
    /// Number of training examples.
    pub training_examples: usize,
    /// Size of the fitted vocabulary.
    pub vocabulary_size: usize,
    /// Crate version that produced the artifact.
    pub version: String,
}

/// One genre prediction with its ranked alternatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_genre: String,
    pub confidence: f64,
    pub top_k: Vec<TopEntry>,
}

/// One entry of the ranked top-k list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopEntry {
    pub genre: String,
    pub score: f64,
}

/// A fitted vectorizer/classifier pair with its label list.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenreModel {
    vectorizer: TfIdfVectorizer,
    classifier: TrainedClassifier,
    /// Labels seen at fit time, sorted; class indices point into this list.
    labels: Vec<String>,
    metadata: ModelMetadata,
}

impl GenreModel {
    /// Fit a model on parallel training texts and genre labels.
    pub fn fit(algorithm: Algorithm, texts: &[String], genres: &[String]) -> Result<Self> {
        if texts.is_empty() || texts.len() != genres.len() {
            return Err(RepertoireError::input(
                "training requires parallel, non-empty texts and genres",
            ));
        }

        let labels = unique_labels(genres);
        if labels.len() < 2 {
            return Err(RepertoireError::input(
                "training requires at least two distinct genres",
            ));
        }

        let classes: Vec<usize> = genres
            .iter()
            .map(|g| labels.binary_search(g).unwrap_or(0))
            .collect();

        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(texts)?;
        let features = vectorizer.transform_batch(texts)?;

        let mut classifier = algorithm.build();
        classifier.fit(&features, &classes, labels.len())?;

        let metadata = ModelMetadata {
            algorithm: algorithm.name().to_string(),
            trained_at: chrono::Utc::now(),
            training_examples: texts.len(),
            vocabulary_size: vectorizer.vocabulary_size(),
            version: crate::VERSION.to_string(),
        };

        Ok(Self {
            vectorizer,
            classifier,
            labels,
            metadata,
        })
    }

    /// Predict the genre of one text, with a ranked top-k list.
    ///
    /// The input is trimmed first; an empty input is an input error.
    pub fn predict(&self, text: &str, k: usize) -> Result<Prediction> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RepertoireError::input("input text is empty"));
        }

        let features = self.vectorizer.transform(trimmed)?;
        let scores = normalize_scores(&self.classifier, &features, self.labels.len())?;

        let mut best = 0;
        for (idx, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = idx;
            }
        }

        let top_k = top_k(&self.labels, &scores, k)
            .into_iter()
            .map(|(genre, score)| TopEntry { genre, score })
            .collect();

        Ok(Prediction {
            predicted_genre: self.labels[best].clone(),
            confidence: scores[best],
            top_k,
        })
    }

    /// Predict a bare genre label per text, for evaluation.
    pub fn predict_labels(&self, texts: &[String]) -> Result<Vec<String>> {
        texts
            .iter()
            .map(|text| {
                let features = self.vectorizer.transform(text)?;
                let class = self.classifier.predict(&features)?;
                Ok(self.labels[class].clone())
            })
            .collect()
    }

    /// Labels seen during training, sorted.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Persist the artifact as a single JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load an artifact written by [`GenreModel::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepertoireError::model(format!(
                "failed to read model from {}: {e}",
                path.as_ref().display()
            ))
        })?;

        let model: GenreModel = serde_json::from_str(&content).map_err(|e| {
            RepertoireError::model(format!(
                "failed to parse model from {}: {e}",
                path.as_ref().display()
            ))
        })?;

        if !model.vectorizer.is_fitted() || !model.classifier.is_trained() {
            return Err(RepertoireError::model(
                "model artifact holds an unfitted pipeline",
            ));
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn training_data() -> (Vec<String>, Vec<String>) {
        let rows = [
            ("blue moon slow jazz ballad", "jazz"),
            ("so what modal jazz trumpet", "jazz"),
            ("take five cool jazz quartet", "jazz"),
            ("autumn leaves jazz standard", "jazz"),
            ("back in black hard rock riff", "rock"),
            ("thunderstruck stadium rock anthem", "rock"),
            ("paranoid heavy rock classic", "rock"),
            ("war pigs rock protest song", "rock"),
        ];
        (
            rows.iter().map(|(t, _)| t.to_string()).collect(),
            rows.iter().map(|(_, g)| g.to_string()).collect(),
        )
    }

    #[test]
    fn test_fit_and_predict() {
        let (texts, genres) = training_data();
        let model = GenreModel::fit(Algorithm::Svm, &texts, &genres).unwrap();

        assert_eq!(model.labels(), ["jazz", "rock"]);

        let prediction = model.predict("blue moon jazz standard", 3).unwrap();
        assert!(["jazz", "rock"].contains(&prediction.predicted_genre.as_str()));
        assert!(prediction.top_k.len() <= 2);
        assert_eq!(prediction.confidence, prediction.top_k[0].score);
    }

    #[test]
    fn test_prediction_scores_form_a_distribution() {
        let (texts, genres) = training_data();

        for algorithm in [Algorithm::Svm, Algorithm::Logreg, Algorithm::Nb] {
            let model = GenreModel::fit(algorithm, &texts, &genres).unwrap();
            let prediction = model.predict("jazz trumpet ballad", 10).unwrap();

            let sum: f64 = prediction.top_k.iter().map(|e| e.score).sum();
            assert!(
                (sum - 1.0).abs() < 1e-6,
                "{} scores sum to {sum}",
                algorithm.name()
            );
            assert!(prediction.top_k.iter().all(|e| e.score >= 0.0));
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let (texts, genres) = training_data();
        let model = GenreModel::fit(Algorithm::Nb, &texts, &genres).unwrap();

        assert!(model.predict("   ", 3).is_err());
    }

    #[test]
    fn test_single_genre_is_rejected() {
        let texts = vec!["blue moon".to_string(), "so what".to_string()];
        let genres = vec!["jazz".to_string(), "jazz".to_string()];

        assert!(GenreModel::fit(Algorithm::Svm, &texts, &genres).is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let (texts, genres) = training_data();
        let model = GenreModel::fit(Algorithm::Logreg, &texts, &genres).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("models/model.json");
        model.save(&path).unwrap();

        let loaded = GenreModel::load(&path).unwrap();
        assert_eq!(loaded.labels(), model.labels());
        assert_eq!(loaded.metadata().algorithm, "logreg");

        let before = model.predict("heavy rock anthem", 2).unwrap();
        let after = loaded.predict("heavy rock anthem", 2).unwrap();
        assert_eq!(before.predicted_genre, after.predicted_genre);
        assert_eq!(before.confidence, after.confidence);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not a model").unwrap();

        assert!(GenreModel::load(&path).is_err());
        assert!(GenreModel::load(dir.path().join("missing.json")).is_err());
    }
}
