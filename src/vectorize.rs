//! TF-IDF feature extraction over a frozen vocabulary.
//!
//! The vectorizer is stateless until [`TfIdfVectorizer::fit`] is called, at
//! which point the vocabulary and IDF weights are frozen. Every later
//! transform — test rows, prediction inputs, similarity queries — reuses the
//! frozen vocabulary unchanged. Refitting per query is incorrect.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::{Tokenizer, ngrams};
use crate::error::{RepertoireError, Result};

/// Maximum vocabulary size: the most frequent terms are retained.
pub const MAX_FEATURES: usize = 5000;

/// N-gram range: unigrams and bigrams.
pub const NGRAM_RANGE: (usize, usize) = (1, 2);

/// TF-IDF vectorizer with a bag-of-n-grams vocabulary.
///
/// Weighting is raw term count times smoothed IDF,
/// `idf(t) = ln((1 + N) / (1 + df(t))) + 1`, followed by L2 normalization of
/// each document vector.
#[derive(Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Vocabulary: term -> column index.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column.
    idf: Vec<f64>,
    /// Number of documents seen at fit time.
    n_documents: usize,
    max_features: usize,
    ngram_range: (usize, usize),
    #[serde(skip, default)]
    tokenizer: Tokenizer,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("max_features", &self.max_features)
            .field("ngram_range", &self.ngram_range)
            .finish()
    }
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer with the standard hyperparameters.
    pub fn new() -> Self {
        Self::with_params(MAX_FEATURES, NGRAM_RANGE)
    }

    /// Create an unfitted vectorizer with explicit hyperparameters.
    pub fn with_params(max_features: usize, ngram_range: (usize, usize)) -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            max_features,
            ngram_range,
            tokenizer: Tokenizer::default(),
        }
    }

    /// Extract the n-gram terms of one document.
    fn terms(&self, document: &str) -> Vec<String> {
        let tokens = self.tokenizer.tokenize(document);
        ngrams(&tokens, self.ngram_range.0, self.ngram_range.1)
    }

    /// Fit the vocabulary and IDF weights on a corpus of documents.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(RepertoireError::input("cannot fit on an empty corpus"));
        }

        let mut term_frequency: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = self.terms(doc);
            let unique_terms: HashSet<&String> = terms.iter().collect();

            for term in &unique_terms {
                *document_frequency.entry((*term).clone()).or_insert(0) += 1;
            }
            for term in terms {
                *term_frequency.entry(term).or_insert(0) += 1;
            }
        }

        // Keep the most frequent terms, ties broken alphabetically.
        let mut ranked: Vec<(String, usize)> = term_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);

        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(ranked.len());
        let mut idf = vec![0.0; ranked.len()];

        for (idx, (term, _)) in ranked.into_iter().enumerate() {
            let df = document_frequency.get(&term).copied().unwrap_or(0) as f64;
            idf[idx] = ((1.0 + n) / (1.0 + df)).ln() + 1.0;
            vocabulary.insert(term, idx);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.n_documents = documents.len();

        Ok(())
    }

    /// Transform one document into a TF-IDF feature vector.
    ///
    /// Terms outside the frozen vocabulary are ignored; a document with no
    /// known terms maps to the zero vector.
    pub fn transform(&self, document: &str) -> Result<Vec<f64>> {
        if self.vocabulary.is_empty() {
            return Err(RepertoireError::model("vectorizer has not been fitted"));
        }

        let mut features = vec![0.0; self.vocabulary.len()];
        for term in self.terms(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                features[idx] += 1.0;
            }
        }

        for (idx, value) in features.iter_mut().enumerate() {
            *value *= self.idf[idx];
        }

        let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        Ok(features)
    }

    /// Transform a batch of documents.
    pub fn transform_batch(&self, documents: &[String]) -> Result<Vec<Vec<f64>>> {
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    /// Whether the vocabulary has been fitted.
    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Get the size of the fitted vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_fit_and_transform() {
        let documents = docs(&[
            "blue moon jazz standard",
            "back in black hard rock",
            "so what modal jazz",
        ]);

        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&documents).unwrap();
        assert!(vectorizer.is_fitted());
        assert!(vectorizer.vocabulary_size() > 0);

        let features = vectorizer.transform("blue moon").unwrap();
        assert_eq!(features.len(), vectorizer.vocabulary_size());
        assert!(features.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let documents = docs(&["blue moon jazz", "black rock anthem"]);

        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&documents).unwrap();

        let features = vectorizer.transform("blue moon jazz").unwrap();
        let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unseen_terms_map_to_zero_vector() {
        let documents = docs(&["blue moon jazz", "black rock anthem"]);

        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&documents).unwrap();

        let features = vectorizer.transform("entirely unknown words").unwrap();
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let documents = docs(&["one two three four five", "six seven eight nine ten"]);

        let mut vectorizer = TfIdfVectorizer::with_params(3, (1, 1));
        vectorizer.fit(&documents).unwrap();

        assert_eq!(vectorizer.vocabulary_size(), 3);
    }

    #[test]
    fn test_fit_on_empty_corpus_fails() {
        let mut vectorizer = TfIdfVectorizer::new();
        assert!(vectorizer.fit(&[]).is_err());
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let vectorizer = TfIdfVectorizer::new();
        assert!(vectorizer.transform("blue moon").is_err());
    }

    #[test]
    fn test_vocabulary_is_frozen_after_fit() {
        let documents = docs(&["blue moon jazz", "black rock anthem"]);

        let mut vectorizer = TfIdfVectorizer::new();
        vectorizer.fit(&documents).unwrap();
        let size = vectorizer.vocabulary_size();

        // Terms absent from the fit corpus never extend the vocabulary.
        let features = vectorizer.transform("totally new words").unwrap();
        assert_eq!(features.len(), size);
        assert_eq!(vectorizer.vocabulary_size(), size);
    }
}
