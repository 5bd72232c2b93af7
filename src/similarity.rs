//! Cosine similarity search over a vectorized corpus.
//!
//! The similar driver works against a corpus, not a trained model: it fits a
//! fresh vectorizer on the corpus texts and ranks every record against a
//! query vector taken either from a record id or from free text.

use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::error::{RepertoireError, Result};
use crate::ranking::rank_indices;
use crate::vectorize::TfIdfVectorizer;

/// Sentinel score for the queried record itself: lower than any real cosine
/// score, so the record can never reach the results even on ties.
const SELF_SCORE: f64 = -1.0;

/// How the query vector is obtained.
#[derive(Debug, Clone)]
pub enum SimilarityQuery {
    /// Use an existing record's vector; that record is excluded from results.
    Id(String),
    /// Vectorize free text against the corpus vocabulary.
    Text(String),
}

/// One ranked similarity result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarHit {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub score: f64,
}

/// Cosine similarity between two equal-length vectors.
///
/// Zero vectors have no direction and score 0 against everything.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Rank corpus records by similarity to the query, best first.
pub fn find_similar(
    corpus: &Corpus,
    query: &SimilarityQuery,
    top_n: usize,
) -> Result<Vec<SimilarHit>> {
    if corpus.is_empty() {
        return Err(RepertoireError::input("no valid rows found in CSV"));
    }

    let texts = corpus.texts();
    let mut vectorizer = TfIdfVectorizer::new();
    vectorizer.fit(&texts)?;
    let matrix = vectorizer.transform_batch(&texts)?;

    let (query_vector, exclude_idx) = match query {
        SimilarityQuery::Id(id) => {
            if !corpus.has_id_column() {
                return Err(RepertoireError::input(
                    "CSV must include an 'id' column when querying by id",
                ));
            }
            let idx = corpus.find_by_id(id).ok_or_else(|| {
                RepertoireError::input(format!("no record with id: {id}"))
            })?;
            (matrix[idx].clone(), Some(idx))
        }
        SimilarityQuery::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(RepertoireError::input("query text is empty"));
            }
            (vectorizer.transform(trimmed)?, None)
        }
    };

    let mut scores: Vec<f64> = matrix
        .iter()
        .map(|row| cosine_similarity(&query_vector, row))
        .collect();
    if let Some(idx) = exclude_idx {
        scores[idx] = SELF_SCORE;
    }

    let hits = rank_indices(&scores)
        .into_iter()
        .take(top_n)
        .map(|idx| {
            let record = &corpus.records()[idx];
            SimilarHit {
                id: record.id.clone(),
                title: record.title.clone(),
                artist: record.artist.clone(),
                genre: record.genre.clone(),
                score: scores[idx],
            }
        })
        .collect();

    Ok(hits)
}
