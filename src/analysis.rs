//! Text analysis: word tokenization and n-gram expansion.

use regex::Regex;

use crate::error::{RepertoireError, Result};

/// A regex-based word tokenizer.
///
/// The default pattern `\w\w+` keeps word tokens of at least two characters,
/// so single-letter noise ("a", "I") never enters the vocabulary. Input is
/// lowercased before matching.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    /// Create a tokenizer with the default word pattern.
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w\w+")
    }

    /// Create a tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| RepertoireError::configuration(format!("invalid token pattern: {e}")))?;

        Ok(Tokenizer { pattern: regex })
    }

    /// Split text into lowercased word tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|mat| mat.as_str().to_string())
            .collect()
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new().expect("Default token pattern should be valid")
    }
}

/// Expand tokens into space-joined n-grams for every n in `min_n..=max_n`.
///
/// A document shorter than `n` tokens contributes no n-grams at that size.
pub fn ngrams(tokens: &[String], min_n: usize, max_n: usize) -> Vec<String> {
    let mut terms = Vec::new();

    for n in min_n.max(1)..=max_n {
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }

    terms
}
