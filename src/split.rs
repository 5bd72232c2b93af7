//! Train/test partitioning with stratified preference.
//!
//! A stratified split (each label proportionally represented on both sides)
//! is attempted first. When stratification is infeasible the split falls back
//! to a seeded uniform shuffle; the fallback is an explicit, logged control
//! path, not a caught failure. Both branches are deterministic for a given
//! seed.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{RepertoireError, Result};

/// The outcome of a train/test partition.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train_texts: Vec<String>,
    pub test_texts: Vec<String>,
    pub train_labels: Vec<String>,
    pub test_labels: Vec<String>,
    /// Whether the stratified branch was taken.
    pub stratified: bool,
}

impl TrainTestSplit {
    pub fn train_len(&self) -> usize {
        self.train_texts.len()
    }

    pub fn test_len(&self) -> usize {
        self.test_texts.len()
    }
}

/// Partition parallel texts and labels into train and test sets.
///
/// The test side holds `ceil(n * test_fraction)` rows, clamped so both sides
/// are non-empty.
pub fn split_train_test(
    texts: &[String],
    labels: &[String],
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if texts.len() != labels.len() {
        return Err(RepertoireError::configuration(format!(
            "texts ({}) and labels ({}) must have the same length",
            texts.len(),
            labels.len()
        )));
    }
    if texts.len() < 2 {
        return Err(RepertoireError::input(
            "need at least two records to split into train and test sets",
        ));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(RepertoireError::configuration(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let n = texts.len();
    let n_test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);

    let mut rng = StdRng::seed_from_u64(seed);
    let (test_indices, stratified) = match stratified_test_indices(labels, n_test, &mut rng) {
        Some(indices) => (indices, true),
        None => {
            log::warn!(
                "stratified split infeasible for {n} rows / {n_test} test rows, \
                 falling back to a uniform shuffle"
            );
            (uniform_test_indices(n, n_test, &mut rng), false)
        }
    };

    let mut in_test = vec![false; n];
    for &idx in &test_indices {
        in_test[idx] = true;
    }

    let mut split = TrainTestSplit {
        train_texts: Vec::with_capacity(n - n_test),
        test_texts: Vec::with_capacity(n_test),
        train_labels: Vec::with_capacity(n - n_test),
        test_labels: Vec::with_capacity(n_test),
        stratified,
    };

    for idx in 0..n {
        if in_test[idx] {
            split.test_texts.push(texts[idx].clone());
            split.test_labels.push(labels[idx].clone());
        } else {
            split.train_texts.push(texts[idx].clone());
            split.train_labels.push(labels[idx].clone());
        }
    }

    Ok(split)
}

/// Pick test indices preserving per-class proportions, or `None` when
/// stratification is infeasible.
///
/// Feasibility requires every class to have at least two members and both
/// sides to be able to hold one member of every class.
fn stratified_test_indices(
    labels: &[String],
    n_test: usize,
    rng: &mut StdRng,
) -> Option<Vec<usize>> {
    let n = labels.len();

    // BTreeMap keeps class iteration order deterministic.
    let mut classes: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, label) in labels.iter().enumerate() {
        classes.entry(label.as_str()).or_default().push(idx);
    }

    let k = classes.len();
    if k < 2 {
        // A single class stratifies trivially; treat it like the uniform case.
        return None;
    }
    if n_test < k || n - n_test < k {
        return None;
    }
    if classes.values().any(|members| members.len() < 2) {
        return None;
    }

    let sizes: Vec<usize> = classes.values().map(Vec::len).collect();
    let counts = allocate_test_counts(&sizes, n_test)?;

    let mut test_indices = Vec::with_capacity(n_test);
    for (members, &count) in classes.values_mut().zip(counts.iter()) {
        members.shuffle(rng);
        test_indices.extend_from_slice(&members[..count]);
    }

    Some(test_indices)
}

/// Largest-remainder allocation of `n_test` across classes, keeping every
/// class represented on both sides (1..=size-1 per class).
fn allocate_test_counts(sizes: &[usize], n_test: usize) -> Option<Vec<usize>> {
    let n: usize = sizes.iter().sum();
    let k = sizes.len();

    let mut counts = Vec::with_capacity(k);
    let mut fractions = Vec::with_capacity(k);
    for &size in sizes {
        let exact = size as f64 * n_test as f64 / n as f64;
        let base = (exact.floor() as usize).clamp(1, size - 1);
        counts.push(base);
        fractions.push(exact - exact.floor());
    }

    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| {
        fractions[b]
            .partial_cmp(&fractions[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut assigned: usize = counts.iter().sum();
    let mut steps = 0;
    while assigned != n_test {
        // Feasibility bounds (k <= n_test <= n - k) guarantee convergence.
        steps += 1;
        if steps > 2 * n {
            return None;
        }

        if assigned < n_test {
            for &c in &order {
                if counts[c] < sizes[c] - 1 {
                    counts[c] += 1;
                    assigned += 1;
                    break;
                }
            }
        } else {
            for &c in order.iter().rev() {
                if counts[c] > 1 {
                    counts[c] -= 1;
                    assigned -= 1;
                    break;
                }
            }
        }
    }

    Some(counts)
}

fn uniform_test_indices(n: usize, n_test: usize, rng: &mut StdRng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.truncate(n_test);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(rows: &[(&str, &str)]) -> (Vec<String>, Vec<String>) {
        let texts = rows.iter().map(|(t, _)| t.to_string()).collect();
        let labels = rows.iter().map(|(_, l)| l.to_string()).collect();
        (texts, labels)
    }

    fn ten_rows() -> (Vec<String>, Vec<String>) {
        corpus(&[
            ("blue moon", "jazz"),
            ("so what", "jazz"),
            ("take five", "jazz"),
            ("round midnight", "jazz"),
            ("autumn leaves", "jazz"),
            ("back in black", "rock"),
            ("thunderstruck", "rock"),
            ("paranoid", "rock"),
            ("iron man", "rock"),
            ("war pigs", "rock"),
        ])
    }

    #[test]
    fn test_sizes_sum_to_corpus_size() {
        let (texts, labels) = ten_rows();
        let split = split_train_test(&texts, &labels, 0.2, 42).unwrap();

        assert_eq!(split.train_len() + split.test_len(), texts.len());
        assert_eq!(split.test_len(), 2);
        assert!(split.stratified);
    }

    #[test]
    fn test_stratified_keeps_class_proportions() {
        let (texts, labels) = ten_rows();
        let split = split_train_test(&texts, &labels, 0.2, 42).unwrap();

        let jazz_test = split.test_labels.iter().filter(|l| *l == "jazz").count();
        let rock_test = split.test_labels.iter().filter(|l| *l == "rock").count();
        assert_eq!(jazz_test, 1);
        assert_eq!(rock_test, 1);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let (texts, labels) = ten_rows();
        let first = split_train_test(&texts, &labels, 0.3, 7).unwrap();
        let second = split_train_test(&texts, &labels, 0.3, 7).unwrap();

        assert_eq!(first.train_texts, second.train_texts);
        assert_eq!(first.test_texts, second.test_texts);
        assert_eq!(first.train_labels, second.train_labels);
        assert_eq!(first.test_labels, second.test_labels);
    }

    #[test]
    fn test_singleton_class_falls_back_to_uniform() {
        let (texts, labels) = corpus(&[
            ("blue moon", "jazz"),
            ("so what", "jazz"),
            ("take five", "jazz"),
            ("back in black", "rock"),
            ("orchestral suite", "classical"),
        ]);

        let split = split_train_test(&texts, &labels, 0.4, 11).unwrap();
        assert!(!split.stratified);
        assert_eq!(split.train_len() + split.test_len(), 5);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let (texts, labels) = corpus(&[
            ("blue moon", "jazz"),
            ("back in black", "rock"),
            ("orchestral suite", "classical"),
        ]);

        let first = split_train_test(&texts, &labels, 0.34, 3).unwrap();
        let second = split_train_test(&texts, &labels, 0.34, 3).unwrap();
        assert!(!first.stratified);
        assert_eq!(first.test_texts, second.test_texts);
    }

    #[test]
    fn test_invalid_fraction_is_rejected() {
        let (texts, labels) = ten_rows();
        assert!(split_train_test(&texts, &labels, 0.0, 1).is_err());
        assert!(split_train_test(&texts, &labels, 1.0, 1).is_err());
    }

    #[test]
    fn test_mismatched_lengths_are_rejected() {
        let (texts, _) = ten_rows();
        assert!(split_train_test(&texts, &["jazz".to_string()], 0.2, 1).is_err());
    }

    #[test]
    fn test_too_small_corpus_is_rejected() {
        let err = split_train_test(&["one".to_string()], &["jazz".to_string()], 0.2, 1);
        assert!(err.is_err());
    }

    #[test]
    fn test_allocation_covers_every_class() {
        let counts = allocate_test_counts(&[5, 5, 10], 4).unwrap();
        assert_eq!(counts.iter().sum::<usize>(), 4);
        assert!(counts.iter().all(|&c| c >= 1));
    }
}
