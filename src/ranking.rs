//! Top-k ranking over parallel label and score lists.

/// Indices of `scores` in descending score order.
///
/// The sort is stable, so equal scores keep their original relative order.
pub fn rank_indices(scores: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    indices
}

/// Pair labels with scores, sort descending, truncate to `k`.
///
/// `k = 0` yields an empty list; `k` beyond the input yields everything.
pub fn top_k(labels: &[String], scores: &[f64], k: usize) -> Vec<(String, f64)> {
    rank_indices(scores)
        .into_iter()
        .take(k)
        .map(|idx| (labels[idx].clone(), scores[idx]))
        .collect()
}
