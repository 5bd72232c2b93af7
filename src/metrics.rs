//! Classification metrics: per-label report and confusion matrix.
//!
//! The JSON report keeps the key layout downstream consumers already parse:
//! one entry per label plus `"accuracy"`, `"macro avg"`, and
//! `"weighted avg"`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Precision/recall/F1 and support for one label (or one average row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: usize,
}

/// Full classification report over a test split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    #[serde(flatten)]
    pub per_label: BTreeMap<String, ClassMetrics>,
    pub accuracy: f64,
    #[serde(rename = "macro avg")]
    pub macro_avg: ClassMetrics,
    #[serde(rename = "weighted avg")]
    pub weighted_avg: ClassMetrics,
}

/// Unique labels of a slice, sorted ascending.
pub fn unique_labels(labels: &[String]) -> Vec<String> {
    let set: BTreeSet<&String> = labels.iter().collect();
    set.into_iter().cloned().collect()
}

/// Compute the classification report for parallel truth/prediction lists.
///
/// Labels are the sorted union of both lists, so a label that was only ever
/// predicted still gets a row (with zero support).
pub fn classification_report(y_true: &[String], y_pred: &[String]) -> ClassificationReport {
    let mut all = y_true.to_vec();
    all.extend_from_slice(y_pred);
    let labels = unique_labels(&all);

    let n = y_true.len();
    let mut per_label = BTreeMap::new();
    let mut macro_sum = (0.0, 0.0, 0.0);
    let mut weighted_sum = (0.0, 0.0, 0.0);

    for label in &labels {
        let tp = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| *t == label && *p == label)
            .count() as f64;
        let predicted = y_pred.iter().filter(|p| *p == label).count() as f64;
        let support = y_true.iter().filter(|t| *t == label).count();

        let precision = if predicted > 0.0 { tp / predicted } else { 0.0 };
        let recall = if support > 0 { tp / support as f64 } else { 0.0 };
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        macro_sum.0 += precision;
        macro_sum.1 += recall;
        macro_sum.2 += f1_score;
        weighted_sum.0 += precision * support as f64;
        weighted_sum.1 += recall * support as f64;
        weighted_sum.2 += f1_score * support as f64;

        per_label.insert(
            label.clone(),
            ClassMetrics {
                precision,
                recall,
                f1_score,
                support,
            },
        );
    }

    let matches = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    let accuracy = if n > 0 { matches as f64 / n as f64 } else { 0.0 };
    let k = labels.len().max(1) as f64;

    ClassificationReport {
        per_label,
        accuracy,
        macro_avg: ClassMetrics {
            precision: macro_sum.0 / k,
            recall: macro_sum.1 / k,
            f1_score: macro_sum.2 / k,
            support: n,
        },
        weighted_avg: ClassMetrics {
            precision: if n > 0 { weighted_sum.0 / n as f64 } else { 0.0 },
            recall: if n > 0 { weighted_sum.1 / n as f64 } else { 0.0 },
            f1_score: if n > 0 { weighted_sum.2 / n as f64 } else { 0.0 },
            support: n,
        },
    }
}

/// Confusion matrix: `matrix[i][j]` counts rows whose true label is
/// `labels[i]` and predicted label is `labels[j]`.
pub fn confusion_matrix(
    y_true: &[String],
    y_pred: &[String],
    labels: &[String],
) -> Vec<Vec<usize>> {
    let index: BTreeMap<&String, usize> = labels.iter().zip(0..).collect();
    let mut matrix = vec![vec![0; labels.len()]; labels.len()];

    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        if let (Some(&row), Some(&col)) = (index.get(t), index.get(p)) {
            matrix[row][col] += 1;
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_perfect_predictions() {
        let y = labels(&["jazz", "rock", "jazz", "rock"]);
        let report = classification_report(&y, &y);

        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.per_label.len(), 2);
        let jazz = &report.per_label["jazz"];
        assert_eq!(jazz.precision, 1.0);
        assert_eq!(jazz.recall, 1.0);
        assert_eq!(jazz.f1_score, 1.0);
        assert_eq!(jazz.support, 2);
    }

    #[test]
    fn test_partial_predictions() {
        let y_true = labels(&["jazz", "jazz", "rock", "rock"]);
        let y_pred = labels(&["jazz", "rock", "rock", "rock"]);
        let report = classification_report(&y_true, &y_pred);

        assert_eq!(report.accuracy, 0.75);

        let jazz = &report.per_label["jazz"];
        assert_eq!(jazz.precision, 1.0);
        assert_eq!(jazz.recall, 0.5);

        let rock = &report.per_label["rock"];
        assert!((rock.precision - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(rock.recall, 1.0);

        assert_eq!(report.macro_avg.support, 4);
        assert_eq!(report.weighted_avg.support, 4);
    }

    #[test]
    fn test_predicted_only_label_gets_zero_support() {
        let y_true = labels(&["jazz", "jazz"]);
        let y_pred = labels(&["jazz", "rock"]);
        let report = classification_report(&y_true, &y_pred);

        let rock = &report.per_label["rock"];
        assert_eq!(rock.support, 0);
        assert_eq!(rock.recall, 0.0);
    }

    #[test]
    fn test_report_json_layout() {
        let y = labels(&["jazz", "rock"]);
        let report = classification_report(&y, &y);
        let json = serde_json::to_value(&report).unwrap();

        assert!(json.get("jazz").is_some());
        assert!(json.get("accuracy").is_some());
        assert!(json.get("macro avg").is_some());
        assert!(json.get("weighted avg").is_some());
        assert!(json["jazz"].get("f1-score").is_some());
    }

    #[test]
    fn test_confusion_matrix_layout() {
        let y_true = labels(&["jazz", "jazz", "rock"]);
        let y_pred = labels(&["jazz", "rock", "rock"]);
        let names = labels(&["jazz", "rock"]);

        let matrix = confusion_matrix(&y_true, &y_pred, &names);
        assert_eq!(matrix, vec![vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn test_unique_labels_sorted() {
        let y = labels(&["rock", "jazz", "rock", "ambient"]);
        assert_eq!(unique_labels(&y), labels(&["ambient", "jazz", "rock"]));
    }
}
