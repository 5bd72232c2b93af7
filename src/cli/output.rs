//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::ClassificationReport;

/// Result structure for a completed training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub algorithm: String,
    pub model_path: String,
    pub report_path: String,
    pub matrix_path: String,
    pub labels_path: String,
}

/// Print any serializable result as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

/// Render a classification report as an aligned text table.
pub fn format_report(report: &ClassificationReport) -> String {
    let width = report
        .per_label
        .keys()
        .map(|label| label.len())
        .chain(["weighted avg".len()].into_iter())
        .max()
        .unwrap_or(12);

    let mut out = String::new();
    out.push_str(&format!(
        "{:>width$}  precision  recall  f1-score  support\n\n",
        "",
        width = width
    ));

    for (label, m) in &report.per_label {
        out.push_str(&format!(
            "{label:>width$}  {:>9.2}  {:>6.2}  {:>8.2}  {:>7}\n",
            m.precision,
            m.recall,
            m.f1_score,
            m.support,
            width = width
        ));
    }

    out.push_str(&format!(
        "\n{:>width$}  {:>9}  {:>6}  {:>8.2}  {:>7}\n",
        "accuracy",
        "",
        "",
        report.accuracy,
        report.macro_avg.support,
        width = width
    ));

    for (name, m) in [
        ("macro avg", &report.macro_avg),
        ("weighted avg", &report.weighted_avg),
    ] {
        out.push_str(&format!(
            "{name:>width$}  {:>9.2}  {:>6.2}  {:>8.2}  {:>7}\n",
            m.precision,
            m.recall,
            m.f1_score,
            m.support,
            width = width
        ));
    }

    out
}
