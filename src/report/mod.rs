//! Formatted terminal output for predictions and batch runs.
//!
//! Formatting is kept in one place so the pipeline code stays clean and
//! testable, and output changes are localized.

use crate::domain::{BatchReport, BatchRowOutcome, ClassLabel, PredictionResult};

/// Format one prediction for terminal output.
pub fn format_prediction(result: &PredictionResult) -> String {
    let mut out = String::new();

    out.push_str("=== tvet - Transit Signal Vetting ===\n");
    out.push_str(&format!(
        "Prediction: {} (confidence {:.1}%)\n",
        result.label.display_name(),
        result.confidence * 100.0
    ));

    out.push_str("\nClass probabilities:\n");
    for label in [
        ClassLabel::Confirmed,
        ClassLabel::Candidate,
        ClassLabel::FalsePositive,
    ] {
        let chosen = if label == result.label { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<15} {:>6.2}%\n",
            label.display_name(),
            result.probabilities.get(label) * 100.0
        ));
    }

    out.push_str("\nTop feature importances:\n");
    for fw in &result.feature_importance {
        out.push_str(&format!("  {:<26} {:.4}\n", fw.feature, fw.weight));
    }

    if !result.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &result.warnings {
            out.push_str(&format!("  - {w}\n"));
        }
    }

    out
}

/// Format the batch summary: totals plus per-class counts and row errors.
pub fn format_batch_summary(report: &BatchReport) -> String {
    let mut out = String::new();

    out.push_str("=== tvet - Batch Summary ===\n");
    out.push_str(&format!(
        "Rows: {} | succeeded: {} | failed: {}\n",
        report.total_rows, report.total_succeeded, report.total_failed
    ));

    let mut class_counts = [0usize; 3];
    for row in &report.rows {
        if let BatchRowOutcome::Ok { result, .. } = row {
            class_counts[result.label.index()] += 1;
        }
    }
    out.push_str("\nPredicted classes:\n");
    for label in [
        ClassLabel::Confirmed,
        ClassLabel::Candidate,
        ClassLabel::FalsePositive,
    ] {
        out.push_str(&format!(
            "  {:<15} {}\n",
            label.display_name(),
            class_counts[label.index()]
        ));
    }

    let errors: Vec<&BatchRowOutcome> = report.rows.iter().filter(|r| !r.is_ok()).collect();
    if !errors.is_empty() {
        out.push_str("\nRow errors:\n");
        for row in errors {
            if let BatchRowOutcome::Error {
                row_index,
                kind,
                message,
            } = row
            {
                out.push_str(&format!("  row {row_index} [{kind}]: {message}\n"));
            }
        }
    }

    out
}
