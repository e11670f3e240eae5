//! Batch orchestration: apply the single-item pipeline per input row.
//!
//! Rows are embarrassingly parallel (the pipeline holds only read-only
//! state), so they are scored across the rayon worker pool. Each row is
//! index-tagged and collected in input order, so the report's i-th entry
//! always corresponds to the i-th input row regardless of execution order.
//!
//! Failure isolation: a row-local error (missing required field, parse
//! failure upstream) becomes an error entry for that row and never aborts
//! the batch. A cooperative cancellation flag is checked before each row;
//! once raised, remaining rows are recorded as cancelled without touching
//! rows already scored.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::domain::{BatchReport, BatchRowOutcome, RawObservation};
use crate::pipeline::Pipeline;

/// Error kind recorded for rows skipped after cancellation.
pub const CANCELLED_KIND: &str = "cancelled";

/// One input row: the observation (or an upstream parse failure) plus its
/// source row index.
#[derive(Debug, Clone)]
pub struct BatchRow {
    pub row_index: usize,
    pub observation: Result<RawObservation, String>,
}

impl BatchRow {
    pub fn new(row_index: usize, observation: RawObservation) -> Self {
        Self {
            row_index,
            observation: Ok(observation),
        }
    }

    pub fn parse_error(row_index: usize, message: impl Into<String>) -> Self {
        Self {
            row_index,
            observation: Err(message.into()),
        }
    }
}

/// Run the full pipeline over a sequence of observations.
pub fn run(pipeline: &Pipeline, observations: &[RawObservation]) -> BatchReport {
    let rows: Vec<BatchRow> = observations
        .iter()
        .enumerate()
        .map(|(i, obs)| BatchRow::new(i, obs.clone()))
        .collect();
    run_rows(pipeline, &rows, None)
}

/// Run the pipeline over pre-parsed rows, optionally cancellable.
///
/// The returned report preserves the order of `rows`.
pub fn run_rows(pipeline: &Pipeline, rows: &[BatchRow], cancel: Option<&AtomicBool>) -> BatchReport {
    let outcomes: Vec<BatchRowOutcome> = rows
        .par_iter()
        .map(|row| score_row(pipeline, row, cancel))
        .collect();

    let total_succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    let total_rows = outcomes.len();
    BatchReport {
        total_rows,
        total_succeeded,
        total_failed: total_rows - total_succeeded,
        rows: outcomes,
    }
}

fn score_row(pipeline: &Pipeline, row: &BatchRow, cancel: Option<&AtomicBool>) -> BatchRowOutcome {
    if let Some(flag) = cancel {
        if flag.load(Ordering::Relaxed) {
            return BatchRowOutcome::Error {
                row_index: row.row_index,
                kind: CANCELLED_KIND.to_string(),
                message: "batch cancelled before this row was processed".to_string(),
            };
        }
    }

    let obs = match &row.observation {
        Ok(obs) => obs,
        Err(message) => {
            return BatchRowOutcome::Error {
                row_index: row.row_index,
                kind: "parse".to_string(),
                message: message.clone(),
            };
        }
    };

    match pipeline.predict(obs) {
        Ok(result) => BatchRowOutcome::Ok {
            row_index: row.row_index,
            result,
        },
        Err(err) => BatchRowOutcome::Error {
            row_index: row.row_index,
            kind: err.kind_name().to_string(),
            message: err.to_string(),
        },
    }
}
