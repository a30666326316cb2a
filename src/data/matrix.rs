//! Response stream validation and matrix construction.
//!
//! This module turns a per-competency stream of `(respondent, item,
//! response)` records into a clean respondent × item matrix that is safe
//! to calibrate.
//!
//! Design goals:
//! - **Single pass** over the stream (it may not be replayable)
//! - **Deterministic behavior**: respondent and item order is first-seen
//!   order, never map iteration order
//! - **Separation of concerns**: no estimation logic here
//!
//! Validation rules:
//! - at least `min_respondents` distinct respondents (JMLE bias grows
//!   unacceptable with small samples)
//! - items whose proportion-correct falls outside
//!   `(p_value_min, p_value_max)` are excluded: at such extremes the
//!   logistic curve is not identifiable from finite data
//! - at least `min_items` items must survive the filter

use std::collections::HashMap;

use crate::domain::{CalibrationConfig, ResponseRecord};
use crate::error::CalibrationError;

/// Validated respondent × item response matrix for one competency.
///
/// Cells are `None` for unobserved (respondent, item) pairs; estimators
/// skip them. Owned by a single calibration run and discarded after it.
#[derive(Debug, Clone)]
pub struct ResponseMatrix {
    pub competency_id: String,
    /// Surviving items, in first-seen input order.
    pub item_ids: Vec<String>,
    /// Distinct respondents, in first-seen input order.
    pub respondent_ids: Vec<String>,
    /// Row-major: `cells[r * item_ids.len() + i]`.
    cells: Vec<Option<f64>>,
}

impl ResponseMatrix {
    pub fn n_items(&self) -> usize {
        self.item_ids.len()
    }

    pub fn n_respondents(&self) -> usize {
        self.respondent_ids.len()
    }

    /// One respondent's response vector, aligned with `item_ids`.
    pub fn respondent_row(&self, r: usize) -> &[Option<f64>] {
        let n = self.n_items();
        &self.cells[r * n..(r + 1) * n]
    }

    /// One item's response column, aligned with `respondent_ids`.
    pub fn item_column(&self, i: usize) -> Vec<Option<f64>> {
        let n = self.n_items();
        (0..self.n_respondents()).map(|r| self.cells[r * n + i]).collect()
    }
}

/// Build a validated matrix from a single-pass record stream.
///
/// On success the matrix holds only items whose proportion-correct lies
/// inside the configured bounds, preserving input order. Duplicate
/// (respondent, item) pairs keep the last observation.
pub fn build_matrix(
    competency_id: &str,
    records: impl IntoIterator<Item = ResponseRecord>,
    config: &CalibrationConfig,
) -> Result<ResponseMatrix, CalibrationError> {
    let mut respondent_index: HashMap<String, usize> = HashMap::new();
    let mut respondent_ids: Vec<String> = Vec::new();
    let mut item_index: HashMap<String, usize> = HashMap::new();
    let mut item_ids: Vec<String> = Vec::new();
    // (respondent, item, response) with interned indices.
    let mut triples: Vec<(usize, usize, f64)> = Vec::new();

    for record in records {
        let r = *respondent_index
            .entry(record.respondent_id.clone())
            .or_insert_with(|| {
                respondent_ids.push(record.respondent_id.clone());
                respondent_ids.len() - 1
            });
        let i = *item_index.entry(record.item_id.clone()).or_insert_with(|| {
            item_ids.push(record.item_id.clone());
            item_ids.len() - 1
        });
        triples.push((r, i, record.response));
    }

    let n_respondents = respondent_ids.len();
    if n_respondents < config.min_respondents {
        return Err(CalibrationError::InsufficientRespondents {
            actual: n_respondents,
            required: config.min_respondents,
        });
    }

    // Proportion-correct per item over observed responses.
    let mut sums = vec![0.0_f64; item_ids.len()];
    let mut counts = vec![0_usize; item_ids.len()];
    for &(_, i, response) in &triples {
        sums[i] += response;
        counts[i] += 1;
    }

    // Keep items identifiable from the data; `keep[i]` maps an original
    // item index to its surviving position.
    let mut keep: Vec<Option<usize>> = vec![None; item_ids.len()];
    let mut surviving_ids: Vec<String> = Vec::new();
    for (i, id) in item_ids.iter().enumerate() {
        if counts[i] == 0 {
            continue;
        }
        let p_value = sums[i] / counts[i] as f64;
        if p_value < config.p_value_min || p_value > config.p_value_max {
            continue;
        }
        keep[i] = Some(surviving_ids.len());
        surviving_ids.push(id.clone());
    }

    if surviving_ids.len() < config.min_items {
        return Err(CalibrationError::InsufficientItems {
            actual: surviving_ids.len(),
            required: config.min_items,
        });
    }

    let n_items = surviving_ids.len();
    let mut cells = vec![None; n_respondents * n_items];
    for (r, i, response) in triples {
        if let Some(col) = keep[i] {
            cells[r * n_items + col] = Some(response);
        }
    }

    Ok(ResponseMatrix {
        competency_id: competency_id.to_string(),
        item_ids: surviving_ids,
        respondent_ids,
        cells,
    })
}
