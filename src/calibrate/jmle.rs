//! Joint Maximum Likelihood Estimation over a validated response matrix.
//!
//! Each outer iteration is a pure transformation
//! `(old items, old abilities) → (new items, new abilities, max delta)`:
//!
//! 1. *Ability phase*: every respondent's θ is re-estimated against the
//!    previous iteration's item parameters.
//! 2. *Item phase*: every item's (a, b) is re-estimated against the θ
//!    vector produced by the ability phase.
//!
//! Within a phase nothing is shared mutably: both phases read immutable
//! snapshots and collect into fresh vectors (ordered), so the rayon
//! parallelism cannot observe a partially updated peer value and the run
//! is deterministic for a fixed matrix.
//!
//! Exhausting the iteration cap is not an error; the caller receives
//! `converged = false` with the best current estimates.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::data::ResponseMatrix;
use crate::domain::{CalibrationConfig, ItemParameters};
use crate::estimate::{estimate_difficulty, estimate_discrimination, estimate_theta};
use crate::math::{INFO_EPSILON, probability};

/// Immutable snapshot of all item parameters for one iteration.
#[derive(Debug, Clone)]
pub struct ItemParameterSet {
    pub items: Vec<ItemParameters>,
}

impl ItemParameterSet {
    /// Every item starts at (a, b) = (1.0, 0.0).
    pub fn initial(item_ids: &[String]) -> Self {
        Self {
            items: item_ids.iter().map(ItemParameters::initial).collect(),
        }
    }
}

/// Immutable snapshot of all respondent abilities for one iteration.
#[derive(Debug, Clone)]
pub struct AbilitySet {
    pub thetas: Vec<f64>,
}

impl AbilitySet {
    /// Every respondent starts at θ = 0.
    pub fn initial(n_respondents: usize) -> Self {
        Self {
            thetas: vec![0.0; n_respondents],
        }
    }
}

/// Final state of a calibration run.
#[derive(Debug, Clone)]
pub struct JmleFit {
    pub items: ItemParameterSet,
    pub abilities: AbilitySet,
    pub iterations: usize,
    pub converged: bool,
    /// Largest absolute a/b change during the final iteration.
    pub max_parameter_change: f64,
}

/// Run the full JMLE loop over a validated matrix.
pub fn calibrate_matrix(matrix: &ResponseMatrix, config: &CalibrationConfig) -> JmleFit {
    // Extract item columns once; the loop only reads them.
    let columns: Vec<Vec<Option<f64>>> =
        (0..matrix.n_items()).map(|i| matrix.item_column(i)).collect();

    let mut items = ItemParameterSet::initial(&matrix.item_ids);
    let mut abilities = AbilitySet::initial(matrix.n_respondents());
    let mut converged = false;
    let mut iterations = 0;
    let mut max_change = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        let (new_items, new_abilities, delta) = step(matrix, &columns, &items, config);
        items = new_items;
        abilities = new_abilities;
        max_change = delta;
        iterations = iteration;

        debug!(iteration, max_parameter_change = delta, "jmle iteration");

        if delta < config.convergence_threshold {
            converged = true;
            break;
        }
    }

    attach_standard_errors(&mut items, &columns, &abilities);

    info!(
        competency_id = %matrix.competency_id,
        iterations,
        converged,
        max_parameter_change = max_change,
        "jmle calibration finished"
    );

    JmleFit {
        items,
        abilities,
        iterations,
        converged,
        max_parameter_change: max_change,
    }
}

/// One outer iteration as a pure snapshot transformation.
///
/// The ability estimator restarts each respondent at θ = 0, so the only
/// state carried between iterations is the item snapshot.
fn step(
    matrix: &ResponseMatrix,
    columns: &[Vec<Option<f64>>],
    items: &ItemParameterSet,
    config: &CalibrationConfig,
) -> (ItemParameterSet, AbilitySet, f64) {
    // Ability phase: respondents are independent given the previous
    // item snapshot.
    let thetas: Vec<f64> = (0..matrix.n_respondents())
        .into_par_iter()
        .map(|r| estimate_theta(matrix.respondent_row(r), &items.items, config))
        .collect();
    let new_abilities = AbilitySet { thetas };

    // Item phase: items are independent given the fresh θ vector.
    // Difficulty first (holding a fixed), then discrimination at the
    // updated difficulty.
    let new_items: Vec<ItemParameters> = items
        .items
        .par_iter()
        .zip(columns.par_iter())
        .map(|(old, column)| {
            let difficulty = estimate_difficulty(
                column,
                &new_abilities.thetas,
                old.discrimination,
                old.difficulty,
                config,
            );
            let discrimination = estimate_discrimination(
                column,
                &new_abilities.thetas,
                old.discrimination,
                difficulty,
                config,
            );
            ItemParameters {
                item_id: old.item_id.clone(),
                discrimination,
                difficulty,
                se_discrimination: f64::NAN,
                se_difficulty: f64::NAN,
            }
        })
        .collect();

    let max_delta = items
        .items
        .iter()
        .zip(&new_items)
        .map(|(old, new)| {
            let da = (new.discrimination - old.discrimination).abs();
            let db = (new.difficulty - old.difficulty).abs();
            da.max(db)
        })
        .fold(0.0_f64, f64::max);

    (ItemParameterSet { items: new_items }, new_abilities, max_delta)
}

/// Standard errors from observed Fisher information at the final
/// parameters: `se = 1/sqrt(information)`. Zero information yields NaN,
/// which callers must treat as "unknown precision", not as a failure.
fn attach_standard_errors(
    items: &mut ItemParameterSet,
    columns: &[Vec<Option<f64>>],
    abilities: &AbilitySet,
) {
    for (item, column) in items.items.iter_mut().zip(columns) {
        let mut info_a = 0.0;
        let mut info_b = 0.0;
        for (response, &theta) in column.iter().zip(&abilities.thetas) {
            if response.is_none() {
                continue;
            }
            let p = probability(theta, item.discrimination, item.difficulty);
            let pq = p * (1.0 - p);
            let d = theta - item.difficulty;
            info_a += d * d * pq;
            info_b += item.discrimination * item.discrimination * pq;
        }
        item.se_discrimination = se_from_information(info_a);
        item.se_difficulty = se_from_information(info_b);
    }
}

fn se_from_information(information: f64) -> f64 {
    if information <= INFO_EPSILON {
        f64::NAN
    } else {
        1.0 / information.sqrt()
    }
}
