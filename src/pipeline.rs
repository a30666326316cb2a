//! Calibration pipeline: the public operations of the engine.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! lookup -> response stream -> validated matrix -> JMLE -> result
//!
//! The numeric core below this layer has no storage dependency; the
//! collaborators are injected here and only here.

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use crate::calibrate::{JmleFit, calibrate_matrix};
use crate::data::{ResponseMatrix, build_matrix};
use crate::domain::{
    CalibrationConfig, CalibrationResult, ItemCalibration, ItemParameters, ItemStatisticsRecord,
};
use crate::error::CalibrationError;
use crate::estimate::estimate_theta;
use crate::store::{CompetencyLookup, ItemStatisticsStore, ResponseSource, round_persisted};

/// Orchestrates calibration and scoring against injected collaborators.
pub struct CalibrationService<S, C, T> {
    source: S,
    competencies: C,
    statistics: T,
    config: CalibrationConfig,
}

impl<S, C, T> CalibrationService<S, C, T>
where
    S: ResponseSource,
    C: CompetencyLookup,
    T: ItemStatisticsStore,
{
    pub fn new(source: S, competencies: C, statistics: T) -> Self {
        Self::with_config(source, competencies, statistics, CalibrationConfig::default())
    }

    pub fn with_config(
        source: S,
        competencies: C,
        statistics: T,
        config: CalibrationConfig,
    ) -> Self {
        Self {
            source,
            competencies,
            statistics,
            config,
        }
    }

    /// Calibrate a competency and return the full result, without any
    /// persistence side effect.
    pub fn calibrate_with_details(
        &self,
        competency_id: &str,
    ) -> Result<CalibrationResult, CalibrationError> {
        if !self.competencies.exists(competency_id)? {
            return Err(CalibrationError::CompetencyNotFound {
                competency_id: competency_id.to_string(),
            });
        }

        let records = self.source.responses(competency_id)?;
        let matrix = build_matrix(competency_id, records, &self.config)?;
        let fit = calibrate_matrix(&matrix, &self.config);
        Ok(build_result(&matrix, &fit))
    }

    /// Calibrate a competency and persist each surviving item's
    /// parameters (guessing fixed at 0, values rounded to the persisted
    /// decimal scale). Returns the records as written.
    pub fn calibrate_competency(
        &self,
        competency_id: &str,
    ) -> Result<Vec<ItemStatisticsRecord>, CalibrationError> {
        let result = self.calibrate_with_details(competency_id)?;
        let calibrated_at = Utc::now();

        let mut records = Vec::with_capacity(result.items.len());
        for item in &result.items {
            let record = ItemStatisticsRecord {
                item_id: item.item_id.clone(),
                discrimination: round_persisted(item.discrimination),
                difficulty: round_persisted(item.difficulty),
                // 2PL only: the guessing parameter is never estimated.
                guessing: 0.0,
                calibrated_at,
            };
            self.statistics.upsert(&record)?;
            records.push(record);
        }

        info!(
            competency_id,
            items = records.len(),
            converged = result.converged,
            "persisted item statistics"
        );
        Ok(records)
    }

    /// Estimate a respondent's ability from binarized scores against
    /// previously persisted item parameters. Pure read of the store.
    ///
    /// Items without calibrated parameters are skipped; an empty mapping
    /// or a mapping with no usable items yields θ = 0.0.
    pub fn estimate_ability(
        &self,
        scores: &HashMap<String, f64>,
    ) -> Result<f64, CalibrationError> {
        if scores.is_empty() {
            return Ok(0.0);
        }

        // Sort by item id so the accumulation order (and hence the exact
        // floating-point result) does not depend on map iteration order.
        let mut item_ids: Vec<&String> = scores.keys().collect();
        item_ids.sort();

        let mut responses = Vec::with_capacity(item_ids.len());
        let mut items = Vec::with_capacity(item_ids.len());
        for item_id in item_ids {
            let Some((discrimination, difficulty)) = self.statistics.parameters(item_id)? else {
                continue;
            };
            responses.push(Some(scores[item_id]));
            items.push(ItemParameters {
                item_id: item_id.clone(),
                discrimination,
                difficulty,
                se_discrimination: f64::NAN,
                se_difficulty: f64::NAN,
            });
        }

        if items.is_empty() {
            return Ok(0.0);
        }
        Ok(estimate_theta(&responses, &items, &self.config))
    }
}

/// Assemble the iteration outcome into the result value object,
/// preserving surviving item order.
fn build_result(matrix: &ResponseMatrix, fit: &JmleFit) -> CalibrationResult {
    let items = fit
        .items
        .items
        .iter()
        .map(|item| ItemCalibration {
            item_id: item.item_id.clone(),
            difficulty: item.difficulty,
            discrimination: item.discrimination,
            se_discrimination: item.se_discrimination,
            se_difficulty: item.se_difficulty,
        })
        .collect();

    CalibrationResult {
        competency_id: matrix.competency_id.clone(),
        item_count: matrix.n_items(),
        respondent_count: matrix.n_respondents(),
        iterations: fit.iterations,
        converged: fit.converged,
        max_parameter_change: fit.max_parameter_change,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SimulationSpec, TrueItem, simulate_responses};
    use crate::store::InMemoryStore;

    fn seeded_store() -> InMemoryStore {
        let spec = SimulationSpec::new(
            400,
            vec![
                TrueItem { discrimination: 1.0, difficulty: -1.0 },
                TrueItem { discrimination: 1.2, difficulty: 0.0 },
                TrueItem { discrimination: 0.9, difficulty: 1.0 },
                TrueItem { discrimination: 1.4, difficulty: 0.5 },
            ],
            21,
        );
        let records = simulate_responses(&spec).unwrap();
        let mut store = InMemoryStore::new();
        store.add_responses("comp-1", records);
        store
    }

    #[test]
    fn unknown_competency_is_not_found() {
        let store = seeded_store();
        let service = CalibrationService::new(&store, &store, &store);
        let err = service.calibrate_with_details("missing").unwrap_err();
        assert!(matches!(err, CalibrationError::CompetencyNotFound { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn details_run_has_no_persistence_side_effect() {
        let store = seeded_store();
        let service = CalibrationService::new(&store, &store, &store);
        let result = service.calibrate_with_details("comp-1").unwrap();
        assert_eq!(result.item_count, 4);
        assert_eq!(result.respondent_count, 400);
        assert_eq!(result.items.len(), 4);
        assert!(store.record("Q01").is_none());
    }

    #[test]
    fn calibrate_competency_persists_rounded_2pl_records() {
        let store = seeded_store();
        let service = CalibrationService::new(&store, &store, &store);
        let records = service.calibrate_competency("comp-1").unwrap();
        assert_eq!(records.len(), 4);

        for record in &records {
            assert_eq!(record.guessing, 0.0);
            // Values are rounded to the persisted decimal scale.
            assert_eq!(record.discrimination, round_persisted(record.discrimination));
            assert_eq!(record.difficulty, round_persisted(record.difficulty));
            let stored = store.record(&record.item_id).expect("record written");
            assert_eq!(&stored, record);
        }
    }

    #[test]
    fn estimate_ability_reads_persisted_parameters() {
        let store = InMemoryStore::new();
        store.seed_parameters("Q1", 1.0, -1.0);
        store.seed_parameters("Q2", 1.0, 0.0);
        store.seed_parameters("Q3", 1.0, 1.0);
        let service = CalibrationService::new(&store, &store, &store);

        let scores: HashMap<String, f64> = [
            ("Q1".to_string(), 1.0),
            ("Q2".to_string(), 1.0),
            ("Q3".to_string(), 0.0),
        ]
        .into();
        let theta = service.estimate_ability(&scores).unwrap();
        assert!(theta.is_finite());
        assert!((-4.0..=4.0).contains(&theta));
        assert!(theta.abs() < 2.0, "theta = {theta}");
    }

    #[test]
    fn estimate_ability_skips_uncalibrated_items() {
        let store = InMemoryStore::new();
        store.seed_parameters("Q1", 1.0, 0.0);
        let service = CalibrationService::new(&store, &store, &store);

        // Q9 has no persisted parameters and must not contribute.
        let with_unknown: HashMap<String, f64> =
            [("Q1".to_string(), 1.0), ("Q9".to_string(), 0.0)].into();
        let only_known: HashMap<String, f64> = [("Q1".to_string(), 1.0)].into();
        assert_eq!(
            service.estimate_ability(&with_unknown).unwrap(),
            service.estimate_ability(&only_known).unwrap()
        );
    }

    #[test]
    fn estimate_ability_defaults_to_zero_without_usable_items() {
        let store = InMemoryStore::new();
        let service = CalibrationService::new(&store, &store, &store);

        assert_eq!(service.estimate_ability(&HashMap::new()).unwrap(), 0.0);

        let scores: HashMap<String, f64> = [("Q1".to_string(), 1.0)].into();
        assert_eq!(service.estimate_ability(&scores).unwrap(), 0.0);
    }

    #[test]
    fn all_correct_scores_above_all_incorrect() {
        let store = InMemoryStore::new();
        for (i, b) in [-2.0_f64, -1.0, 0.0, 1.0, 2.0].iter().enumerate() {
            store.seed_parameters(format!("Q{}", i + 1), 1.0, *b);
        }
        let service = CalibrationService::new(&store, &store, &store);

        let correct: HashMap<String, f64> =
            (1..=5).map(|i| (format!("Q{i}"), 1.0)).collect();
        let incorrect: HashMap<String, f64> =
            (1..=5).map(|i| (format!("Q{i}"), 0.0)).collect();

        let hi = service.estimate_ability(&correct).unwrap();
        let lo = service.estimate_ability(&incorrect).unwrap();
        assert!(hi > 1.0 && hi <= 4.0, "hi = {hi}");
        assert!(lo < -1.0 && lo >= -4.0, "lo = {lo}");
        assert!(hi > lo);
    }
}
