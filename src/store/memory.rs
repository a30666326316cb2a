//! In-memory collaborator implementation.
//!
//! Backs all three collaborator traits with plain maps. Useful for tests
//! and for embedding the engine without a database; statistics writes go
//! through a mutex so the store can be shared by reference.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::domain::{ItemStatisticsRecord, ResponseRecord};
use crate::error::CalibrationError;
use crate::store::{CompetencyLookup, ItemStatisticsStore, ResponseSource};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    competencies: HashSet<String>,
    responses: HashMap<String, Vec<ResponseRecord>>,
    statistics: Mutex<HashMap<String, ItemStatisticsRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a competency (with no responses yet).
    pub fn add_competency(&mut self, competency_id: impl Into<String>) {
        self.competencies.insert(competency_id.into());
    }

    /// Register a competency together with its response stream.
    pub fn add_responses(
        &mut self,
        competency_id: impl Into<String>,
        records: Vec<ResponseRecord>,
    ) {
        let competency_id = competency_id.into();
        self.competencies.insert(competency_id.clone());
        self.responses.entry(competency_id).or_default().extend(records);
    }

    /// Seed previously calibrated parameters for an item.
    pub fn seed_parameters(&self, item_id: impl Into<String>, discrimination: f64, difficulty: f64) {
        let item_id = item_id.into();
        let record = ItemStatisticsRecord {
            item_id: item_id.clone(),
            discrimination,
            difficulty,
            guessing: 0.0,
            calibrated_at: chrono::Utc::now(),
        };
        self.statistics
            .lock()
            .expect("statistics lock poisoned")
            .insert(item_id, record);
    }

    /// Snapshot of a stored record, for assertions.
    pub fn record(&self, item_id: &str) -> Option<ItemStatisticsRecord> {
        self.statistics
            .lock()
            .expect("statistics lock poisoned")
            .get(item_id)
            .cloned()
    }
}

impl ResponseSource for InMemoryStore {
    fn responses(&self, competency_id: &str) -> Result<Vec<ResponseRecord>, CalibrationError> {
        Ok(self.responses.get(competency_id).cloned().unwrap_or_default())
    }
}

impl CompetencyLookup for InMemoryStore {
    fn exists(&self, competency_id: &str) -> Result<bool, CalibrationError> {
        Ok(self.competencies.contains(competency_id))
    }
}

impl ItemStatisticsStore for InMemoryStore {
    fn parameters(&self, item_id: &str) -> Result<Option<(f64, f64)>, CalibrationError> {
        let statistics = self
            .statistics
            .lock()
            .map_err(|_| CalibrationError::Store("statistics lock poisoned".to_string()))?;
        Ok(statistics
            .get(item_id)
            .map(|record| (record.discrimination, record.difficulty)))
    }

    fn upsert(&self, record: &ItemStatisticsRecord) -> Result<(), CalibrationError> {
        let mut statistics = self
            .statistics
            .lock()
            .map_err(|_| CalibrationError::Store("statistics lock poisoned".to_string()))?;
        statistics.insert(record.item_id.clone(), record.clone());
        Ok(())
    }
}
