//! Collaborator traits at the persistence boundary.
//!
//! The numeric core never touches these; they are injected only at the
//! orchestration layer (`pipeline`). Implementations wrap whatever
//! backing store the host application uses; `store::memory` provides an
//! in-memory one for tests and embedding.

pub mod memory;

pub use memory::InMemoryStore;

use crate::domain::{ItemStatisticsRecord, ResponseRecord};
use crate::error::CalibrationError;

/// Decimal places kept when writing parameters through the store.
pub const PERSIST_DECIMALS: i32 = 4;

/// Round a value to the fixed persisted-decimal scale.
pub fn round_persisted(value: f64) -> f64 {
    let factor = 10f64.powi(PERSIST_DECIMALS);
    (value * factor).round() / factor
}

/// Streaming source of response records for one competency.
///
/// The pipeline consumes the returned records exactly once per run.
pub trait ResponseSource {
    fn responses(&self, competency_id: &str) -> Result<Vec<ResponseRecord>, CalibrationError>;
}

/// Resolves whether a competency exists at all.
pub trait CompetencyLookup {
    fn exists(&self, competency_id: &str) -> Result<bool, CalibrationError>;
}

/// Read/write access to persisted per-item statistics.
pub trait ItemStatisticsStore {
    /// Previously calibrated `(discrimination, difficulty)` for an item,
    /// or `None` if the item has never been calibrated.
    fn parameters(&self, item_id: &str) -> Result<Option<(f64, f64)>, CalibrationError>;

    /// Insert or replace an item's statistics record.
    fn upsert(&self, record: &ItemStatisticsRecord) -> Result<(), CalibrationError>;
}

impl<T: ResponseSource + ?Sized> ResponseSource for &T {
    fn responses(&self, competency_id: &str) -> Result<Vec<ResponseRecord>, CalibrationError> {
        (**self).responses(competency_id)
    }
}

impl<T: CompetencyLookup + ?Sized> CompetencyLookup for &T {
    fn exists(&self, competency_id: &str) -> Result<bool, CalibrationError> {
        (**self).exists(competency_id)
    }
}

impl<T: ItemStatisticsStore + ?Sized> ItemStatisticsStore for &T {
    fn parameters(&self, item_id: &str) -> Result<Option<(f64, f64)>, CalibrationError> {
        (**self).parameters(item_id)
    }

    fn upsert(&self, record: &ItemStatisticsRecord) -> Result<(), CalibrationError> {
        (**self).upsert(record)
    }
}
