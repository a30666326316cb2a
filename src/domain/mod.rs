//! Domain types used throughout the calibration pipeline.
//!
//! This module defines:
//!
//! - the raw response record consumed from the answer stream
//! - mutable item parameters and their calibrated snapshots
//! - the run configuration (`CalibrationConfig`)
//! - result and persisted-record value objects

pub mod types;

pub use types::*;
