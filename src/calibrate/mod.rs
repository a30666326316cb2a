//! JMLE calibration orchestration.
//!
//! Responsibilities:
//!
//! - alternate ability and item phases over snapshot sets (parallel)
//! - track the largest parameter change per iteration
//! - stop on convergence or at the iteration cap
//! - compute standard errors at the final parameters

pub mod jmle;

pub use jmle::*;
