//! Newton-Raphson parameter update routines.
//!
//! Responsibilities:
//!
//! - per-respondent ability (θ) updates against fixed item parameters
//! - per-item difficulty (b) and discrimination (a) updates against a
//!   fixed ability vector
//!
//! All routines are stateless functions over slices, so each phase of
//! the JMLE loop is independently testable and trivially parallel.

pub mod ability;
pub mod item;

pub use ability::*;
pub use item::*;

/// Stop the inner Newton loop once a step is this small.
pub(crate) const STEP_TOLERANCE: f64 = 1e-4;
