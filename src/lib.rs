//! `irt-calibrate` library crate.
//!
//! Joint Maximum Likelihood Estimation (JMLE) of two-parameter logistic
//! (2PL) item parameters from binary respondent-item outcomes, plus
//! standalone ability scoring against previously calibrated items.
//!
//! The crate is organized so that:
//!
//! - the numeric core (`math`, `estimate`, `calibrate`) has no storage
//!   dependency and is testable in isolation
//! - persistence is injected only at the orchestration boundary
//!   (`pipeline`) through the traits in `store`
//! - validation (`data`) is separated from estimation

pub mod calibrate;
pub mod data;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod math;
pub mod pipeline;
pub mod store;
