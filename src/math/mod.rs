//! Mathematical utilities: the overflow-guarded 2PL response function.

pub mod logistic;

pub use logistic::*;
