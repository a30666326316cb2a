//! Response data handling: validation/matrix construction and synthetic
//! response simulation.

pub mod matrix;
pub mod simulate;

pub use matrix::*;
pub use simulate::*;
