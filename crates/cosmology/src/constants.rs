//! Physical constants shared across the simulation crates.

/// Adiabatic index of an ideal monatomic gas
pub const GAMMA: f64 = 5.0 / 3.0;

/// GAMMA - 1, the exponent that appears in the entropic equation of state
pub const GAMMA_MINUS1: f64 = GAMMA - 1.0;
