//! Fatal error kinds of the time integrator.
//!
//! None of these are recoverable: the integrator is deterministic given its
//! inputs, so an inconsistency means corrupted state or a criterion
//! configured so badly that continuing the run would be meaningless. The
//! driver is expected to log the error and end the run.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimestepError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("timeline bounds must satisfy 0 < a_begin < a_end, got {a_begin} .. {a_end}")]
    InvalidTimeline { a_begin: f64, a_end: f64 },

    #[error("dloga = {dloga} cannot be represented on the integer timeline")]
    ConversionOverflow { dloga: f64 },

    #[error("{count} particle(s) were assigned an illegal timestep; diagnostic snapshot written")]
    BadTimestep { count: i64 },

    #[error("kick time mismatch for particle {id}: momentum is at tick {found}, kick starts at {expected}")]
    KickDesync { id: u64, expected: i64, found: i64 },
}
