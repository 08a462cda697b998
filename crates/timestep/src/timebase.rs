//! The discrete global clock.
//!
//! The simulated span from `a_begin` to `a_end` is divided into `TIMEBASE`
//! integer ticks, uniform in log a. Every particle step is a power of two
//! of ticks, so step boundaries of coarse bins always coincide with
//! boundaries of finer ones and the whole hierarchy stays synchronized on
//! one clock. Bits above `TIMEBASE` are left alone by the conversions here;
//! the driver uses them as a snapshot counter.

use serde::{Deserialize, Serialize};

use crate::error::TimestepError;

/// A point or interval on the integer timeline, in ticks.
///
/// Signed so that differences such as `drift_tick - kick_tick` (used by the
/// predictors) are well-defined in either direction.
pub type Ti = i64;

/// Number of power-of-two step classes.
pub const TIMEBINS: usize = 30;

/// Ticks spanning the full run: 2^(TIMEBINS-1).
pub const TIMEBASE: Ti = 1 << (TIMEBINS - 1);

/// Midpoint of a step starting at `start` with length `step` ticks.
///
/// Kicks are anchored at step midpoints; this is what makes the leapfrog
/// time-reversible and second-order. `step` is even for every real bin, so
/// the division is exact.
#[inline]
pub fn kick_tick(start: Ti, step: Ti) -> Ti {
    start + step / 2
}

/// Largest power of two not exceeding `dti` (0 for 0).
///
/// # Examples
///
/// ```
/// use timestep::timebase::round_down_power_of_two;
///
/// assert_eq!(round_down_power_of_two(0), 0);
/// assert_eq!(round_down_power_of_two(1), 1);
/// assert_eq!(round_down_power_of_two(100), 64);
/// assert_eq!(round_down_power_of_two(64), 64);
/// ```
#[inline]
pub fn round_down_power_of_two(dti: Ti) -> Ti {
    if dti <= 0 {
        0
    } else {
        1 << dti.ilog2()
    }
}

/// Bin holding a step of `dti` ticks.
///
/// A step of 0 ticks maps to bin 0 (the unassigned bin). A step of a single
/// tick has no legal bin: bin 0 is reserved, so `None` is returned and the
/// caller treats the particle as having a bad timestep.
///
/// # Examples
///
/// ```
/// use timestep::timebase::timestep_bin;
///
/// assert_eq!(timestep_bin(0), Some(0));
/// assert_eq!(timestep_bin(1), None);
/// assert_eq!(timestep_bin(8), Some(3));
/// assert_eq!(timestep_bin(12), Some(3)); // floor(log2)
/// ```
#[inline]
pub fn timestep_bin(dti: Ti) -> Option<usize> {
    match dti {
        0 => Some(0),
        d if d < 0 || d == 1 => None,
        _ => Some(dti.ilog2() as usize),
    }
}

/// Affine map between ticks and log a.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    loga_begin: f64,
    /// log(a_end) - log(a_begin), spanned by TIMEBASE ticks
    dloga_span: f64,
}

impl Timeline {
    /// Creates the timeline for a run from `a_begin` to `a_end`.
    pub fn new(a_begin: f64, a_end: f64) -> Result<Self, TimestepError> {
        if !(a_begin > 0.0 && a_end > a_begin) {
            return Err(TimestepError::InvalidTimeline { a_begin, a_end });
        }
        Ok(Self {
            loga_begin: a_begin.ln(),
            dloga_span: a_end.ln() - a_begin.ln(),
        })
    }

    /// Interval in log a covered by one tick.
    #[inline]
    pub fn tick_dloga(&self) -> f64 {
        self.dloga_span / TIMEBASE as f64
    }

    /// Interval in log a covered by `dti` ticks (signed).
    #[inline]
    pub fn dloga_from_dti(&self, dti: Ti) -> f64 {
        dti as f64 * self.tick_dloga()
    }

    /// Tick count covering `dloga`, rounded to the nearest tick.
    ///
    /// The result may exceed `TIMEBASE` (callers clip against their own
    /// maximum), so an interval far beyond the timeline saturates at twice
    /// `TIMEBASE` rather than failing: a force-free particle asks for an
    /// astronomically long step and simply gets clipped. Only a value that
    /// is not a number at all is a fatal conversion overflow.
    pub fn dti_from_dloga(&self, dloga: f64) -> Result<Ti, TimestepError> {
        let ticks = (dloga / self.tick_dloga()).round();
        if !ticks.is_finite() {
            return Err(TimestepError::ConversionOverflow { dloga });
        }
        let cap = (2 * TIMEBASE) as f64;
        Ok(ticks.clamp(-cap, cap) as Ti)
    }

    /// Interval in log a covered by one step of bin `bin` (0 for bin 0).
    #[inline]
    pub fn dloga_for_bin(&self, bin: usize) -> f64 {
        if bin == 0 {
            0.0
        } else {
            self.dloga_from_dti(1 << bin)
        }
    }

    /// log a at tick `ti`.
    ///
    /// `ti` must be an in-simulation tick in `[0, TIMEBASE]`; strip any
    /// snapshot bits before calling.
    #[inline]
    pub fn loga(&self, ti: Ti) -> f64 {
        self.loga_begin + self.dloga_from_dti(ti)
    }

    /// Scale factor at tick `ti` (same domain as [`Timeline::loga`]).
    #[inline]
    pub fn scale_factor(&self, ti: Ti) -> f64 {
        self.loga(ti).exp()
    }
}
