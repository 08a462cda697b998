//! Snapshot emission seam.

/// Receiver for snapshot requests.
///
/// Snapshot serialization itself lives outside the integrator; the kick
/// engine only needs a way to demand a diagnostic dump when it detects a
/// bad timestep. `half_kick_applied` records whether velocities were
/// written with only the closing half-kick, which a restart must undo with
/// [`crate::TimeStepper::apply_half_kick`].
pub trait SnapshotSink {
    fn save(&mut self, snapnum: i64, half_kick_applied: bool);
}

/// Snapshot number used for the terminal bad-timestep dump.
pub const BAD_STEP_SNAPNUM: i64 = 999_999;

/// Sink that drops every request, for runs without output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn save(&mut self, _snapnum: i64, _half_kick_applied: bool) {}
}
