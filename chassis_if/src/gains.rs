//! # Gains module
//!
//! The chassis runs two independent PID loops, one on the lateral (distance)
//! error and one on the angular (heading) error. Each loop is tuned by a
//! [`PidSettings`] block.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::GainSink;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Tuning of one control loop.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PidSettings {
    /// Proportional gain
    pub kp: f64,

    /// Integral gain
    pub ki: f64,

    /// Derivative gain
    pub kd: f64,

    /// Error below which the integral is allowed to accumulate.
    pub anti_windup: f64,

    /// Error within which the small settle timer runs.
    pub small_error: f64,

    /// Time the error must stay within `small_error` to settle.
    ///
    /// Units: milliseconds
    pub small_error_timeout_ms: f64,

    /// Error within which the large settle timer runs.
    pub large_error: f64,

    /// Time the error must stay within `large_error` to settle.
    ///
    /// Units: milliseconds
    pub large_error_timeout_ms: f64,

    /// Maximum change in output per control cycle, zero for no limit.
    pub slew: f64,
}

/// A complete set of gains covering both control axes.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GainSet {
    pub lateral: PidSettings,
    pub angular: PidSettings,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The control axes of the chassis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlAxis {
    /// Distance along the direction of travel
    Lateral,
    /// Heading
    Angular,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GainSet {
    /// Get the settings for one axis.
    pub fn axis(&self, axis: ControlAxis) -> &PidSettings {
        match axis {
            ControlAxis::Lateral => &self.lateral,
            ControlAxis::Angular => &self.angular,
        }
    }

    pub fn axis_mut(&mut self, axis: ControlAxis) -> &mut PidSettings {
        match axis {
            ControlAxis::Lateral => &mut self.lateral,
            ControlAxis::Angular => &mut self.angular,
        }
    }

    /// Read the gains currently active on a sink.
    pub fn read_from<S: GainSink + ?Sized>(sink: &S) -> Self {
        Self {
            lateral: *sink.gains(ControlAxis::Lateral),
            angular: *sink.gains(ControlAxis::Angular),
        }
    }

    /// Overwrite the gains of both axes on a sink.
    pub fn write_to<S: GainSink + ?Sized>(&self, sink: &mut S) {
        for &axis in &[ControlAxis::Lateral, ControlAxis::Angular] {
            *sink.gains_mut(axis) = *self.axis(axis);
        }
    }
}
