//! # Wall-relative pose correction module
//!
//! Dead-reckoned position drifts over a routine. When the robot is squared
//! up to the field walls its distance sensors give an absolute measurement
//! of one or both coordinates, which this module uses to re-anchor the pose.
//!
//! A correction cycle:
//!
//! 1. Classifies the heading into the nearest cardinal direction. If the
//!    heading is further than the tolerance from every cardinal nothing is
//!    corrected.
//! 2. Works out which wall each sensor is looking at from the cardinal and
//!    the sensor's facing, and converts its reading into inches. Readings at
//!    or beyond the wall threshold mean there is no wall in range.
//! 3. Computes the coordinate of the robot centre on that wall's axis:
//!    `half_extent - (reading + mount_offset + half_dimension)` for a wall at
//!    the positive end of the axis, mirrored for the negative end.
//! 4. Rejects any coordinate further than the gate slack from the
//!    dead-reckoned one.
//! 5. Commits the surviving coordinates. The heading is never touched, it is
//!    trusted to the inertial sensor.
//!
//! In corner mode, when both axes have a wall in range, both are corrected in
//! the same cycle. This path is not gated unless `gate_corner` is set.
//!
//! Nothing here fails: every reason for not correcting an axis is reported in
//! the [`CorrectionReport`] and the pose is left alone.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_corner;
mod calc_single_axis;
mod calc_wall;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

use chassis_if::{
    pose::{Axis, Pose},
    sensor::SensorId,
};
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Report on one correction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrectionReport {
    /// The pose the correction was computed against.
    pub pose: Pose,

    /// What happened to the X coordinate.
    pub x: AxisOutcome,

    /// What happened to the Y coordinate.
    pub y: AxisOutcome,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The outcome of a correction cycle for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AxisOutcome {
    /// The coordinate was re-anchored.
    Corrected {
        /// Dead-reckoned coordinate.
        from_in: f64,
        /// Wall-derived coordinate.
        to_in: f64,
        /// The sensor the measurement came from.
        sensor: SensorId,
    },

    /// The coordinate was left alone.
    Skipped(SkipReason),
}

/// Why an axis was not corrected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SkipReason {
    /// The heading is not within tolerance of any cardinal direction.
    Misaligned {
        /// Signed distance to the nearest cardinal.
        error_deg: f64,
    },

    /// No configured sensor looks along this axis.
    NoSensor,

    /// The sensors along this axis see no wall in range.
    NoWall,

    /// The sensors along this axis could not be read.
    SensorUnavailable,

    /// The sensors along this axis reported too little confidence.
    LowConfidence,

    /// The wall-derived coordinate was too far from the dead-reckoned one.
    GateRejected {
        /// Wall-derived minus dead-reckoned coordinate.
        delta_in: f64,
    },
}

/// Possible errors when initialising the pose corrector.
#[derive(Debug, thiserror::Error)]
pub enum PoseCorrInitError {
    #[error("Could not load the pose correction parameters: {0}")]
    LoadError(util::params::LoadError),

    #[error("Invalid pose correction parameters: {0}")]
    InvalidParams(String),

    #[error("Could not open the pose correction archive: {0}")]
    ArchiveError(util::archive::ArchiveError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CorrectionReport {
    /// A report where both axes were skipped for the same reason.
    pub fn skipped(pose: Pose, reason: SkipReason) -> Self {
        Self {
            pose,
            x: AxisOutcome::Skipped(reason),
            y: AxisOutcome::Skipped(reason),
        }
    }

    /// The outcome for one axis.
    pub fn axis(&self, axis: Axis) -> &AxisOutcome {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Whether any axis was corrected.
    pub fn is_corrected(&self) -> bool {
        self.x.is_corrected() || self.y.is_corrected()
    }

    /// Apply the corrected coordinates to a pose, leaving uncorrected
    /// coordinates and the heading exactly as they are.
    pub fn apply_to(&self, pose: Pose) -> Pose {
        let mut pose = pose;
        for &axis in &[Axis::X, Axis::Y] {
            if let AxisOutcome::Corrected { to_in, .. } = self.axis(axis) {
                pose = pose.with_coord(axis, *to_in);
            }
        }
        pose
    }
}

impl AxisOutcome {
    pub fn is_corrected(&self) -> bool {
        matches!(self, AxisOutcome::Corrected { .. })
    }

    /// Short label used in archives and logs.
    pub fn label(&self) -> &'static str {
        match self {
            AxisOutcome::Corrected { .. } => "corrected",
            AxisOutcome::Skipped(SkipReason::Misaligned { .. }) => "misaligned",
            AxisOutcome::Skipped(SkipReason::NoSensor) => "no_sensor",
            AxisOutcome::Skipped(SkipReason::NoWall) => "no_wall",
            AxisOutcome::Skipped(SkipReason::SensorUnavailable) => "sensor_unavailable",
            AxisOutcome::Skipped(SkipReason::LowConfidence) => "low_confidence",
            AxisOutcome::Skipped(SkipReason::GateRejected { .. }) => "gate_rejected",
        }
    }
}
