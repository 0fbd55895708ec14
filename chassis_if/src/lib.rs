//! # Chassis interface crate.
//!
//! Provides the contracts between the autonomous motion core and the chassis
//! framework it runs on top of (localisation, distance sensors, move
//! execution and the live PID gain state), along with the data types which
//! cross those contracts.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Field-relative pose and cardinal directions
pub mod pose;

/// PID gain settings for the lateral and angular control axes
pub mod gains;

/// Distance sensor identification and facing
pub mod sensor;

/// Move execution parameters
pub mod motion;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use gains::{ControlAxis, PidSettings};
use motion::MoveParams;
use pose::Pose;
use sensor::SensorId;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Provides the dead-reckoned pose of the robot.
///
/// The provider is continuously updated by the chassis' own localisation
/// loop. Writes replace the whole pose in one call, so a reader never sees a
/// pose made of old and new fields.
pub trait PoseProvider {
    /// Get a snapshot of the current pose.
    fn pose(&self) -> Pose;

    /// Overwrite the current pose.
    fn set_pose(&mut self, pose: Pose);
}

/// Provides readings from the fixed-range distance sensors.
pub trait RangeSensors {
    /// Get the raw range reported by a sensor, or `None` if the sensor could
    /// not be read (disconnected or faulted).
    ///
    /// Units: sensor raw units (millimeters for the smart distance sensor)
    fn range_raw(&self, id: SensorId) -> Option<f64>;

    /// Get the confidence the sensor reports for its last reading, or `None`
    /// if it could not be read.
    fn confidence(&self, id: SensorId) -> Option<u32>;
}

/// Executes point-to-pose moves.
pub trait MoveExecutor {
    /// Move to the target pose, blocking until the executor settles or the
    /// timeout expires.
    fn move_to_pose(&mut self, target: &Pose, timeout_ms: u64, params: MoveParams);
}

/// The live gain state of the chassis controllers.
pub trait GainSink {
    /// Get the settings currently active on an axis.
    fn gains(&self, axis: ControlAxis) -> &PidSettings;

    /// Get mutable access to the settings active on an axis. Changes take
    /// effect on the next controlled move.
    fn gains_mut(&mut self, axis: ControlAxis) -> &mut PidSettings;
}

/// Blocking delays on the chassis' clock.
pub trait Delay {
    /// Block for the given number of milliseconds.
    fn delay_ms(&mut self, ms: u64);
}

/// Everything the autonomous core needs from a chassis.
pub trait Chassis: PoseProvider + RangeSensors + MoveExecutor + GainSink + Delay {}

impl<T> Chassis for T where T: PoseProvider + RangeSensors + MoveExecutor + GainSink + Delay {}
