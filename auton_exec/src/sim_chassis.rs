//! # Simulated chassis
//!
//! An ideal plant implementing every chassis contract. Moves arrive exactly
//! on target and distance sensors are ray-cast against the field boundary.
//!
//! The chassis keeps two poses: the pose it believes it is at (what
//! localisation reports) and the true pose (what the sensors see). They only
//! differ when drift is injected, which is how wall corrections are
//! exercised.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use chassis_if::{
    gains::{ControlAxis, GainSet, PidSettings},
    motion::MoveParams,
    pose::Pose,
    sensor::{Facing, SensorId},
    Delay, GainSink, MoveExecutor, PoseProvider, RangeSensors,
};
use log::trace;
use nalgebra::Vector2;

use crate::pose_corr::{FieldGeometry, Params as PoseCorrParams, RobotGeometry, SensorConfig};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Furthest object the distance sensors can see.
///
/// Units: millimeters
pub const SENSOR_MAX_RANGE_MM: f64 = 2000.0;

/// Reading reported when nothing is in range.
///
/// Units: millimeters
pub const NO_OBJECT_MM: f64 = 9999.0;

/// Confidence reported for a reading of a real object.
pub const MAX_CONFIDENCE: u32 = 63;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simulated chassis state
#[derive(Debug, Clone)]
pub struct SimChassis {
    believed: Pose,
    truth: Pose,

    gains: GainSet,

    field: FieldGeometry,
    robot: RobotGeometry,
    sensors: Vec<SensorConfig>,
    raw_to_in_scale: f64,

    /// Raw readings which replace the ray-cast ones, `None` simulates a
    /// sensor fault.
    overrides: HashMap<SensorId, Option<f64>>,

    moves: Vec<MoveRecord>,
    elapsed_ms: u64,
}

/// A move the chassis was asked to make.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MoveRecord {
    pub target: Pose,
    pub timeout_ms: u64,
    pub params: MoveParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimChassis {
    /// Create a chassis at `pose` with the field, robot and sensor layout of
    /// the pose correction parameters.
    pub fn new(params: &PoseCorrParams, pose: Pose) -> Self {
        Self {
            believed: pose,
            truth: pose,
            gains: GainSet::default(),
            field: params.field,
            robot: params.robot,
            sensors: params.sensors.clone(),
            raw_to_in_scale: params.raw_to_in_scale,
            overrides: HashMap::new(),
            moves: Vec::new(),
            elapsed_ms: 0,
        }
    }

    /// Where the robot actually is.
    pub fn true_pose(&self) -> Pose {
        self.truth
    }

    /// Shift the true position without the chassis noticing, as wheel slip
    /// would.
    pub fn inject_drift(&mut self, dx_in: f64, dy_in: f64) {
        self.truth.position_in += Vector2::new(dx_in, dy_in);
        trace!("Drift of ({:.3}, {:.3}) in injected", dx_in, dy_in);
    }

    /// Replace a sensor's reading. `None` makes the sensor unreadable.
    pub fn set_range_override(&mut self, id: SensorId, raw: Option<f64>) {
        self.overrides.insert(id, raw);
    }

    pub fn clear_range_override(&mut self, id: SensorId) {
        self.overrides.remove(&id);
    }

    /// Every move requested so far, oldest first.
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Simulated time spent in delays.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Distance from a sensor's face to the field boundary along the
    /// direction it looks in, from the true pose.
    ///
    /// Units: inches
    fn cast(&self, sensor: &SensorConfig) -> f64 {
        let angle_rad = self.truth.heading_rad()
            + std::f64::consts::FRAC_PI_2 * sensor.facing.quarter_turns() as f64;
        let dir = Vector2::new(angle_rad.cos(), angle_rad.sin());

        let half_dim_in = match sensor.facing {
            Facing::Front | Facing::Back => self.robot.half_length_in,
            Facing::Left | Facing::Right => self.robot.half_width_in,
        };
        let origin = self.truth.position_in + dir * (half_dim_in + sensor.mount_offset_in);

        let half_extent = Vector2::new(self.field.half_extent_x_in, self.field.half_extent_y_in);

        let mut range_in = std::f64::INFINITY;
        for i in 0..2 {
            let t = if dir[i] > 1e-12 {
                (half_extent[i] - origin[i]) / dir[i]
            }
            else if dir[i] < -1e-12 {
                (-half_extent[i] - origin[i]) / dir[i]
            }
            else {
                continue;
            };
            range_in = range_in.min(t);
        }

        range_in.max(0.0)
    }

    fn sensor(&self, id: SensorId) -> Option<&SensorConfig> {
        self.sensors.iter().find(|s| s.id == id)
    }
}

impl PoseProvider for SimChassis {
    fn pose(&self) -> Pose {
        self.believed
    }

    /// Resetting the believed pose leaves the robot where it is.
    fn set_pose(&mut self, pose: Pose) {
        self.believed = pose;
    }
}

impl RangeSensors for SimChassis {
    fn range_raw(&self, id: SensorId) -> Option<f64> {
        if let Some(raw) = self.overrides.get(&id) {
            return *raw;
        }

        let sensor = self.sensor(id)?;
        let raw = self.cast(sensor) / self.raw_to_in_scale;

        if raw > SENSOR_MAX_RANGE_MM {
            Some(NO_OBJECT_MM)
        }
        else {
            Some(raw)
        }
    }

    fn confidence(&self, id: SensorId) -> Option<u32> {
        match self.range_raw(id)? {
            r if r >= NO_OBJECT_MM => Some(0),
            _ => Some(MAX_CONFIDENCE),
        }
    }
}

impl MoveExecutor for SimChassis {
    /// The robot arrives exactly on target, any drift between the believed
    /// and true poses is carried along.
    fn move_to_pose(&mut self, target: &Pose, timeout_ms: u64, params: MoveParams) {
        self.truth.position_in += target.position_in - self.believed.position_in;
        self.truth.heading_deg = target.heading_deg;
        self.believed = *target;

        self.moves.push(MoveRecord {
            target: *target,
            timeout_ms,
            params,
        });
    }
}

impl GainSink for SimChassis {
    fn gains(&self, axis: ControlAxis) -> &PidSettings {
        self.gains.axis(axis)
    }

    fn gains_mut(&mut self, axis: ControlAxis) -> &mut PidSettings {
        self.gains.axis_mut(axis)
    }
}

impl Delay for SimChassis {
    fn delay_ms(&mut self, ms: u64) {
        self.elapsed_ms += ms;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn params() -> PoseCorrParams {
        util::params::parse(include_str!("../../params/pose_corr.toml")).unwrap()
    }

    #[test]
    fn test_ray_cast() {
        let sim = SimChassis::new(&params(), Pose::new(50.0, 0.0, 0.0));

        // Front: 72 - 50 - 7.6875 - 5.5
        assert_abs_diff_eq!(sim.range_raw(SensorId(5)).unwrap(), 8.8125 * 25.4, epsilon = 1e-6);
        assert_eq!(sim.confidence(SensorId(5)), Some(MAX_CONFIDENCE));

        // Back: 50 + 72 - 7.6875 - 1.375, well beyond range
        assert_eq!(sim.range_raw(SensorId(19)), Some(NO_OBJECT_MM));
        assert_eq!(sim.confidence(SensorId(19)), Some(0));

        // Left: 72 - 7.0 - 1.75
        assert_abs_diff_eq!(sim.range_raw(SensorId(18)).unwrap(), 63.25 * 25.4, epsilon = 1e-6);

        // Unknown port
        assert_eq!(sim.range_raw(SensorId(1)), None);
    }

    #[test]
    fn test_drift_and_moves() {
        let mut sim = SimChassis::new(&params(), Pose::new(0.0, 0.0, 90.0));
        sim.inject_drift(0.0, 2.0);

        let target = Pose::new(0.0, 40.0, 90.0);
        let params = MoveParams { lead: 0.2, min_speed: 40.0, max_speed: 70.0 };
        sim.move_to_pose(&target, 2000, params);

        assert_eq!(sim.pose(), target);
        assert_abs_diff_eq!(sim.true_pose().y(), 42.0, epsilon = 1e-12);
        assert_eq!(sim.moves().to_vec(), vec![MoveRecord { target, timeout_ms: 2000, params }]);

        // Front sees the wall from the true pose: 72 - 42 - 13.1875
        assert_abs_diff_eq!(sim.range_raw(SensorId(5)).unwrap(), 16.8125 * 25.4, epsilon = 1e-6);
    }

    #[test]
    fn test_overrides() {
        let mut sim = SimChassis::new(&params(), Pose::default());

        sim.set_range_override(SensorId(5), None);
        assert_eq!(sim.range_raw(SensorId(5)), None);
        assert_eq!(sim.confidence(SensorId(5)), None);

        sim.set_range_override(SensorId(5), Some(100.0));
        assert_eq!(sim.range_raw(SensorId(5)), Some(100.0));

        // 72 - 7.6875 - 5.5
        sim.clear_range_override(SensorId(5));
        assert_abs_diff_eq!(sim.range_raw(SensorId(5)).unwrap(), 58.8125 * 25.4, epsilon = 1e-6);
    }
}
