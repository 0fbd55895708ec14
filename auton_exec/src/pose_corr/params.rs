//! Parameters structure for pose correction

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use chassis_if::{
    pose::Axis,
    sensor::{Facing, SensorId},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for pose correction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {
    /// Which sensors take part in a correction.
    pub mode: CorrectionMode,

    /// Scale factor from raw sensor units to inches.
    pub raw_to_in_scale: f64,

    /// Readings at or beyond this distance mean no wall is in range.
    ///
    /// Units: inches
    pub wall_threshold_in: f64,

    /// Maximum distance of the heading from a cardinal direction for a
    /// correction to be attempted.
    ///
    /// Units: degrees
    pub cardinal_tolerance_deg: f64,

    /// Maximum distance between the wall-derived and dead-reckoned
    /// coordinates for a correction to be accepted.
    ///
    /// Units: inches
    pub gate_slack_in: f64,

    /// Whether the slack gate also applies to two-axis corner corrections.
    #[serde(default)]
    pub gate_corner: bool,

    /// If set, readings with a lower reported confidence are ignored.
    #[serde(default)]
    pub min_confidence: Option<u32>,

    pub field: FieldGeometry,

    pub robot: RobotGeometry,

    /// The distance sensors on the robot.
    pub sensors: Vec<SensorConfig>,
}

/// The field: an axis-aligned rectangle centred on the origin.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FieldGeometry {
    /// Units: inches
    pub half_extent_x_in: f64,

    /// Units: inches
    pub half_extent_y_in: f64,
}

/// The robot's footprint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RobotGeometry {
    /// Distance from the centre to the front or back edge.
    ///
    /// Units: inches
    pub half_length_in: f64,

    /// Distance from the centre to the left or right edge.
    ///
    /// Units: inches
    pub half_width_in: f64,
}

/// Static configuration of one distance sensor.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SensorConfig {
    pub id: SensorId,

    /// The side of the robot the sensor looks out of.
    pub facing: Facing,

    /// Distance added to the sensor's reading to reach the edge of the
    /// robot on the sensor's side.
    ///
    /// Units: inches
    pub mount_offset_in: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which sensors take part in a correction.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMode {
    /// Only the front and back sensors, correcting the axis the robot is
    /// facing along.
    SingleAxis,

    /// Every sensor, correcting both axes at once when two perpendicular
    /// walls are in range.
    Corner,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CorrectionMode {
    fn default() -> Self {
        CorrectionMode::SingleAxis
    }
}

impl Params {
    /// Check the parameters are usable, returning a description of the first
    /// problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.cardinal_tolerance_deg > 0.0 && self.cardinal_tolerance_deg < 45.0) {
            return Err(format!(
                "cardinal_tolerance_deg must be in (0, 45), found {}",
                self.cardinal_tolerance_deg
            ));
        }

        let positive = [
            ("raw_to_in_scale", self.raw_to_in_scale),
            ("wall_threshold_in", self.wall_threshold_in),
            ("gate_slack_in", self.gate_slack_in),
            ("field.half_extent_x_in", self.field.half_extent_x_in),
            ("field.half_extent_y_in", self.field.half_extent_y_in),
            ("robot.half_length_in", self.robot.half_length_in),
            ("robot.half_width_in", self.robot.half_width_in),
        ];
        for (name, value) in positive.iter() {
            if !(*value > 0.0) {
                return Err(format!("{} must be positive, found {}", name, value));
            }
        }

        for (i, sensor) in self.sensors.iter().enumerate() {
            if self.sensors[..i].iter().any(|s| s.id == sensor.id) {
                return Err(format!("sensor {} is configured more than once", sensor.id));
            }
        }

        Ok(())
    }

    /// Half the robot's size in the direction a side faces.
    pub fn robot_half_dim_in(&self, facing: Facing) -> f64 {
        if facing.is_longitudinal() {
            self.robot.half_length_in
        }
        else {
            self.robot.half_width_in
        }
    }
}

impl FieldGeometry {
    pub fn half_extent_in(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.half_extent_x_in,
            Axis::Y => self.half_extent_y_in,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn shipped() -> Params {
        util::params::parse(include_str!("../../../params/pose_corr.toml")).unwrap()
    }

    #[test]
    fn test_shipped_params() {
        let params = shipped();
        assert!(params.validate().is_ok());
        assert_eq!(params.mode, CorrectionMode::SingleAxis);
        assert_eq!(params.sensors.len(), 4);
        assert_eq!(params.min_confidence, None);
        assert!(!params.gate_corner);
        assert_eq!(params.field.half_extent_in(Axis::Y), 72.0);
        assert_eq!(params.robot_half_dim_in(Facing::Back), 7.6875);
        assert_eq!(params.robot_half_dim_in(Facing::Left), 7.0);
    }

    #[test]
    fn test_validate() {
        let mut params = shipped();
        params.cardinal_tolerance_deg = 45.0;
        assert!(params.validate().is_err());

        let mut params = shipped();
        params.wall_threshold_in = 0.0;
        assert!(params.validate().is_err());

        let mut params = shipped();
        let dup = params.sensors[0];
        params.sensors.push(dup);
        assert!(params.validate().is_err());
    }
}
