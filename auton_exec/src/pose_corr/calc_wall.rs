//! Heading classification and sensor-to-wall measurement

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chassis_if::{
    pose::{Axis, Cardinal, Pose},
    sensor::SensorId,
};
use log::trace;
use util::maths::get_ang_dist_deg;

use super::{CorrectionMode, InputData, PoseCorr, SensorConfig, SensorReading, SkipReason};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A coordinate of the robot centre derived from one sensor reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WallFix {
    pub sensor: SensorId,

    /// Reading converted to inches.
    pub distance_in: f64,

    /// Robot centre coordinate on the wall's axis.
    pub coord_in: f64,
}

/// The best fix for each axis, or the reason there isn't one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisFixes {
    pub x: Result<WallFix, SkipReason>,
    pub y: Result<WallFix, SkipReason>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseCorr {
    /// Find the cardinal direction the heading is squared to.
    pub(crate) fn classify_heading(&self, pose: &Pose) -> Result<Cardinal, SkipReason> {
        let mut nearest = (Cardinal::PosX, std::f64::INFINITY);

        for &cardinal in Cardinal::ALL.iter() {
            let error_deg = get_ang_dist_deg(cardinal.heading_deg(), pose.heading_deg);
            if error_deg.abs() < nearest.1.abs() {
                nearest = (cardinal, error_deg);
            }
        }

        let (cardinal, error_deg) = nearest;
        if error_deg.abs() <= self.params.cardinal_tolerance_deg {
            Ok(cardinal)
        }
        else {
            Err(SkipReason::Misaligned { error_deg })
        }
    }

    /// Measure every active sensor against the wall it faces and keep the
    /// shortest in-range reading on each axis.
    pub(crate) fn calc_wall_fixes(&self, heading: Cardinal, input_data: &InputData) -> AxisFixes {
        let mut fixes = AxisFixes {
            x: Err(SkipReason::NoSensor),
            y: Err(SkipReason::NoSensor),
        };

        for sensor in self.params.sensors.iter() {
            if self.params.mode == CorrectionMode::SingleAxis && !sensor.facing.is_longitudinal() {
                continue;
            }

            let wall = heading.rotated(sensor.facing.quarter_turns());
            let reading = input_data.readings.iter().find(|r| r.id == sensor.id);
            let fix = self.measure(sensor, reading, wall);

            trace!("Sensor {} ({:?}) towards {:?}: {:?}", sensor.id, sensor.facing, wall, fix);

            let slot = match wall.axis() {
                Axis::X => &mut fixes.x,
                Axis::Y => &mut fixes.y,
            };
            merge_fix(slot, fix);
        }

        fixes
    }

    /// Convert a sensor reading into a robot centre coordinate against the
    /// given wall.
    fn measure(
        &self,
        sensor: &SensorConfig,
        reading: Option<&SensorReading>,
        wall: Cardinal,
    ) -> Result<WallFix, SkipReason> {
        let reading = reading.ok_or(SkipReason::SensorUnavailable)?;

        let raw = match reading.raw {
            Some(r) if r.is_finite() && r >= 0.0 => r,
            _ => return Err(SkipReason::SensorUnavailable),
        };

        if let Some(min) = self.params.min_confidence {
            match reading.confidence {
                Some(c) if c >= min => (),
                _ => return Err(SkipReason::LowConfidence),
            }
        }

        let distance_in = raw * self.params.raw_to_in_scale;
        if distance_in >= self.params.wall_threshold_in {
            return Err(SkipReason::NoWall);
        }

        let centre_to_wall_in =
            distance_in + sensor.mount_offset_in + self.params.robot_half_dim_in(sensor.facing);
        let half_extent_in = self.params.field.half_extent_in(wall.axis());

        let coord_in = if wall.is_positive() {
            half_extent_in - centre_to_wall_in
        }
        else {
            -half_extent_in + centre_to_wall_in
        };

        Ok(WallFix {
            sensor: sensor.id,
            distance_in,
            coord_in,
        })
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Merge a new measurement into an axis slot.
///
/// Any fix beats any skip and the shorter of two fixes wins. Between skips
/// the first reason other than `NoSensor` is kept.
fn merge_fix(slot: &mut Result<WallFix, SkipReason>, fix: Result<WallFix, SkipReason>) {
    let replace = match (&*slot, &fix) {
        (Ok(current), Ok(new)) => new.distance_in < current.distance_in,
        (Ok(_), Err(_)) => false,
        (Err(_), Ok(_)) => true,
        (Err(SkipReason::NoSensor), Err(_)) => true,
        (Err(_), Err(_)) => false,
    };

    if replace {
        *slot = fix;
    }
}
