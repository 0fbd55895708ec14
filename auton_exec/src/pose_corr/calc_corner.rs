//! Two-axis corner correction

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chassis_if::pose::Pose;
use log::{debug, warn};

use super::{calc_wall::AxisFixes, AxisOutcome, CorrectionReport, PoseCorr};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseCorr {
    /// Correct both axes when walls are in range on both.
    ///
    /// With a wall on only one axis this is the same as a single axis
    /// correction. With walls on both the fixes are accepted without the
    /// slack gate, unless `gate_corner` is set.
    pub(crate) fn calc_corner(&self, pose: &Pose, fixes: AxisFixes) -> CorrectionReport {
        let (fx, fy) = match (fixes.x, fixes.y) {
            (Ok(fx), Ok(fy)) if !self.params.gate_corner => (fx, fy),
            _ => return self.calc_single_axis(pose, fixes),
        };

        let slack = self.params.gate_slack_in;
        if (fx.coord_in - pose.x()).abs() > slack || (fy.coord_in - pose.y()).abs() > slack {
            warn!(
                "Ungated corner correction moves the pose from ({:.3}, {:.3}) to ({:.3}, {:.3})",
                pose.x(), pose.y(), fx.coord_in, fy.coord_in
            );
        }
        else {
            debug!("Corner correction from sensors {} and {}", fx.sensor, fy.sensor);
        }

        CorrectionReport {
            pose: *pose,
            x: AxisOutcome::Corrected {
                from_in: pose.x(),
                to_in: fx.coord_in,
                sensor: fx.sensor,
            },
            y: AxisOutcome::Corrected {
                from_in: pose.y(),
                to_in: fy.coord_in,
                sensor: fy.sensor,
            },
        }
    }
}
