//! Gated per-axis correction

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chassis_if::pose::{Axis, Pose};
use log::debug;

use super::{
    calc_wall::{AxisFixes, WallFix},
    AxisOutcome, CorrectionReport, PoseCorr, SkipReason,
};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseCorr {
    /// Correct each axis independently, rejecting any fix outside the gate.
    pub(crate) fn calc_single_axis(&self, pose: &Pose, fixes: AxisFixes) -> CorrectionReport {
        CorrectionReport {
            pose: *pose,
            x: self.calc_gated(pose, Axis::X, fixes.x),
            y: self.calc_gated(pose, Axis::Y, fixes.y),
        }
    }

    /// Check a fix against the dead-reckoned coordinate.
    ///
    /// The gate is inclusive, a fix exactly `gate_slack_in` away is accepted.
    fn calc_gated(
        &self,
        pose: &Pose,
        axis: Axis,
        fix: Result<WallFix, SkipReason>,
    ) -> AxisOutcome {
        let fix = match fix {
            Ok(f) => f,
            Err(reason) => return AxisOutcome::Skipped(reason),
        };

        let from_in = pose.coord(axis);
        let delta_in = fix.coord_in - from_in;

        if delta_in.abs() > self.params.gate_slack_in {
            debug!(
                "Rejected {:?} fix from sensor {}: {:.3} in from dead reckoning",
                axis, fix.sensor, delta_in
            );
            return AxisOutcome::Skipped(SkipReason::GateRejected { delta_in });
        }

        AxisOutcome::Corrected {
            from_in,
            to_in: fix.coord_in,
            sensor: fix.sensor,
        }
    }
}
