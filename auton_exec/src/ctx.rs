//! # Robot context
//!
//! Owns the chassis and the motion modules, and provides the operations
//! autonomous routines are written in terms of. Nothing in the core keeps
//! global state, everything a routine can touch is reached through here.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chassis_if::{gains::GainSet, motion::MoveParams, pose::Pose, Chassis};
use log::{info, warn};
use util::{archive::Archived, module::State};

use crate::{
    move_plan::{LinearMove, MovePlanner, MoveRequest},
    pose_corr::{self, CorrectionReport, PoseCorr, SensorReading},
    profile::{ProfileMgr, SelectOutcome},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The robot as seen by autonomous routines.
pub struct RobotCtx<C: Chassis> {
    chassis: C,

    profile_mgr: ProfileMgr,
    move_planner: MovePlanner,
    pose_corr: PoseCorr,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C: Chassis> RobotCtx<C> {
    pub fn new(
        chassis: C,
        profile_mgr: ProfileMgr,
        move_planner: MovePlanner,
        pose_corr: PoseCorr,
    ) -> Self {
        Self {
            chassis,
            profile_mgr,
            move_planner,
            pose_corr,
        }
    }

    pub fn chassis(&self) -> &C {
        &self.chassis
    }

    pub fn chassis_mut(&mut self) -> &mut C {
        &mut self.chassis
    }

    pub fn profile_mgr(&self) -> &ProfileMgr {
        &self.profile_mgr
    }

    pub fn pose_corr(&self) -> &PoseCorr {
        &self.pose_corr
    }

    pub fn move_planner(&self) -> &MovePlanner {
        &self.move_planner
    }

    /// Release the chassis.
    pub fn into_chassis(self) -> C {
        self.chassis
    }

    /// The current dead-reckoned pose.
    pub fn pose(&self) -> Pose {
        self.chassis.pose()
    }

    /// Overwrite the dead-reckoned pose.
    pub fn set_pose(&mut self, pose: Pose) {
        self.chassis.set_pose(pose);
    }

    /// Drive a distance along the current heading.
    ///
    /// Blocks until the move executor returns.
    pub fn move_linear(&mut self, request: &MoveRequest) -> LinearMove {
        let planned = self.move_planner.plan(&self.chassis.pose(), request);

        self.chassis.move_to_pose(&planned.target, planned.timeout_ms, planned.params);

        planned
    }

    /// Move to an absolute pose.
    pub fn move_to_pose(&mut self, target: &Pose, timeout_ms: u64, params: MoveParams) {
        self.chassis.move_to_pose(target, timeout_ms, params);
    }

    /// Select the gains used by subsequent moves.
    ///
    /// See [`ProfileMgr::select`].
    pub fn select_profile(&mut self, name: &str, custom: Option<&GainSet>) -> SelectOutcome {
        let outcome = self.profile_mgr.select(&mut self.chassis, name, custom);

        if let Some(unknown) = outcome.unknown_name() {
            warn!("Unknown profile \"{}\" requested", unknown);
        }

        if let Err(e) = self.profile_mgr.write() {
            warn!("Could not archive the active profile: {}", e);
        }

        outcome
    }

    /// Correct the dead-reckoned pose against nearby walls.
    ///
    /// The correction is computed against a snapshot of the pose. Only the
    /// corrected coordinates are then written over a fresh read of the pose,
    /// in a single write, so changes made to the heading (or to an axis
    /// which wasn't corrected) since the snapshot are kept.
    pub fn correct_pose(&mut self) -> CorrectionReport {
        let input = pose_corr::InputData {
            pose: self.chassis.pose(),
            readings: self
                .pose_corr
                .active_sensors()
                .map(|id| SensorReading {
                    id,
                    raw: self.chassis.range_raw(id),
                    confidence: self.chassis.confidence(id),
                })
                .collect(),
        };

        let report = match self.pose_corr.proc(&input) {
            Ok((_, report)) => report,
            Err(e) => match e {},
        };

        if report.is_corrected() {
            let corrected = report.apply_to(self.chassis.pose());
            self.chassis.set_pose(corrected);

            info!(
                "Pose corrected to ({:.3}, {:.3}) in, heading {:.2} deg",
                corrected.x(),
                corrected.y(),
                corrected.heading_deg
            );
        }

        if let Err(e) = self.pose_corr.write() {
            warn!("Could not archive the pose correction: {}", e);
        }

        report
    }

    /// Block for a number of milliseconds.
    pub fn wait(&mut self, ms: u64) {
        self.chassis.delay_ms(ms);
    }
}
