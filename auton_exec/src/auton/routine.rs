//! Routine definitions and execution

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chassis_if::{motion::MoveParams, pose::Pose, Chassis};
use log::{debug, info};
use serde::Deserialize;

use crate::{ctx::RobotCtx, move_plan::MoveRequest};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single autonomous routine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Routine {
    pub id: u32,
    pub name: String,
    pub description: String,

    #[serde(default)]
    pub steps: Vec<Step>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// One action in a routine.
///
/// Distances and positions are in inches, headings in degrees.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Overwrite the dead-reckoned pose.
    SetPose { x: f64, y: f64, heading: f64 },

    /// Drive along the current heading.
    MoveLinear {
        distance: f64,
        timeout_ms: Option<u64>,
        max_speed: Option<f64>,
        min_speed: Option<f64>,
    },

    /// Drive to an absolute pose.
    MoveToPose {
        x: f64,
        y: f64,
        heading: f64,
        timeout_ms: u64,
        lead: f64,
        min_speed: Option<f64>,
        max_speed: Option<f64>,
    },

    SelectProfile { name: String },

    CorrectPose,

    Wait { ms: u64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Routine {
    /// Run every step of the routine in order.
    pub fn run<C: Chassis>(&self, ctx: &mut RobotCtx<C>) {
        info!("Running routine {} \"{}\" ({} steps)", self.id, self.name, self.steps.len());

        for (i, step) in self.steps.iter().enumerate() {
            debug!("Step {}: {:?}", i, step);
            step.run(ctx);
        }

        info!("Routine {} complete", self.id);
    }
}

impl Step {
    pub fn run<C: Chassis>(&self, ctx: &mut RobotCtx<C>) {
        match *self {
            Step::SetPose { x, y, heading } => ctx.set_pose(Pose::new(x, y, heading)),
            Step::MoveLinear { distance, timeout_ms, max_speed, min_speed } => {
                let request = MoveRequest {
                    distance_in: distance,
                    timeout_ms,
                    max_speed,
                    min_speed,
                };
                ctx.move_linear(&request);
            }
            Step::MoveToPose { x, y, heading, timeout_ms, lead, min_speed, max_speed } => {
                let defaults = ctx.move_planner().params();
                let params = MoveParams {
                    lead,
                    min_speed: min_speed.unwrap_or(defaults.default_min_speed),
                    max_speed: max_speed.unwrap_or(defaults.default_max_speed),
                };
                ctx.move_to_pose(&Pose::new(x, y, heading), timeout_ms, params);
            }
            Step::SelectProfile { ref name } => {
                ctx.select_profile(name, None);
            }
            Step::CorrectPose => {
                ctx.correct_pose();
            }
            Step::Wait { ms } => ctx.wait(ms),
        }
    }
}
