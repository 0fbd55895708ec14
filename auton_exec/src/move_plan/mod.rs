//! # Relative move planner
//!
//! Converts a signed distance along the robot's current heading into an
//! absolute target pose for the chassis' move executor. The target keeps the
//! current heading, so the move is a pure translation: no arc is planned and
//! the executor is trusted to approach the target directly.
//!
//! Targets are not checked for reachability, keeping them inside the field
//! is up to the caller.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::Params;

use chassis_if::{motion::MoveParams, pose::Pose};
use log::trace;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A request to drive a distance along the current heading.
///
/// Anything left as `None` takes the default from the planner parameters.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MoveRequest {
    /// Distance to travel, negative to reverse.
    ///
    /// Units: inches
    pub distance_in: f64,

    /// Time limit for the move.
    ///
    /// Units: milliseconds
    pub timeout_ms: Option<u64>,

    pub max_speed: Option<f64>,

    pub min_speed: Option<f64>,
}

/// A planned move ready to be forwarded to the move executor.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LinearMove {
    pub target: Pose,
    pub timeout_ms: u64,
    pub params: MoveParams,
}

/// Plans linear moves with the configured defaults.
#[derive(Debug, Clone)]
pub struct MovePlanner {
    params: Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MoveRequest {
    /// A request for the given distance using the default timeout and speeds.
    pub fn new(distance_in: f64) -> Self {
        Self {
            distance_in,
            ..Default::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_speeds(mut self, min_speed: f64, max_speed: f64) -> Self {
        self.min_speed = Some(min_speed);
        self.max_speed = Some(max_speed);
        self
    }
}

impl MovePlanner {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Plan a linear move from the given pose.
    ///
    /// Speeds are limited to `[0, speed_limit]` and the minimum speed is
    /// never allowed above the maximum.
    pub fn plan(&self, pose: &Pose, request: &MoveRequest) -> LinearMove {
        let limit = self.params.speed_limit;

        let max_speed = request
            .max_speed
            .unwrap_or(self.params.default_max_speed)
            .max(0.0)
            .min(limit);
        let min_speed = request
            .min_speed
            .unwrap_or(self.params.default_min_speed)
            .max(0.0)
            .min(max_speed);

        let planned = LinearMove {
            target: plan_linear_move(pose, request.distance_in),
            timeout_ms: request.timeout_ms.unwrap_or(self.params.default_timeout_ms),
            params: MoveParams {
                lead: self.params.lead,
                min_speed,
                max_speed,
            },
        };

        trace!(
            "Linear move of {:.3} in from {:?} planned to {:?}",
            request.distance_in,
            pose,
            planned.target
        );

        planned
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the pose `distance_in` ahead of `pose` along its heading.
///
/// The returned heading is bit-for-bit the input heading.
pub fn plan_linear_move(pose: &Pose, distance_in: f64) -> Pose {
    let mut target = *pose;
    target.position_in += pose.heading_vec().into_inner() * distance_in;
    target
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn planner() -> MovePlanner {
        MovePlanner::new(
            util::params::parse(include_str!("../../../params/move_plan.toml")).unwrap()
        )
    }

    #[test]
    fn test_plan_linear_move() {
        let t = plan_linear_move(&Pose::new(0.0, 0.0, 0.0), 12.0);
        assert_abs_diff_eq!(t.x(), 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.y(), 0.0, epsilon = 1e-9);
        assert_eq!(t.heading_deg, 0.0);

        let t = plan_linear_move(&Pose::new(0.0, 0.0, 90.0), 12.0);
        assert_abs_diff_eq!(t.x(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.y(), 12.0, epsilon = 1e-9);
        assert_eq!(t.heading_deg, 90.0);

        // Reversing from an offset start
        let t = plan_linear_move(&Pose::new(10.0, -5.0, 180.0), -6.0);
        assert_abs_diff_eq!(t.x(), 16.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.y(), -5.0, epsilon = 1e-9);

        // Diagonal
        let t = plan_linear_move(&Pose::new(1.0, 1.0, 45.0), 2f64.sqrt());
        assert_abs_diff_eq!(t.x(), 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.y(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_heading_preserved() {
        let pose = Pose::new(3.0, 4.0, 137.123456789);
        let t = plan_linear_move(&pose, 24.0);
        assert_eq!(t.heading_deg.to_bits(), pose.heading_deg.to_bits());
    }

    #[test]
    fn test_planner_defaults() {
        let planner = planner();
        let mv = planner.plan(&Pose::new(0.0, 0.0, 0.0), &MoveRequest::new(12.0));

        assert_eq!(mv.timeout_ms, 2000);
        assert_eq!(mv.params, MoveParams { lead: 0.2, min_speed: 40.0, max_speed: 70.0 });
        assert_abs_diff_eq!(mv.target.x(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_planner_limits() {
        let planner = planner();
        let pose = Pose::default();

        let mv = planner.plan(
            &pose,
            &MoveRequest::new(5.0).with_timeout_ms(500).with_speeds(90.0, 200.0),
        );
        assert_eq!(mv.timeout_ms, 500);
        assert_eq!(mv.params.max_speed, 127.0);
        assert_eq!(mv.params.min_speed, 90.0);

        // Minimum above maximum is pulled down
        let mv = planner.plan(&pose, &MoveRequest::new(5.0).with_speeds(80.0, 50.0));
        assert_eq!(mv.params.min_speed, 50.0);
        assert_eq!(mv.params.max_speed, 50.0);
    }
}
