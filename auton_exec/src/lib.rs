//! # Autonomous motion library.
//!
//! This library allows other crates in the workspace to access items defined inside the auton
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Autonomous routines - the routine table, execution and pre-match selection
pub mod auton;

/// Robot context - ties the motion modules to a chassis
pub mod ctx;

/// Move planner - converts relative moves into absolute target poses
pub mod move_plan;

/// Pose correction - corrects the dead-reckoned pose against the field walls
pub mod pose_corr;

/// Profile module - named gain profiles and their selection
pub mod profile;

/// Simulated chassis - an ideal plant for dry runs and tests
pub mod sim_chassis;
