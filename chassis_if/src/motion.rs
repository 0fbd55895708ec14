//! # Motion module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters forwarded to the move executor alongside a target pose.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveParams {
    /// How far the executor's carrot point leads the target along the
    /// approach heading. Higher values give a wider curve.
    pub lead: f64,

    /// Minimum drive speed. Non-zero values let the executor exit early.
    pub min_speed: f64,

    /// Maximum drive speed.
    pub max_speed: f64,
}
