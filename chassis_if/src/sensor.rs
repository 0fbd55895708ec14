//! # Distance sensor module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Identifies a distance sensor by the smart port it is plugged into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(pub u8);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The side of the robot a sensor looks out of.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Front,
    Left,
    Back,
    Right,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Facing {
    /// Number of counter-clockwise quarter turns from the robot's heading to
    /// the direction this side faces.
    pub fn quarter_turns(self) -> u8 {
        match self {
            Facing::Front => 0,
            Facing::Left => 1,
            Facing::Back => 2,
            Facing::Right => 3,
        }
    }

    /// Whether this side looks along the robot's direction of travel.
    pub fn is_longitudinal(self) -> bool {
        matches!(self, Facing::Front | Facing::Back)
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {}", self.0)
    }
}
