//! Parameters structure for the move planner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for relative move planning.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Timeout used when a request doesn't give one.
    ///
    /// Units: milliseconds
    pub default_timeout_ms: u64,

    /// Maximum speed used when a request doesn't give one.
    pub default_max_speed: f64,

    /// Minimum speed used when a request doesn't give one.
    pub default_min_speed: f64,

    /// Carrot lead forwarded to the move executor.
    pub lead: f64,

    /// Highest speed the drive can be commanded at.
    pub speed_limit: f64,
}
