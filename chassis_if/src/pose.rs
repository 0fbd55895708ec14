//! # Pose module
//!
//! Field coordinates have their origin at the centre of the field. Headings
//! are in degrees measured from the positive X axis towards the positive Y
//! axis, so a robot at heading 90 is facing along +Y.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Unit, Vector2};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The estimated position and heading of the robot on the field.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Position in the field frame.
    ///
    /// Units: inches
    pub position_in: Vector2<f64>,

    /// Heading in the field frame, normalised into [0, 360).
    ///
    /// Units: degrees
    pub heading_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// One of the two field axes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// The four axis-aligned directions on the field.
///
/// Each cardinal also names the field boundary a ray in that direction hits,
/// e.g. `PosX` is the wall at `x = +half_extent`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    /// Heading 0
    PosX,
    /// Heading 90
    PosY,
    /// Heading 180
    NegX,
    /// Heading 270
    NegY,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Pose {
    /// Create a new pose, normalising the heading into [0, 360).
    pub fn new(x_in: f64, y_in: f64, heading_deg: f64) -> Self {
        Self {
            position_in: Vector2::new(x_in, y_in),
            heading_deg: normalise_heading(heading_deg),
        }
    }

    pub fn x(&self) -> f64 {
        self.position_in.x
    }

    pub fn y(&self) -> f64 {
        self.position_in.y
    }

    /// Heading in radians, in [0, 2pi).
    pub fn heading_rad(&self) -> f64 {
        self.heading_deg.to_radians()
    }

    /// Unit vector pointing in the direction the robot is facing.
    pub fn heading_vec(&self) -> Unit<Vector2<f64>> {
        let h = self.heading_rad();
        Unit::new_unchecked(Vector2::new(h.cos(), h.sin()))
    }

    /// Get the coordinate of the pose along the given axis.
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.position_in.x,
            Axis::Y => self.position_in.y,
        }
    }

    /// Return a copy of this pose with one coordinate replaced. The heading
    /// and the other coordinate are left untouched.
    pub fn with_coord(mut self, axis: Axis, value_in: f64) -> Self {
        match axis {
            Axis::X => self.position_in.x = value_in,
            Axis::Y => self.position_in.y = value_in,
        }
        self
    }
}

impl Cardinal {
    /// All cardinals in order of increasing heading.
    pub const ALL: [Cardinal; 4] = [Cardinal::PosX, Cardinal::PosY, Cardinal::NegX, Cardinal::NegY];

    /// The heading of this direction in degrees.
    pub fn heading_deg(self) -> f64 {
        90.0 * self.index() as f64
    }

    /// The field axis this direction lies along.
    pub fn axis(self) -> Axis {
        match self {
            Cardinal::PosX | Cardinal::NegX => Axis::X,
            Cardinal::PosY | Cardinal::NegY => Axis::Y,
        }
    }

    /// Whether this direction points towards the positive end of its axis.
    pub fn is_positive(self) -> bool {
        matches!(self, Cardinal::PosX | Cardinal::PosY)
    }

    /// Rotate by a number of counter-clockwise quarter turns.
    pub fn rotated(self, quarter_turns: u8) -> Self {
        Self::ALL[(self.index() + quarter_turns as usize) % 4]
    }

    fn index(self) -> usize {
        match self {
            Cardinal::PosX => 0,
            Cardinal::PosY => 1,
            Cardinal::NegX => 2,
            Cardinal::NegY => 3,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Normalise a heading in degrees into [0, 360).
pub fn normalise_heading(heading_deg: f64) -> f64 {
    let h = heading_deg.rem_euclid(360.0);
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}
