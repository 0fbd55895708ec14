//! Routine and team selection from the brain's potentiometer and team switch

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;
use serde::{Deserialize, Serialize};
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Raw range of the selection potentiometer.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct SelectorParams {
    pub pot_min: f64,
    pub pot_max: f64,
}

/// Chooses the routine to run before the match starts.
#[derive(Debug, Clone)]
pub struct AutonSelector {
    params: SelectorParams,
    num_routines: u32,

    team: Team,
    switch_was_pressed: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutonSelector {
    /// Create a selector over routines `1..=num_routines`, starting on the
    /// red team.
    pub fn new(params: SelectorParams, num_routines: u32) -> Self {
        Self {
            params,
            num_routines,
            team: Team::Red,
            switch_was_pressed: false,
        }
    }

    /// The routine id selected by a potentiometer reading.
    ///
    /// The pot range is split evenly across the routines, readings outside
    /// the range select the first or last routine.
    pub fn routine_id(&self, pot_raw: f64) -> u32 {
        if self.num_routines <= 1 {
            return 1;
        }

        let id = lin_map(
            (self.params.pot_min, self.params.pot_max),
            (1.0, self.num_routines as f64),
            pot_raw,
        )
        .round();

        if id.is_nan() {
            1
        }
        else {
            id.max(1.0).min(self.num_routines as f64) as u32
        }
    }

    /// Update from the team switch. The team flips once per press, holding
    /// the switch down does nothing more.
    pub fn update_team(&mut self, pressed: bool) -> Team {
        if pressed && !self.switch_was_pressed {
            self.team = match self.team {
                Team::Red => Team::Blue,
                Team::Blue => Team::Red,
            };
            info!("Team changed to {:?}", self.team);
        }
        self.switch_was_pressed = pressed;

        self.team
    }

    pub fn team(&self) -> Team {
        self.team
    }
}
