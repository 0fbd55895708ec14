//! # Autonomous routines
//!
//! Routines are loaded from the routine table and executed step by step
//! against a robot context. Slots which have no steps yet do nothing when
//! run.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod routine;
mod selector;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use routine::*;
pub use selector::*;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The routine table.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub selector: SelectorParams,

    pub routines: Vec<Routine>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AutonError {
    #[error("Could not load the routine table: {0}")]
    LoadError(util::params::LoadError),

    #[error("Routine {0} is defined more than once")]
    DuplicateRoutine(u32),

    #[error("No routine with id {0}")]
    UnknownRoutine(u32),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Load and check the routine table.
    pub fn load(param_file_path: &str) -> Result<Self, AutonError> {
        let params: Self = util::params::load(param_file_path)
            .map_err(AutonError::LoadError)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), AutonError> {
        for (i, routine) in self.routines.iter().enumerate() {
            if self.routines[..i].iter().any(|r| r.id == routine.id) {
                return Err(AutonError::DuplicateRoutine(routine.id));
            }
        }

        Ok(())
    }

    /// Find a routine by id.
    pub fn routine(&self, id: u32) -> Result<&Routine, AutonError> {
        self.routines
            .iter()
            .find(|r| r.id == id)
            .ok_or(AutonError::UnknownRoutine(id))
    }

    /// The selector over this table.
    pub fn selector(&self) -> AutonSelector {
        AutonSelector::new(self.selector, self.routines.len() as u32)
    }
}
