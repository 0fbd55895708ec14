//! # Profile module
//!
//! Stores the named movement tuning profiles and applies them to the live
//! gain state of the chassis. Exactly one set of gains is active at a time
//! and selecting a profile overwrites it completely, nothing is blended.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod mgr;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use mgr::*;
pub use params::*;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The named profiles held by the store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileId {
    /// General purpose tuning.
    Default,
    /// Aggressive tuning which settles quickly and loosely.
    Fast,
    /// Conservative tuning which settles slowly and tightly.
    Precise,
}

/// Errors which can occur while loading the profile store.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Could not load the profile parameters: {0}")]
    LoadError(util::params::LoadError),

    #[error("Could not open the profile archive: {0}")]
    ArchiveError(util::archive::ArchiveError),
}

/// A name which does not match any profile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown profile name \"{0}\"")]
pub struct UnknownProfile(pub String);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProfileId {
    pub const ALL: [ProfileId; 3] = [ProfileId::Default, ProfileId::Fast, ProfileId::Precise];

    pub fn name(self) -> &'static str {
        match self {
            ProfileId::Default => "default",
            ProfileId::Fast => "fast",
            ProfileId::Precise => "precise",
        }
    }
}

impl FromStr for ProfileId {
    type Err = UnknownProfile;

    /// Parse a profile name, ignoring case and surrounding whitespace.
    /// "normal" is accepted for the default profile.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "normal" => Ok(ProfileId::Default),
            "fast" => Ok(ProfileId::Fast),
            "precise" => Ok(ProfileId::Precise),
            _ => Err(UnknownProfile(s.to_string())),
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_profile_id() {
        assert_eq!("precise".parse(), Ok(ProfileId::Precise));
        assert_eq!(" FAST ".parse(), Ok(ProfileId::Fast));
        assert_eq!("normal".parse(), Ok(ProfileId::Default));
        assert_eq!("Default".parse(), Ok(ProfileId::Default));
        assert_eq!(
            "turbo".parse::<ProfileId>(),
            Err(UnknownProfile(String::from("turbo")))
        );
        assert!("".parse::<ProfileId>().is_err());

        for id in ProfileId::ALL.iter() {
            assert_eq!(id.name().parse(), Ok(*id));
        }
    }
}
