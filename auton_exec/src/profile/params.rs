//! Parameters structure for the profile store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use chassis_if::gains::GainSet;
use super::ProfileId;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The named gain profiles.
///
/// Every profile must be present in the parameter file, there is no
/// fallback for a missing one.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub default: GainSet,
    pub fast: GainSet,
    pub precise: GainSet,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Get the gains of a profile.
    pub fn get(&self, id: ProfileId) -> &GainSet {
        match id {
            ProfileId::Default => &self.default,
            ProfileId::Fast => &self.fast,
            ProfileId::Precise => &self.precise,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chassis_if::gains::ControlAxis;

    #[test]
    fn test_shipped_profiles() {
        let params: Params = util::params::parse(
            include_str!("../../../params/profiles.toml")
        ).unwrap();

        let default = params.get(ProfileId::Default);
        assert_eq!(default.lateral.kp, 7.0);
        assert_eq!(default.lateral.kd, 9.0);
        assert_eq!(default.lateral.slew, 15.0);
        assert_eq!(default.angular.kp, 2.0);
        assert_eq!(default.angular.kd, 16.0);

        // Every profile is distinct
        assert_ne!(params.get(ProfileId::Fast), params.get(ProfileId::Precise));
        assert_ne!(params.get(ProfileId::Fast), default);
        assert!(
            params.get(ProfileId::Precise).axis(ControlAxis::Lateral).small_error
                < default.lateral.small_error
        );
    }
}
