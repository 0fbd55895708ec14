//! Profile manager, applies profiles and custom gains to the chassis

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use chassis_if::{gains::GainSet, GainSink};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    params,
    session::{self, Session},
};
use super::{Params, ProfileError, ProfileId, UnknownProfile};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Profile manager state
pub struct ProfileMgr {
    params: Params,

    active: Option<ActiveGains>,
    arch_active: Archiver,
}

/// Archive record of the active gains.
#[derive(Serialize)]
struct ActiveRecord {
    time_s: f64,
    source: String,
    lat_kp: f64,
    lat_ki: f64,
    lat_kd: f64,
    ang_kp: f64,
    ang_ki: f64,
    ang_kd: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Where the gains currently active on the chassis came from.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum ActiveGains {
    Named(ProfileId),
    Custom(GainSet),
}

/// The result of a profile selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// A named profile was applied.
    Named(ProfileId),

    /// Custom gains were applied. `unknown_name` holds the name given
    /// alongside them if it did not match a profile.
    Custom { unknown_name: Option<String> },

    /// Custom gains were applied and then overwritten by the named profile.
    CustomOverridden(ProfileId),

    /// No gains were written.
    Unchanged { unknown_name: Option<String> },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProfileMgr {
    /// Create a new manager from already loaded parameters. No archive is
    /// written.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            active: None,
            arch_active: Archiver::default(),
        }
    }

    /// Load the profile parameters and open the archive in the session.
    pub fn init(param_file_path: &str, session: &Session) -> Result<Self, ProfileError> {
        let params = params::load(param_file_path).map_err(ProfileError::LoadError)?;

        let mut mgr = Self::new(params);
        mgr.arch_active = Archiver::from_path(session, "profile/active.csv")
            .map_err(ProfileError::ArchiveError)?;

        Ok(mgr)
    }

    /// The profile store.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The gains most recently applied through this manager, or `None` if
    /// nothing has been applied yet.
    pub fn active(&self) -> Option<&ActiveGains> {
        self.active.as_ref()
    }

    /// Select gains for the chassis.
    ///
    /// Custom gains, if given, are written first. Then if `name` names a
    /// profile that profile is written over them, so passing both leaves the
    /// named profile active. An empty name applies only the custom gains and
    /// an unknown name is ignored.
    pub fn select<S: GainSink + ?Sized>(
        &mut self,
        sink: &mut S,
        name: &str,
        custom: Option<&GainSet>,
    ) -> SelectOutcome {
        if let Some(gains) = custom {
            gains.write_to(sink);
            self.active = Some(ActiveGains::Custom(*gains));
            debug!("Custom gains applied: {:?}", gains);
        }

        let name = name.trim();
        if name.is_empty() {
            return match custom {
                Some(_) => SelectOutcome::Custom { unknown_name: None },
                None => SelectOutcome::Unchanged { unknown_name: None },
            };
        }

        match name.parse::<ProfileId>() {
            Ok(id) => {
                self.select_named(sink, id);
                if custom.is_some() {
                    warn!("Custom gains were overwritten by the \"{}\" profile", id);
                    SelectOutcome::CustomOverridden(id)
                }
                else {
                    SelectOutcome::Named(id)
                }
            }
            Err(UnknownProfile(unknown)) => {
                debug!("Ignoring unknown profile name \"{}\"", unknown);
                match custom {
                    Some(_) => SelectOutcome::Custom { unknown_name: Some(unknown) },
                    None => SelectOutcome::Unchanged { unknown_name: Some(unknown) },
                }
            }
        }
    }

    /// Apply a named profile.
    pub fn select_named<S: GainSink + ?Sized>(&mut self, sink: &mut S, id: ProfileId) {
        self.params.get(id).write_to(sink);
        self.active = Some(ActiveGains::Named(id));
        info!("Profile \"{}\" applied", id);
    }
}

impl SelectOutcome {
    /// The unrecognised profile name given to the selection, if any.
    pub fn unknown_name(&self) -> Option<&str> {
        match self {
            SelectOutcome::Custom { unknown_name } |
            SelectOutcome::Unchanged { unknown_name } => unknown_name.as_deref(),
            _ => None,
        }
    }
}

impl Archived for ProfileMgr {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let (source, gains) = match self.active {
            Some(ActiveGains::Named(id)) => (id.name().to_string(), *self.params.get(id)),
            Some(ActiveGains::Custom(g)) => (String::from("custom"), g),
            None => return Ok(()),
        };

        self.arch_active.serialise(ActiveRecord {
            time_s: session::get_elapsed_seconds(),
            source,
            lat_kp: gains.lateral.kp,
            lat_ki: gains.lateral.ki,
            lat_kd: gains.lateral.kd,
            ang_kp: gains.angular.kp,
            ang_ki: gains.angular.ki,
            ang_kd: gains.angular.kd,
        })
    }
}
