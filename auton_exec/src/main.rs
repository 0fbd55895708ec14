//! Autonomous routine executable entry point.
//!
//! # Architecture
//!
//! The execution methodology consists of:
//!
//!     - Initialise the session and logging
//!     - Load the parameters of every module
//!     - Build the robot context on top of the simulated chassis
//!     - Select and run the routine
//!     - Run a final pose correction and save a summary of the run
//!
//! # Modules
//!
//! All modules (e.g. `pose_corr`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait, or a plain
//!        manager type if the module has no cyclic processing.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use serde::Serialize;
use structopt::StructOpt;

// Internal
use auton_lib::{
    auton::{self, Team},
    ctx::RobotCtx,
    move_plan::{self, MovePlanner},
    pose_corr::{CorrectionReport, PoseCorr},
    profile::ProfileMgr,
    sim_chassis::SimChassis,
};
use chassis_if::pose::Pose;
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Run an autonomous routine against the simulated chassis.
#[derive(Debug, StructOpt)]
#[structopt(name = "auton_exec")]
struct Opts {
    /// Id of the routine to run. If not given the routine is chosen from the
    /// potentiometer reading.
    routine: Option<u32>,

    /// Raw potentiometer reading used to select the routine.
    #[structopt(long, default_value = "0")]
    pot: f64,

    /// Number of presses of the team switch before the match starts.
    #[structopt(long, default_value = "0")]
    team_presses: u32,

    /// Drift along X injected before the final pose correction.
    ///
    /// Units: inches
    #[structopt(long, default_value = "0", allow_hyphen_values = true)]
    drift_x: f64,

    /// Drift along Y injected before the final pose correction.
    ///
    /// Units: inches
    #[structopt(long, default_value = "0", allow_hyphen_values = true)]
    drift_y: f64,

    /// Log debug and trace records.
    #[structopt(short, long)]
    verbose: bool,
}

/// Summary of a run, saved into the session.
#[derive(Serialize)]
struct RunSummary {
    routine_id: u32,
    routine_name: String,
    team: Team,
    num_moves: usize,
    elapsed_ms: u64,
    final_pose: Pose,
    true_pose: Pose,
    final_correction: CorrectionReport,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    let opts = Opts::from_args();

    // Initialise session
    let session = Session::new(
        "auton_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    let min_level = if opts.verbose { LevelFilter::Trace } else { LevelFilter::Info };
    logger_init(min_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Autonomous Routine Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let auton_params = auton::Params::load("autons.toml")
        .wrap_err("Could not load the routine table")?;

    let move_plan_params: move_plan::Params = util::params::load("move_plan.toml")
        .wrap_err("Could not load the move planner params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut pose_corr = PoseCorr::default();
    pose_corr.init("pose_corr.toml", &session)
        .wrap_err("Failed to initialise PoseCorr")?;
    info!("PoseCorr init complete");

    let profile_mgr = ProfileMgr::init("profiles.toml", &session)
        .wrap_err("Failed to initialise ProfileMgr")?;
    info!("ProfileMgr init complete");

    let chassis = SimChassis::new(pose_corr.params(), Pose::default());

    let mut ctx = RobotCtx::new(
        chassis,
        profile_mgr,
        MovePlanner::new(move_plan_params),
        pose_corr,
    );

    // Start on the default gains, as the chassis does on boot
    ctx.select_profile("default", None);

    info!("Module initialisation complete\n");

    // ---- SELECTION ----

    let mut selector = auton_params.selector();
    for _ in 0..opts.team_presses {
        selector.update_team(true);
        selector.update_team(false);
    }

    let routine_id = match opts.routine {
        Some(id) => id,
        None => {
            let id = selector.routine_id(opts.pot);
            info!("Potentiometer reading {} selects routine {}", opts.pot, id);
            id
        }
    };

    let routine = auton_params.routine(routine_id)
        .wrap_err("Could not select the routine")?;

    info!("Team: {:?}", selector.team());
    info!("Routine {}: {} - {}", routine.id, routine.name, routine.description);

    if routine.steps.is_empty() {
        warn!("Routine {} has no steps", routine.id);
    }

    // ---- RUN ----

    routine.run(&mut ctx);

    if opts.drift_x != 0.0 || opts.drift_y != 0.0 {
        ctx.chassis_mut().inject_drift(opts.drift_x, opts.drift_y);
    }

    let final_correction = ctx.correct_pose();

    // ---- SHUTDOWN ----

    let final_pose = ctx.pose();
    info!(
        "Final pose: ({:.3}, {:.3}) in, heading {:.2} deg",
        final_pose.x(),
        final_pose.y(),
        final_pose.heading_deg
    );

    let chassis = ctx.into_chassis();
    let summary = RunSummary {
        routine_id: routine.id,
        routine_name: routine.name.clone(),
        team: selector.team(),
        num_moves: chassis.moves().len(),
        elapsed_ms: chassis.elapsed_ms(),
        final_pose,
        true_pose: chassis.true_pose(),
        final_correction,
    };

    session.save_json("summary.json", &summary)
        .wrap_err("Failed to save the run summary")?;

    info!("End of execution");

    Ok(())
}
