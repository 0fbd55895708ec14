//! Implementations for the PoseCorr state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use chassis_if::{pose::Pose, sensor::SensorId};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::{self, Session},
};
use super::{CorrectionMode, CorrectionReport, Params, PoseCorrInitError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Pose correction module state
#[derive(Default)]
pub struct PoseCorr {
    pub(crate) params: Params,

    pub(crate) report: Option<CorrectionReport>,
    arch_report: Archiver,
}

/// Input data to pose correction.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    /// Dead-reckoned pose the correction is computed against.
    pub pose: Pose,

    /// One sample from each distance sensor. Sensors missing from this list
    /// are treated as unavailable.
    pub readings: Vec<SensorReading>,
}

/// A single sample from a distance sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub id: SensorId,

    /// Raw range, `None` if the sensor could not be read.
    pub raw: Option<f64>,

    /// Reported confidence, `None` if the sensor could not be read.
    pub confidence: Option<u32>,
}

/// Archive record of one correction cycle.
#[derive(Serialize)]
struct ReportRecord {
    time_s: f64,
    x_in: f64,
    y_in: f64,
    heading_deg: f64,
    x_outcome: &'static str,
    x_corrected_in: Option<f64>,
    y_outcome: &'static str,
    y_corrected_in: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for PoseCorr {
    type InitData = &'static str;
    type InitError = PoseCorrInitError;

    type InputData = InputData;
    type OutputData = Option<Pose>;
    type StatusReport = CorrectionReport;
    type ProcError = Infallible;

    /// Initialise the PoseCorr module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(PoseCorrInitError::LoadError)?;
        params.validate().map_err(PoseCorrInitError::InvalidParams)?;
        self.params = params;

        self.arch_report = Archiver::from_path(session, "pose_corr/status_report.csv")
            .map_err(PoseCorrInitError::ArchiveError)?;

        Ok(())
    }

    /// Perform one correction cycle.
    ///
    /// The output is the corrected pose, or `None` if no axis was corrected.
    /// The corrected pose is derived from the input pose, the caller is
    /// responsible for committing it.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let pose = input_data.pose;

        let report = match self.classify_heading(&pose) {
            Ok(cardinal) => {
                let fixes = self.calc_wall_fixes(cardinal, input_data);
                match self.params.mode {
                    CorrectionMode::SingleAxis => self.calc_single_axis(&pose, fixes),
                    CorrectionMode::Corner => self.calc_corner(&pose, fixes),
                }
            }
            Err(reason) => {
                debug!("Heading {:.2} deg not squared to a wall", pose.heading_deg);
                CorrectionReport::skipped(pose, reason)
            }
        };

        trace!("PoseCorr report:\n    x: {:?}\n    y: {:?}", report.x, report.y);

        self.report = Some(report);

        let output = if report.is_corrected() {
            Some(report.apply_to(pose))
        }
        else {
            None
        };

        Ok((output, report))
    }
}

impl Archived for PoseCorr {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let report = match self.report {
            Some(r) => r,
            None => return Ok(()),
        };

        let corrected = |o: &super::AxisOutcome| match o {
            super::AxisOutcome::Corrected { to_in, .. } => Some(*to_in),
            _ => None,
        };

        self.arch_report.serialise(ReportRecord {
            time_s: session::get_elapsed_seconds(),
            x_in: report.pose.x(),
            y_in: report.pose.y(),
            heading_deg: report.pose.heading_deg,
            x_outcome: report.x.label(),
            x_corrected_in: corrected(&report.x),
            y_outcome: report.y.label(),
            y_corrected_in: corrected(&report.y),
        })
    }
}

impl PoseCorr {
    /// Create a pose corrector from already loaded parameters. No archive is
    /// written.
    pub fn from_params(params: Params) -> Result<Self, PoseCorrInitError> {
        params.validate().map_err(PoseCorrInitError::InvalidParams)?;

        Ok(Self {
            params,
            ..Default::default()
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The report from the most recent cycle.
    pub fn last_report(&self) -> Option<&CorrectionReport> {
        self.report.as_ref()
    }

    /// The sensors which take part in a correction in the configured mode.
    pub fn active_sensors(&self) -> impl Iterator<Item = SensorId> + '_ {
        let mode = self.params.mode;
        self.params
            .sensors
            .iter()
            .filter(move |s| mode == CorrectionMode::Corner || s.facing.is_longitudinal())
            .map(|s| s.id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pose_corr::{AxisOutcome, SkipReason};
    use approx::assert_abs_diff_eq;
    use chassis_if::pose::{Axis, Cardinal};

    const FRONT: SensorId = SensorId(5);
    const BACK: SensorId = SensorId(19);
    const LEFT: SensorId = SensorId(18);
    const RIGHT: SensorId = SensorId(4);

    /// Shipped parameters, but with readings given directly in inches.
    fn params_in() -> Params {
        let mut params: Params =
            util::params::parse(include_str!("../../../params/pose_corr.toml")).unwrap();
        params.raw_to_in_scale = 1.0;
        params
    }

    fn corr(params: Params) -> PoseCorr {
        PoseCorr::from_params(params).unwrap()
    }

    fn reading(id: SensorId, raw: f64) -> SensorReading {
        SensorReading { id, raw: Some(raw), confidence: Some(63) }
    }

    fn input(pose: Pose, readings: &[(SensorId, f64)]) -> InputData {
        InputData {
            pose,
            readings: readings.iter().map(|&(id, raw)| reading(id, raw)).collect(),
        }
    }

    fn run(corr: &mut PoseCorr, input: &InputData) -> (Option<Pose>, CorrectionReport) {
        match corr.proc(input) {
            Ok(r) => r,
            Err(e) => match e {},
        }
    }

    #[test]
    fn test_front_sensor_positive_wall() {
        let mut corr = corr(params_in());

        // True x is 50: 72 - (8.8125 + 5.5 + 7.6875)
        let pose = Pose::new(51.0, 10.0, 0.0);
        let (out, report) = run(&mut corr, &input(pose, &[(FRONT, 8.8125), (BACK, 100.0)]));

        assert_eq!(report.x, AxisOutcome::Corrected { from_in: 51.0, to_in: 50.0, sensor: FRONT });
        assert_eq!(report.y, AxisOutcome::Skipped(SkipReason::NoSensor));

        let out = out.unwrap();
        assert_eq!(out.x(), 50.0);
        assert_eq!(out.y(), 10.0);
        assert_eq!(out.heading_deg.to_bits(), pose.heading_deg.to_bits());
        assert_eq!(corr.last_report(), Some(&report));
    }

    #[test]
    fn test_negative_walls() {
        let mut corr = corr(params_in());

        // Facing -X, front sensor looks at the -X wall
        let (out, _) = run(
            &mut corr,
            &input(Pose::new(-49.0, 0.0, 180.0), &[(FRONT, 8.8125), (BACK, 100.0)]),
        );
        assert_eq!(out.unwrap().x(), -50.0);

        // Facing +X, back sensor looks at the -X wall
        let (out, report) = run(
            &mut corr,
            &input(Pose::new(-56.0, 0.0, 0.0), &[(FRONT, 100.0), (BACK, 7.9375)]),
        );
        assert_eq!(report.x, AxisOutcome::Corrected { from_in: -56.0, to_in: -55.0, sensor: BACK });
        assert_eq!(out.unwrap().x(), -55.0);

        // Facing -Y, front sensor looks at the -Y wall
        let (out, report) = run(
            &mut corr,
            &input(Pose::new(3.0, -54.0, 268.0), &[(FRONT, 3.8125), (BACK, 100.0)]),
        );
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::NoSensor));
        assert_eq!(out.unwrap().y(), -55.0);
    }

    #[test]
    fn test_aligned_headings_correct_one_axis() {
        let mut corr = corr(params_in());

        for &cardinal in Cardinal::ALL.iter() {
            let axis = cardinal.axis();
            let sign = if cardinal.is_positive() { 1.0 } else { -1.0 };
            // 72 - (4 + 5.5 + 7.6875)
            let wall_coord = sign * 54.8125;

            for offset in -15..=15 {
                let heading = cardinal.heading_deg() + offset as f64;
                let pose = Pose::new(0.0, 0.0, heading).with_coord(axis, wall_coord + 1.0);

                let (out, report) = run(&mut corr, &input(pose, &[(FRONT, 4.0), (BACK, 100.0)]));
                let out = out.unwrap();

                assert_eq!(
                    *report.axis(axis),
                    AxisOutcome::Corrected { from_in: wall_coord + 1.0, to_in: wall_coord, sensor: FRONT },
                    "heading {}", heading
                );
                let other = if axis == Axis::X { Axis::Y } else { Axis::X };
                assert!(!report.axis(other).is_corrected());
                assert_eq!(out.coord(other), pose.coord(other));
                assert_eq!(out.heading_deg.to_bits(), pose.heading_deg.to_bits());
            }
        }
    }

    #[test]
    fn test_misaligned_headings_are_noop() {
        let mut params = params_in();
        params.mode = CorrectionMode::Corner;
        let mut corr = corr(params);

        let all_in_range = [(FRONT, 1.0), (BACK, 1.0), (LEFT, 1.0), (RIGHT, 1.0)];

        for quadrant in 0..4 {
            for offset in 16..=74 {
                let heading = (90 * quadrant + offset) as f64;
                let (out, report) = run(
                    &mut corr,
                    &input(Pose::new(55.0, 55.0, heading), &all_in_range),
                );

                assert_eq!(out, None, "heading {}", heading);
                match report.x {
                    AxisOutcome::Skipped(SkipReason::Misaligned { error_deg }) => {
                        assert!(error_deg.abs() > 15.0)
                    }
                    o => panic!("Expected misaligned at heading {}, got {:?}", heading, o),
                }
                assert_eq!(report.x, report.y);
            }
        }

        // Just outside the band
        let (out, report) = run(
            &mut corr,
            &input(Pose::new(55.0, 55.0, 15.5), &all_in_range),
        );
        assert_eq!(out, None);
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::Misaligned { error_deg: 15.5 }));
    }

    #[test]
    fn test_wall_threshold() {
        let mut corr = corr(params_in());
        let pose = Pose::new(45.0, 0.0, 0.0);

        // The threshold itself counts as no wall
        let (out, report) = run(&mut corr, &input(pose, &[(FRONT, 12.0), (BACK, 100.0)]));
        assert_eq!(out, None);
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::NoWall));

        // Just inside is a wall: 72 - (11.9 + 13.1875) = 46.9125
        let (out, _) = run(&mut corr, &input(pose, &[(FRONT, 11.9), (BACK, 100.0)]));
        assert_abs_diff_eq!(out.unwrap().x(), 46.9125, epsilon = 1e-9);
    }

    #[test]
    fn test_gate() {
        let mut corr = corr(params_in());

        // 4 in of drift is rejected
        let (out, report) = run(
            &mut corr,
            &input(Pose::new(54.0, 0.0, 0.0), &[(FRONT, 8.8125), (BACK, 100.0)]),
        );
        assert_eq!(out, None);
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::GateRejected { delta_in: -4.0 }));

        // Exactly the slack is accepted
        let (out, _) = run(
            &mut corr,
            &input(Pose::new(47.0, 0.0, 0.0), &[(FRONT, 8.8125), (BACK, 100.0)]),
        );
        assert_eq!(out.unwrap().x(), 50.0);
    }

    #[test]
    fn test_idempotent() {
        let mut corr = corr(params_in());
        let readings = [(FRONT, 8.8125), (BACK, 100.0)];

        let (once, _) = run(&mut corr, &input(Pose::new(52.5, -7.0, 3.0), &readings));
        let once = once.unwrap();

        let (twice, report) = run(&mut corr, &input(once, &readings));
        let twice = twice.map_or(once, |p| p);

        assert_eq!(twice, once);
        assert_eq!(report.x, AxisOutcome::Corrected { from_in: 50.0, to_in: 50.0, sensor: FRONT });
    }

    #[test]
    fn test_millimeter_readings() {
        let params: Params =
            util::params::parse(include_str!("../../../params/pose_corr.toml")).unwrap();
        let mut corr = corr(params);

        let (out, _) = run(
            &mut corr,
            &input(Pose::new(51.0, 0.0, 0.0), &[(FRONT, 8.8125 * 25.4), (BACK, 9999.0)]),
        );
        assert_abs_diff_eq!(out.unwrap().x(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shortest_reading_wins() {
        let mut corr = corr(params_in());

        // Back sensor is nearer its wall: -72 + (2 + 1.375 + 7.6875)
        let (out, report) = run(
            &mut corr,
            &input(Pose::new(-60.0, 0.0, 0.0), &[(FRONT, 8.8125), (BACK, 2.0)]),
        );
        assert_eq!(out.unwrap().x(), -60.9375);
        match report.x {
            AxisOutcome::Corrected { sensor, .. } => assert_eq!(sensor, BACK),
            o => panic!("Expected a correction, got {:?}", o),
        }
    }

    #[test]
    fn test_unavailable_sensors() {
        let mut corr = corr(params_in());
        let pose = Pose::new(50.0, 0.0, 0.0);

        // Missing from the input
        let (out, report) = run(&mut corr, &input(pose, &[]));
        assert_eq!(out, None);
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::SensorUnavailable));

        // Read failure and garbage values
        for raw in [None, Some(-1.0), Some(std::f64::NAN)].iter() {
            let input = InputData {
                pose,
                readings: vec![
                    SensorReading { id: FRONT, raw: *raw, confidence: None },
                    SensorReading { id: BACK, raw: *raw, confidence: None },
                ],
            };
            let (out, report) = run(&mut corr, &input);
            assert_eq!(out, None);
            assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::SensorUnavailable));
        }

        // One sensor failing doesn't hide the other
        let input = InputData {
            pose,
            readings: vec![
                SensorReading { id: FRONT, raw: None, confidence: None },
                reading(BACK, 100.0),
            ],
        };
        let (_, report) = run(&mut corr, &input);
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::SensorUnavailable));
    }

    #[test]
    fn test_confidence_gate() {
        let mut params = params_in();
        params.min_confidence = Some(32);
        let mut corr = corr(params);
        let pose = Pose::new(51.0, 0.0, 0.0);

        let low = InputData {
            pose,
            readings: vec![SensorReading { id: FRONT, raw: Some(8.8125), confidence: Some(10) }],
        };
        let (out, report) = run(&mut corr, &low);
        assert_eq!(out, None);
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::LowConfidence));

        let high = InputData {
            pose,
            readings: vec![SensorReading { id: FRONT, raw: Some(8.8125), confidence: Some(40) }],
        };
        let (out, _) = run(&mut corr, &high);
        assert_eq!(out.unwrap().x(), 50.0);
    }

    #[test]
    fn test_single_axis_ignores_side_sensors() {
        let mut corr = corr(params_in());
        assert_eq!(corr.active_sensors().collect::<Vec<_>>(), vec![FRONT, BACK]);

        // Facing +Y, right sensor sees the +X wall but isn't used
        let (_, report) = run(
            &mut corr,
            &input(Pose::new(61.0, 54.0, 90.0), &[(FRONT, 3.8125), (BACK, 100.0), (RIGHT, 3.25)]),
        );
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::NoSensor));
        assert!(report.y.is_corrected());
    }

    #[test]
    fn test_corner() {
        let mut params = params_in();
        params.mode = CorrectionMode::Corner;
        let mut corr = corr(params.clone());
        assert_eq!(corr.active_sensors().count(), 4);

        // True pose (60, 55) facing +Y: front sees +Y, right sees +X
        let far = 100.0;
        let corner = [(FRONT, 3.8125), (RIGHT, 3.25), (LEFT, far), (BACK, far)];

        // Both axes update together, without the gate
        let pose = Pose::new(66.0, 50.0, 92.0);
        let (out, report) = run(&mut corr, &input(pose, &corner));
        let out = out.unwrap();
        assert_eq!(report.x, AxisOutcome::Corrected { from_in: 66.0, to_in: 60.0, sensor: RIGHT });
        assert_eq!(report.y, AxisOutcome::Corrected { from_in: 50.0, to_in: 55.0, sensor: FRONT });
        assert_eq!((out.x(), out.y()), (60.0, 55.0));
        assert_eq!(out.heading_deg.to_bits(), pose.heading_deg.to_bits());

        // Take the right sensor out of range: single, gated, Y correction
        let front_only = [(FRONT, 3.8125), (RIGHT, far), (LEFT, far), (BACK, far)];
        let (_, report) = run(&mut corr, &input(Pose::new(61.0, 54.0, 92.0), &front_only));
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::NoWall));
        assert_eq!(report.y, AxisOutcome::Corrected { from_in: 54.0, to_in: 55.0, sensor: FRONT });

        let (out, report) = run(&mut corr, &input(pose, &front_only));
        assert_eq!(out, None);
        assert_eq!(report.y, AxisOutcome::Skipped(SkipReason::GateRejected { delta_in: 5.0 }));

        // Take both out of range: nothing
        let none = [(FRONT, far), (RIGHT, far), (LEFT, far), (BACK, far)];
        let (out, _) = run(&mut corr, &input(pose, &none));
        assert_eq!(out, None);

        // With the corner gate on, the drifted pose is rejected on both axes
        params.gate_corner = true;
        let mut gated = PoseCorr::from_params(params).unwrap();
        let (out, report) = run(&mut gated, &input(pose, &corner));
        assert_eq!(out, None);
        assert_eq!(report.x, AxisOutcome::Skipped(SkipReason::GateRejected { delta_in: -6.0 }));
        assert_eq!(report.y, AxisOutcome::Skipped(SkipReason::GateRejected { delta_in: 5.0 }));
    }

    #[test]
    fn test_invalid_params() {
        let mut params = params_in();
        params.gate_slack_in = -1.0;
        assert!(PoseCorr::from_params(params).is_err());
    }
}
