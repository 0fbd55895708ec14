//! # Pose Correction Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use auton_lib::pose_corr::{CorrectionMode, InputData, Params, PoseCorr, SensorReading};
use chassis_if::{pose::Pose, sensor::SensorId};
use util::module::State;

fn pose_corr_benchmark(c: &mut Criterion) {
    // ---- Build the corrector from the shipped params ----

    let mut params: Params =
        util::params::parse(include_str!("../../params/pose_corr.toml")).unwrap();

    let single = PoseCorr::from_params(params.clone()).unwrap();

    params.mode = CorrectionMode::Corner;
    let corner = PoseCorr::from_params(params).unwrap();

    // Robot tucked into the +X/+Y corner facing +Y, front and right sensors
    // in range
    let input = InputData {
        pose: Pose::new(61.0, 54.0, 91.0),
        readings: vec![
            SensorReading { id: SensorId(5), raw: Some(96.8375), confidence: Some(63) },
            SensorReading { id: SensorId(19), raw: Some(9999.0), confidence: Some(0) },
            SensorReading { id: SensorId(18), raw: Some(9999.0), confidence: Some(0) },
            SensorReading { id: SensorId(4), raw: Some(82.55), confidence: Some(63) },
        ],
    };

    // ---- Benchmark ----

    let mut group = c.benchmark_group("pose_corr");

    for (name, corr) in vec![("single_axis", single), ("corner", corner)] {
        let mut corr = corr;
        group.bench_function(name, |b| {
            b.iter(|| corr.proc(black_box(&input)))
        });
    }

    group.finish();
}

criterion_group!(benches, pose_corr_benchmark);
criterion_main!(benches);
