mod common;

use common::{MockFrame, MockSim};
use gaitscore::config::FitnessWeights;
use gaitscore::evaluator::reference::{ReferenceTerms, HEAD_HEIGHT_FACTOR};
use gaitscore::evaluator::{FitnessEvaluator, FitnessTerm};
use gaitscore::telemetry::{Quat, StrideLatch, StrideSignal, Telemetry, Vec3, VelocityStat};
use rstest::rstest;
use std::sync::Arc;
use strum::IntoEnumIterator;

const EPS: f64 = 1e-5;

#[test]
fn test_empty_trial_is_exactly_zero() {
    let ev = FitnessEvaluator::default();
    assert_eq!(ev.evaluate(false), 0.0);
    assert_eq!(ev.evaluate_fd(), 0.0);
    assert_eq!(ev.evaluate_fv(), 0.0);
    assert_eq!(ev.evaluate_fr(), 0.0);
    assert_eq!(ev.evaluate_fh(), 0.0);
    assert_eq!(ev.evaluate_fp(), 0.0);
}

// --- VELOCITY (fv) ---

#[rstest]
#[case(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0), 4)]
#[case(Vec3::new(0.3, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0), 10)]
#[case(Vec3::new(0.3, 0.1, 0.8), Vec3::new(0.5, 0.2, 1.0), 7)] // desired lateral is ignored
#[case(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0), 1)]
fn test_stride_deviation_of_constant_samples(
    #[case] actual: Vec3,
    #[case] desired: Vec3,
    #[case] n: usize,
) {
    let mut ev = FitnessEvaluator::default();
    for _ in 0..n {
        assert_eq!(ev.sample_velocity(actual, desired, false, false), None);
    }
    assert_eq!(ev.velocity().buffered(), n);

    let dev = ev
        .sample_velocity(Vec3::ZERO, Vec3::ZERO, true, false)
        .expect("stride restart must close the stride");
    let expected = (actual - Vec3::new(0.0, 0.0, desired.z)).length() as f64;

    assert!(
        (dev - expected).abs() < EPS,
        "deviation {} expected {}",
        dev,
        expected
    );
    assert_eq!(ev.velocity().buffered(), 0);
    assert_eq!(ev.velocity().deviations().len(), 1);
}

#[test]
fn test_force_flush_on_empty_buffer_records_zero() {
    let mut ev = FitnessEvaluator::default();
    let dev = ev.sample_velocity(Vec3::new(5.0, 5.0, 5.0), Vec3::Z, false, true);
    assert_eq!(dev, Some(0.0));
    assert_eq!(ev.velocity().deviations(), &[0.0]);
}

#[test]
fn test_fv_is_mean_over_strides() {
    let mut ev = FitnessEvaluator::default();
    // stride 1: deviation 1
    ev.sample_velocity(Vec3::new(0.0, 0.0, 2.0), Vec3::Z, false, false);
    ev.sample_velocity(Vec3::ZERO, Vec3::ZERO, true, false);
    // stride 2: deviation 3
    ev.sample_velocity(Vec3::new(0.0, 0.0, 4.0), Vec3::Z, false, false);
    ev.sample_velocity(Vec3::ZERO, Vec3::ZERO, true, false);

    assert!((ev.evaluate_fv() - 2.0).abs() < EPS);
    let stats = ev.velocity().stats();
    assert!((stats.std_dev - 1.0).abs() < EPS);
}

#[test]
fn test_std_dev_does_not_feed_fitness() {
    let mut steady = FitnessEvaluator::default();
    let mut jittery = FitnessEvaluator::default();

    for dz in [2.0, 2.0] {
        steady.sample_velocity(Vec3::new(0.0, 0.0, dz), Vec3::Z, false, false);
        steady.sample_velocity(Vec3::ZERO, Vec3::ZERO, true, false);
    }
    for dz in [1.0, 3.0] {
        jittery.sample_velocity(Vec3::new(0.0, 0.0, dz), Vec3::Z, false, false);
        jittery.sample_velocity(Vec3::ZERO, Vec3::ZERO, true, false);
    }
    // deviations 1,1 vs 0,2: same mean, different spread
    assert!((steady.evaluate(false) - jittery.evaluate(false)).abs() < EPS);
    assert!(jittery.breakdown().fv_std_dev > steady.breakdown().fv_std_dev);
}

#[test]
fn test_record_tick_consumes_restart_once() {
    let mut ev = FitnessEvaluator::default();
    let sim = MockSim {
        velocity: VelocityStat {
            current: Vec3::new(0.0, 0.0, 1.0),
            desired: Vec3::new(0.0, 0.0, 1.0),
            goal: Vec3::new(0.0, 0.0, 1.0),
        },
        frames: vec![MockFrame::default()],
        ..Default::default()
    };
    let mut latch = StrideLatch::new();

    ev.record_tick(&sim, &mut latch);
    ev.record_tick(&sim, &mut latch);
    latch.raise();
    ev.record_tick(&sim, &mut latch);
    assert!(!latch.take_stride_restart());
    ev.record_tick(&sim, &mut latch);

    assert_eq!(ev.velocity().deviations().len(), 1);
    assert_eq!(ev.velocity().buffered(), 1);
    assert_eq!(ev.ticks(), 4);

    ev.finish_trial();
    assert_eq!(ev.velocity().deviations().len(), 2);
    assert_eq!(ev.velocity().buffered(), 0);
}

#[test]
fn test_finish_trial_skips_empty_buffer() {
    let mut ev = FitnessEvaluator::default();
    assert_eq!(ev.finish_trial(), None);
    assert!(ev.velocity().deviations().is_empty());

    // Ends exactly on a restart: the closing sample is not buffered.
    ev.sample_velocity(Vec3::new(0.0, 0.0, 3.0), Vec3::Z, false, false);
    ev.sample_velocity(Vec3::ZERO, Vec3::ZERO, true, false);
    assert_eq!(ev.finish_trial(), None);
    assert_eq!(ev.velocity().deviations(), &[2.0]);
    assert!((ev.evaluate_fv() - 2.0).abs() < EPS);
}

// --- HEAD (fh) ---

#[test]
fn test_head_acceleration_mean_of_norms() {
    let mut ev = FitnessEvaluator::default();
    let mut sim = MockSim::default();
    sim.head = Vec3::new(3.0, 4.0, 0.0);
    ev.sample_head_acceleration(&sim);
    sim.head = Vec3::new(0.0, 0.0, 1.0);
    ev.sample_head_acceleration(&sim);
    assert!((ev.evaluate_fh() - 3.0).abs() < EPS);
}

// --- REFERENCE MOTION (fd) ---

#[rstest]
#[case(&[(1.0, 1.0)], 0.0)]
#[case(&[(1.5, 1.0)], 0.75)] // 0.25 + 2 * 0.25
#[case(&[(0.5, 1.0), (2.0, 1.0)], 3.75)] // (0.25 + 1.0) * 3
fn test_reference_motion_tick_value(#[case] frames: &[(f32, f32)], #[case] expected: f64) {
    let sim = MockSim {
        frames: frames
            .iter()
            .map(|&(y, rest)| MockFrame {
                position: Vec3::new(7.0, y, -3.0),
                rest_height: rest,
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };
    let mut ev = FitnessEvaluator::default();
    ev.sample_reference_motion(&sim);
    assert_eq!(ev.reference_motion().series().len(), 1);
    assert!((ev.evaluate_fd() - expected).abs() < EPS);
    assert_eq!(HEAD_HEIGHT_FACTOR, 2.0);
}

#[derive(Debug)]
struct LoudReference;

impl ReferenceTerms for LoudReference {
    fn foot_deviation(&self, _t: &dyn Telemetry) -> f64 {
        1000.0
    }
    fn progress_deficit(&self, _t: &dyn Telemetry) -> f64 {
        50.0
    }
}

#[test]
fn test_reference_extensions_stay_inactive() {
    let sim = MockSim {
        frames: vec![MockFrame {
            position: Vec3::new(0.0, 2.0, 0.0),
            rest_height: 1.0,
            ..Default::default()
        }],
        ..Default::default()
    };

    let mut plain = FitnessEvaluator::default();
    let mut hooked = FitnessEvaluator::default().with_reference_terms(Arc::new(LoudReference));
    plain.sample_reference_motion(&sim);
    hooked.sample_reference_motion(&sim);

    assert_eq!(plain.evaluate_fd(), hooked.evaluate_fd());
    let ext = hooked.reference_motion().extensions(&sim);
    assert_eq!(ext.foot, 1000.0);
    assert_eq!(ext.progress_deficit, 50.0);
    assert_eq!(plain.reference_motion().extensions(&sim).foot, 0.0);
}

// --- ROTATION (fr) ---

#[test]
fn test_matching_orientations_score_zero() {
    let q = Quat::from_euler(glam::EulerRot::YXZ, 0.4, -0.2, 0.1);
    let sim = MockSim {
        frames: vec![
            MockFrame {
                desired: q,
                current: q,
                ..Default::default()
            },
            MockFrame::default(),
        ],
        ..Default::default()
    };
    let mut ev = FitnessEvaluator::default();
    for _ in 0..20 {
        ev.sample_rotation(&sim);
    }
    assert_eq!(ev.evaluate_fr(), 0.0);
}

// --- REDUCTION ---

#[test]
fn test_weighted_sum_example() {
    // fd=1, fv=2, fr=3, fh=4 built from real samples
    let mut ev = FitnessEvaluator::new(FitnessWeights::default());

    // fd: one frame 1/sqrt(3) above rest -> 3 * 1/3 = 1
    let sim = MockSim {
        frames: vec![MockFrame {
            position: Vec3::new(0.0, 1.0 + (1.0f32 / 3.0).sqrt(), 0.0),
            rest_height: 1.0,
            desired: Quat::from_rotation_y(3.0f32.to_radians()),
            current: Quat::IDENTITY,
        }],
        head: Vec3::new(0.0, 4.0, 0.0),
        ..Default::default()
    };
    ev.sample_reference_motion(&sim);
    ev.sample_rotation(&sim);
    ev.sample_head_acceleration(&sim);
    ev.sample_velocity(Vec3::new(0.0, 0.0, 3.0), Vec3::Z, false, false);
    ev.sample_velocity(Vec3::ZERO, Vec3::ZERO, false, true);
    ev.sample_movement_distance(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);

    let d = ev.breakdown();
    assert!((d.fd - 1.0).abs() < 1e-4, "fd {}", d.fd);
    assert!((d.fv - 2.0).abs() < 1e-5, "fv {}", d.fv);
    assert!((d.fr - 3.0).abs() < 1e-3, "fr {}", d.fr);
    assert!((d.fh - 4.0).abs() < 1e-5, "fh {}", d.fh);
    assert!((d.fitness - 112.03).abs() < 1e-2, "fitness {}", d.fitness);
}

#[test]
fn test_distance_is_subtracted() {
    let weights = FitnessWeights {
        weight_distance: 2.0,
        ..Default::default()
    };
    let mut ev = FitnessEvaluator::new(weights);
    ev.sample_movement_distance(Vec3::new(0.0, 0.0, 1.5), Vec3::Z);
    ev.sample_movement_distance(Vec3::new(0.0, 0.0, 1.5), Vec3::Z);
    assert!((ev.evaluate(false) + 6.0).abs() < EPS);
    assert!((ev.breakdown().weighted_fp - 6.0).abs() < EPS);
}

#[test]
fn test_evaluate_is_idempotent() {
    let mut ev = FitnessEvaluator::default();
    let sim = MockSim {
        head: Vec3::new(1.0, 2.0, 3.0),
        frames: vec![MockFrame {
            position: Vec3::new(0.0, 0.7, 0.0),
            current: Quat::from_rotation_x(0.3),
            ..Default::default()
        }],
        ..Default::default()
    };
    let mut latch = StrideLatch::new();
    for i in 0..30 {
        if i % 7 == 0 {
            latch.raise();
        }
        ev.record_tick(&sim, &mut latch);
    }

    let first = ev.evaluate(true);
    let second = ev.evaluate(false);
    assert_eq!(first.to_bits(), second.to_bits());
    assert_eq!(ev.breakdown(), ev.breakdown());
}

#[test]
fn test_fitness_terms_label_report_rows() {
    let labels: Vec<String> = FitnessTerm::iter()
        .map(|t| format!("{} ({})", t, t.short_name()))
        .collect();
    assert_eq!(
        labels,
        vec![
            "reference_motion (fd)",
            "velocity (fv)",
            "rotation (fr)",
            "head_accel (fh)",
            "distance (fp)",
        ]
    );
    let w = FitnessWeights::default();
    assert_eq!(FitnessTerm::Distance.sign(), -1.0);
    assert_eq!(FitnessTerm::ReferenceMotion.weight(&w), 100.0);
}
