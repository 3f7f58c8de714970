//! Seeded synthetic walking rollouts.
//!
//! Not a physics simulation: the character's telemetry is scripted from the
//! gait phase plus uniform noise. Useful for demos, benchmarks and property
//! tests of the evaluator.

use crate::config::SynthParams;
use crate::error::{GaitScoreError, GsResult};
use crate::telemetry::{Quat, StrideSignal, Vec3};
use crate::trace::{
    LegFramePose, LegFrameSpec, OrientationTrajectory, PhaseCurve, TickSample, TraceMeta,
    TrialTrace,
};
use glam::EulerRot;
use std::f32::consts::TAU;

/// Largest change of desired speed per second.
pub const DESIRED_SPEED_STEP: f32 = 0.5;

/// Cyclic gait phase that raises a restart flag each time it wraps.
#[derive(Debug, Clone)]
pub struct StridePlayer {
    phase: f32,
    period: f32,
    restarted: bool,
}

impl StridePlayer {
    pub fn new(period: f32) -> Self {
        Self {
            phase: 0.0,
            period,
            restarted: false,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn advance(&mut self, dt: f32) {
        self.phase += dt / self.period;
        if self.phase >= 1.0 {
            self.phase = self.phase.fract();
            self.restarted = true;
        }
    }
}

impl StrideSignal for StridePlayer {
    fn take_stride_restart(&mut self) -> bool {
        std::mem::take(&mut self.restarted)
    }
}

/// Moves `current` toward `goal` by at most `DESIRED_SPEED_STEP * dt`,
/// snapping to the goal once it is within one step.
pub fn desired_velocity_step(current: Vec3, goal: Vec3, dt: f32) -> Vec3 {
    let goal_sq = goal.length_squared();
    let current_sq = current.length_squared();
    let step = DESIRED_SPEED_STEP * dt;

    let mut dir = current.normalize_or_zero();
    if dir == Vec3::ZERO {
        dir = goal.normalize_or_zero();
    }

    if goal_sq > current_sq {
        if goal_sq < current_sq + step {
            goal
        } else {
            current + dir * step
        }
    } else if goal_sq > current_sq - step {
        goal
    } else {
        current - dir * step
    }
}

struct Noise {
    rng: fastrand::Rng,
    amplitude: f32,
}

impl Noise {
    fn next(&mut self) -> f32 {
        (self.rng.f32() * 2.0 - 1.0) * self.amplitude
    }

    fn vec3(&mut self) -> Vec3 {
        Vec3::new(self.next(), self.next(), self.next())
    }
}

fn leg_frame_specs(count: usize) -> Vec<LegFrameSpec> {
    (0..count)
        .map(|i| LegFrameSpec {
            rest_height: 1.0 + 0.1 * i as f32,
            orientation: OrientationTrajectory {
                yaw: PhaseCurve::constant(0.0),
                pitch: PhaseCurve::new(vec![0.0, 5.0, 0.0, -5.0]),
                roll: PhaseCurve::new(vec![2.0, -2.0]),
            },
        })
        .collect()
}

pub fn synthesize(params: &SynthParams, dt: f32) -> GsResult<TrialTrace> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(GaitScoreError::Config(format!(
            "tick length must be positive, got {}",
            dt
        )));
    }
    if !(params.synth_stride_period > 0.0 && params.synth_stride_period.is_finite()) {
        return Err(GaitScoreError::Config(format!(
            "stride period must be positive, got {}",
            params.synth_stride_period
        )));
    }

    let rng = match params.synth_seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut noise = Noise {
        rng,
        amplitude: params.synth_noise,
    };

    let leg_frames = leg_frame_specs(params.synth_leg_frames);
    let goal = Vec3::new(0.0, 0.0, params.synth_goal_speed);
    let mut player = StridePlayer::new(params.synth_stride_period);
    let mut desired = Vec3::ZERO;
    let mut root = Vec3::ZERO;
    let mut ticks = Vec::with_capacity(params.synth_ticks);

    for _ in 0..params.synth_ticks {
        player.advance(dt);
        let phase = player.phase();
        let stride_restarted = player.take_stride_restart();

        desired = desired_velocity_step(desired, goal, dt);
        let bob = (TAU * phase).sin();
        let current = desired
            + Vec3::new(noise.next(), 0.0, 0.1 * bob * desired.z + noise.next());
        root += current * dt;

        let head_acceleration =
            Vec3::new(0.0, 2.0 * (2.0 * TAU * phase).cos(), 0.0) + noise.vec3() * 9.81;

        let poses = leg_frames
            .iter()
            .map(|spec| {
                let wobble = Quat::from_euler(
                    EulerRot::YXZ,
                    noise.next().to_radians() * 10.0,
                    noise.next().to_radians() * 10.0,
                    noise.next().to_radians() * 10.0,
                );
                LegFramePose {
                    position: Vec3::new(
                        root.x,
                        spec.rest_height + 0.05 * (2.0 * TAU * phase).sin() + noise.next(),
                        root.z,
                    ),
                    orientation: wobble * spec.orientation.orientation_at(phase),
                }
            })
            .collect();

        ticks.push(TickSample {
            phase,
            stride_restarted,
            current_velocity: current,
            desired_velocity: desired,
            goal_velocity: goal,
            head_acceleration,
            leg_frames: poses,
        });
    }

    Ok(TrialTrace {
        meta: TraceMeta {
            name: match params.synth_seed {
                Some(seed) => format!("synth-{}", seed),
                None => "synth".to_string(),
            },
            dt,
        },
        leg_frames,
        ticks,
    })
}
