#![allow(dead_code)]

use gaitscore::telemetry::{LegFrameId, Quat, Telemetry, Vec3, VelocityStat};
use gaitscore::trace::{LegFramePose, LegFrameSpec, TickSample, TrialTrace};

#[derive(Debug, Clone)]
pub struct MockFrame {
    pub position: Vec3,
    pub rest_height: f32,
    pub desired: Quat,
    pub current: Quat,
}

impl Default for MockFrame {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 0.0),
            rest_height: 1.0,
            desired: Quat::IDENTITY,
            current: Quat::IDENTITY,
        }
    }
}

/// Hand-set simulation snapshot.
#[derive(Debug, Clone, Default)]
pub struct MockSim {
    pub velocity: VelocityStat,
    pub phase: f32,
    pub head: Vec3,
    pub frames: Vec<MockFrame>,
}

impl Telemetry for MockSim {
    fn velocity_stat(&self) -> VelocityStat {
        self.velocity
    }

    fn leg_frame_count(&self) -> usize {
        self.frames.len()
    }

    fn leg_frame_position(&self, frame: LegFrameId) -> Vec3 {
        self.frames[frame.index()].position
    }

    fn leg_frame_rest_height(&self, frame: LegFrameId) -> f32 {
        self.frames[frame.index()].rest_height
    }

    fn leg_frame_desired_orientation(&self, frame: LegFrameId, _phase: f32) -> Quat {
        self.frames[frame.index()].desired
    }

    fn leg_frame_current_orientation(&self, frame: LegFrameId) -> Quat {
        self.frames[frame.index()].current
    }

    fn gait_phase(&self) -> f32 {
        self.phase
    }

    fn head_acceleration(&self) -> Vec3 {
        self.head
    }
}

/// A trace walking straight ahead at `speed`, restarting a stride every
/// `stride_len` ticks, with one leg frame held exactly at its rest height.
pub fn straight_walk(name: &str, ticks: usize, stride_len: usize, speed: f32) -> TrialTrace {
    let mut trace = TrialTrace {
        leg_frames: vec![LegFrameSpec {
            rest_height: 1.0,
            ..Default::default()
        }],
        ..Default::default()
    };
    trace.meta.name = name.to_string();
    trace.meta.dt = 0.1;

    for i in 0..ticks {
        trace.ticks.push(TickSample {
            phase: (i % stride_len) as f32 / stride_len as f32,
            stride_restarted: i > 0 && i % stride_len == 0,
            current_velocity: Vec3::new(0.0, 0.0, speed),
            desired_velocity: Vec3::new(0.0, 0.0, speed),
            goal_velocity: Vec3::new(0.0, 0.0, speed),
            head_acceleration: Vec3::ZERO,
            leg_frames: vec![LegFramePose {
                position: Vec3::new(0.0, 1.0, speed * i as f32 * 0.1),
                orientation: Quat::IDENTITY,
            }],
        });
    }
    trace
}
