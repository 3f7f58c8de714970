use crate::error::{GaitScoreError, GsResult};
use crate::telemetry::{LegFrameId, Quat, Telemetry, Vec3, VelocityStat};
use glam::EulerRot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Cyclic piecewise-linear function of the gait phase.
///
/// Knots are evenly spaced over [0, 1); the segment after the last knot
/// interpolates back to the first.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseCurve {
    pub knots: Vec<f32>,
}

impl PhaseCurve {
    pub fn new(knots: Vec<f32>) -> Self {
        Self { knots }
    }

    pub fn constant(value: f32) -> Self {
        Self { knots: vec![value] }
    }

    pub fn value_at(&self, phase: f32) -> f32 {
        let n = self.knots.len();
        match n {
            0 => 0.0,
            1 => self.knots[0],
            _ => {
                let phi = phase.rem_euclid(1.0) * n as f32;
                let i = (phi.floor() as usize).min(n - 1);
                let t = phi - i as f32;
                let a = self.knots[i];
                let b = self.knots[(i + 1) % n];
                a + (b - a) * t
            }
        }
    }
}

/// Yaw, pitch and roll trajectories of a leg frame, in degrees.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationTrajectory {
    pub yaw: PhaseCurve,
    pub pitch: PhaseCurve,
    pub roll: PhaseCurve,
}

impl OrientationTrajectory {
    /// Roll about z first, then pitch about x, then yaw about y.
    pub fn orientation_at(&self, phase: f32) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.value_at(phase).to_radians(),
            self.pitch.value_at(phase).to_radians(),
            self.roll.value_at(phase).to_radians(),
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegFrameSpec {
    pub rest_height: f32,
    #[serde(default)]
    pub orientation: OrientationTrajectory,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegFramePose {
    pub position: Vec3,
    #[serde(default)]
    pub orientation: Quat,
}

impl Default for LegFramePose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickSample {
    pub phase: f32,
    pub stride_restarted: bool,
    pub current_velocity: Vec3,
    pub desired_velocity: Vec3,
    pub goal_velocity: Vec3,
    pub head_acceleration: Vec3,
    pub leg_frames: Vec<LegFramePose>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceMeta {
    pub name: String,
    /// Tick length in seconds. Zero means "use the replay default".
    pub dt: f32,
}

impl Default for TraceMeta {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            dt: 0.0,
        }
    }
}

/// One recorded trial: the leg-frame setup and every tick's telemetry.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialTrace {
    #[serde(default)]
    pub meta: TraceMeta,
    pub leg_frames: Vec<LegFrameSpec>,
    pub ticks: Vec<TickSample>,
}

impl TrialTrace {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GsResult<Self> {
        let path = path.as_ref();
        debug!("Loading trial trace from {}", path.display());
        let file = fs::File::open(path)?;
        let mut trace = Self::from_reader(file)?;
        if trace.meta.name == TraceMeta::default().name {
            if let Some(stem) = path.file_stem() {
                trace.meta.name = stem.to_string_lossy().into_owned();
            }
        }
        Ok(trace)
    }

    pub fn from_reader<R: Read>(reader: R) -> GsResult<Self> {
        let trace: Self = serde_json::from_reader(reader)?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> GsResult<()> {
        let mut file = fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.flush()?;
        Ok(())
    }

    pub fn validate(&self) -> GsResult<()> {
        if self.meta.dt.is_nan() || self.meta.dt < 0.0 {
            return Err(GaitScoreError::Validation(format!(
                "dt must be non-negative, got {}",
                self.meta.dt
            )));
        }
        let expected = self.leg_frames.len();
        for (i, tick) in self.ticks.iter().enumerate() {
            if tick.leg_frames.len() != expected {
                return Err(GaitScoreError::Validation(format!(
                    "tick {} has {} leg frames, header declares {}",
                    i,
                    tick.leg_frames.len(),
                    expected
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn views(&self) -> impl Iterator<Item = TickView<'_>> + '_ {
        (0..self.ticks.len()).map(move |index| TickView { trace: self, index })
    }
}

/// Simulation queries answered from one recorded tick.
#[derive(Debug, Clone, Copy)]
pub struct TickView<'a> {
    trace: &'a TrialTrace,
    index: usize,
}

impl<'a> TickView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn sample(&self) -> &'a TickSample {
        &self.trace.ticks[self.index]
    }

    fn pose(&self, frame: LegFrameId) -> LegFramePose {
        self.sample()
            .leg_frames
            .get(frame.index())
            .copied()
            .unwrap_or_default()
    }
}

impl Telemetry for TickView<'_> {
    fn velocity_stat(&self) -> VelocityStat {
        let t = self.sample();
        VelocityStat {
            current: t.current_velocity,
            desired: t.desired_velocity,
            goal: t.goal_velocity,
        }
    }

    fn leg_frame_count(&self) -> usize {
        self.trace.leg_frames.len()
    }

    fn leg_frame_position(&self, frame: LegFrameId) -> Vec3 {
        self.pose(frame).position
    }

    fn leg_frame_rest_height(&self, frame: LegFrameId) -> f32 {
        self.trace
            .leg_frames
            .get(frame.index())
            .map_or(0.0, |lf| lf.rest_height)
    }

    fn leg_frame_desired_orientation(&self, frame: LegFrameId, phase: f32) -> Quat {
        self.trace
            .leg_frames
            .get(frame.index())
            .map_or(Quat::IDENTITY, |lf| lf.orientation.orientation_at(phase))
    }

    fn leg_frame_current_orientation(&self, frame: LegFrameId) -> Quat {
        self.pose(frame).orientation
    }

    fn gait_phase(&self) -> f32 {
        self.sample().phase
    }

    fn head_acceleration(&self) -> Vec3 {
        self.sample().head_acceleration
    }
}
