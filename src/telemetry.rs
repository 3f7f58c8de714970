//! Read-only views onto the running simulation.
//!
//! The evaluator never advances or mutates the simulation. Everything it needs
//! for one tick is pulled through [`Telemetry`]; the one piece of state it is
//! allowed to consume is the stride-restart edge exposed by [`StrideSignal`].

pub use glam::{Quat, Vec3};

/// Per-character velocities for the current tick.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct VelocityStat {
    pub current: Vec3,
    pub desired: Vec3,
    pub goal: Vec3,
}

/// Dense handle of a leg frame, `0..leg_frame_count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegFrameId(pub usize);

impl LegFrameId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

pub trait Telemetry {
    fn velocity_stat(&self) -> VelocityStat;

    fn leg_frame_count(&self) -> usize;

    fn leg_frame(&self, index: usize) -> LegFrameId {
        LegFrameId(index)
    }

    /// World position of the leg frame. Ground level is y = 0.
    fn leg_frame_position(&self, frame: LegFrameId) -> Vec3;

    fn leg_frame_rest_height(&self, frame: LegFrameId) -> f32;

    /// Orientation the controller wants for `frame` at gait phase `phase`.
    fn leg_frame_desired_orientation(&self, frame: LegFrameId, phase: f32) -> Quat;

    fn leg_frame_current_orientation(&self, frame: LegFrameId) -> Quat;

    /// Normalised cyclic gait phase in [0, 1).
    fn gait_phase(&self) -> f32;

    fn head_acceleration(&self) -> Vec3;
}

/// Edge-triggered stride boundary.
///
/// Reading the signal consumes it: a restart is observed exactly once.
pub trait StrideSignal {
    fn take_stride_restart(&mut self) -> bool;
}

impl<S: StrideSignal + ?Sized> StrideSignal for &mut S {
    fn take_stride_restart(&mut self) -> bool {
        (**self).take_stride_restart()
    }
}

/// Holds a raised stride restart until it is read.
///
/// Hosts that learn about stride boundaries from somewhere other than a live
/// gait player (e.g. a recorded trace) raise the latch and hand it to the
/// evaluator as its [`StrideSignal`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StrideLatch {
    pending: bool,
}

impl StrideLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self) {
        self.pending = true;
    }

    pub fn is_raised(&self) -> bool {
        self.pending
    }
}

impl StrideSignal for StrideLatch {
    fn take_stride_restart(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
