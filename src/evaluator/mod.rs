pub mod distance;
pub mod head;
pub mod reference;
pub mod rotation;
pub mod stats;
pub mod types;
pub mod velocity;

use self::distance::DistanceSampler;
use self::head::HeadAccelSampler;
use self::reference::{ReferenceMotionSampler, ReferenceTerms};
use self::rotation::RotationSampler;
use self::velocity::VelocitySampler;
pub use self::types::{FitnessBreakdown, FitnessTerm};
use crate::config::FitnessWeights;
use crate::telemetry::{StrideSignal, Telemetry, Vec3};
use std::sync::Arc;
use tracing::info;

/// Scores one trial of one character.
///
/// The five samplers are independent accumulators; [`FitnessEvaluator::evaluate`]
/// reduces them into the scalar handed to the controller search. Lower is
/// better for every term except distance, which is subtracted.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    weights: FitnessWeights,
    fv: VelocitySampler,
    fr: RotationSampler,
    fh: HeadAccelSampler,
    fd: ReferenceMotionSampler,
    fp: DistanceSampler,
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self::new(FitnessWeights::default())
    }
}

impl FitnessEvaluator {
    pub fn new(weights: FitnessWeights) -> Self {
        Self {
            weights,
            fv: VelocitySampler::new(),
            fr: RotationSampler::new(),
            fh: HeadAccelSampler::new(),
            fd: ReferenceMotionSampler::new(),
            fp: DistanceSampler::new(),
        }
    }

    /// Pre-sizes the per-tick series for a known tick budget.
    pub fn with_capacity(weights: FitnessWeights, ticks: usize) -> Self {
        let mut ev = Self::new(weights);
        ev.fh.reserve(ticks);
        ev.fd.reserve(ticks);
        ev.fp.reserve(ticks);
        ev
    }

    pub fn with_reference_terms(mut self, terms: Arc<dyn ReferenceTerms>) -> Self {
        self.fd = ReferenceMotionSampler::with_terms(terms);
        self
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: FitnessWeights) {
        self.weights = weights;
    }

    // --- Samplers ---

    /// `fv`: buffers the pair, or closes the stride when either flag is set.
    pub fn sample_velocity(
        &mut self,
        actual: Vec3,
        desired: Vec3,
        stride_restarted: bool,
        force_flush: bool,
    ) -> Option<f64> {
        self.fv
            .sample(actual, desired, stride_restarted, force_flush)
    }

    /// `fv` fed from the simulation. Consumes the stride-restart edge.
    pub fn sample_velocity_from<T, S>(
        &mut self,
        telemetry: &T,
        stride: &mut S,
        force_flush: bool,
    ) -> Option<f64>
    where
        T: Telemetry + ?Sized,
        S: StrideSignal + ?Sized,
    {
        let restarted = stride.take_stride_restart();
        let vel = telemetry.velocity_stat();
        self.sample_velocity(vel.current, vel.desired, restarted, force_flush)
    }

    pub fn sample_rotation<T: Telemetry + ?Sized>(&mut self, telemetry: &T) {
        self.fr.sample(telemetry);
    }

    pub fn sample_head_acceleration<T: Telemetry + ?Sized>(&mut self, telemetry: &T) {
        self.fh.sample(telemetry);
    }

    pub fn sample_reference_motion<T: Telemetry + ?Sized>(&mut self, telemetry: &T) {
        self.fd.sample(telemetry);
    }

    pub fn sample_movement_distance(&mut self, actual: Vec3, goal: Vec3) {
        self.fp.sample(actual, goal);
    }

    pub fn sample_movement_distance_from<T: Telemetry + ?Sized>(&mut self, telemetry: &T) {
        let vel = telemetry.velocity_stat();
        self.sample_movement_distance(vel.current, vel.goal);
    }

    /// Runs all five samplers for one tick.
    pub fn record_tick<T, S>(&mut self, telemetry: &T, stride: &mut S)
    where
        T: Telemetry + ?Sized,
        S: StrideSignal + ?Sized,
    {
        self.sample_velocity_from(telemetry, stride, false);
        self.sample_rotation(telemetry);
        self.sample_head_acceleration(telemetry);
        self.sample_reference_motion(telemetry);
        self.sample_movement_distance_from(telemetry);
    }

    /// Closes whatever partial stride is still buffered.
    ///
    /// Returns `None` when the buffer is empty (the trial ended on a stride
    /// restart, or recorded nothing); no stride is appended in that case.
    pub fn finish_trial(&mut self) -> Option<f64> {
        if self.fv.buffered() == 0 {
            return None;
        }
        self.fv.sample(Vec3::ZERO, Vec3::ZERO, false, true)
    }

    // --- Sampler state ---

    pub fn velocity(&self) -> &VelocitySampler {
        &self.fv
    }

    pub fn rotation(&self) -> &RotationSampler {
        &self.fr
    }

    pub fn head_acceleration(&self) -> &HeadAccelSampler {
        &self.fh
    }

    pub fn reference_motion(&self) -> &ReferenceMotionSampler {
        &self.fd
    }

    pub fn movement_distance(&self) -> &DistanceSampler {
        &self.fp
    }

    pub fn ticks(&self) -> usize {
        self.fd
            .series()
            .len()
            .max(self.fh.series().len())
            .max(self.fp.velocities().len())
    }

    // --- Reductions ---

    pub fn evaluate_fd(&self) -> f64 {
        self.fd.evaluate()
    }

    pub fn evaluate_fv(&self) -> f64 {
        self.fv.evaluate()
    }

    pub fn evaluate_fr(&self) -> f64 {
        self.fr.evaluate()
    }

    pub fn evaluate_fh(&self) -> f64 {
        self.fh.evaluate()
    }

    pub fn evaluate_fp(&self) -> f64 {
        self.fp.evaluate()
    }

    /// The scalar objective. With `debug_print` the weighted terms are logged.
    pub fn evaluate(&self, debug_print: bool) -> f64 {
        let d = self.breakdown();
        if debug_print {
            info!(
                "{} = fd {} + fv {} + fr {} + fh {} - fp {}",
                d.fitness, d.weighted_fd, d.weighted_fv, d.weighted_fr, d.weighted_fh, d.weighted_fp
            );
        }
        d.fitness
    }

    pub fn breakdown(&self) -> FitnessBreakdown {
        let fd = self.evaluate_fd();
        let fv = self.evaluate_fv();
        let fr = self.evaluate_fr();
        let fh = self.evaluate_fh();
        let fp = self.evaluate_fp();
        let w = &self.weights;

        FitnessBreakdown {
            fitness: weighted_fitness(w, fd, fv, fr, fh, fp),
            fd,
            fv,
            fr,
            fh,
            fp,
            weighted_fd: w.weight_reference_motion * fd,
            weighted_fv: w.weight_velocity * fv,
            weighted_fr: w.weight_rotation * fr,
            weighted_fh: w.weight_head_accel * fh,
            weighted_fp: w.weight_distance * fp,
            fv_std_dev: self.fv.stats().std_dev,
            fd_std_dev: self.fd.stats().std_dev,
            strides: self.fv.deviations().len(),
            ticks: self.ticks(),
        }
    }
}

/// `w_ref·fd + w_vel·fv + w_rot·fr + w_head·fh − w_dist·fp`
pub fn weighted_fitness(w: &FitnessWeights, fd: f64, fv: f64, fr: f64, fh: f64, fp: f64) -> f64 {
    w.weight_reference_motion * fd
        + w.weight_velocity * fv
        + w.weight_rotation * fr
        + w.weight_head_accel * fh
        - w.weight_distance * fp
}
