use super::stats;
use crate::telemetry::{Quat, Telemetry};
use glam::DVec3;

/// Leg-frame orientation error (`fr`), in degrees, one series per leg frame.
#[derive(Debug, Default, Clone)]
pub struct RotationSampler {
    deviations: Vec<Vec<f64>>,
}

/// Swept angle of `current⁻¹ · desired`, in degrees.
///
/// Both inputs must be unit quaternions. The product is formed in f64 so that
/// equal orientations give exactly zero.
pub fn orientation_error_deg(current: Quat, desired: Quat) -> f64 {
    let c = current.as_dquat();
    let d = desired.as_dquat();
    let cv = DVec3::new(c.x, c.y, c.z);
    let dv = DVec3::new(d.x, d.y, d.z);

    let w = c.w * d.w + cv.dot(dv);
    let v = c.w * dv - d.w * cv - cv.cross(dv);
    (2.0 * v.length().atan2(w.abs())).to_degrees()
}

impl RotationSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample<T: Telemetry + ?Sized>(&mut self, telemetry: &T) {
        let leg_frames = telemetry.leg_frame_count();
        if self.deviations.len() < leg_frames {
            self.deviations.resize_with(leg_frames, Vec::new);
        }

        let phase = telemetry.gait_phase();
        for i in 0..leg_frames {
            let lf = telemetry.leg_frame(i);
            let desired = telemetry.leg_frame_desired_orientation(lf, phase);
            let current = telemetry.leg_frame_current_orientation(lf);
            self.deviations[i].push(orientation_error_deg(current, desired));
        }
    }

    pub fn per_leg_frame(&self) -> &[Vec<f64>] {
        &self.deviations
    }

    /// Flat mean over every leg frame and every tick.
    pub fn evaluate(&self) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for series in &self.deviations {
            total += series.iter().sum::<f64>();
            count += series.len();
        }
        total / (count as f64).max(1.0)
    }

    pub fn flattened(&self) -> Vec<f64> {
        self.deviations.iter().flatten().copied().collect()
    }

    pub fn stats(&self) -> stats::SeriesStats {
        stats::summarize(&self.flattened())
    }
}
