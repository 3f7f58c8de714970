use super::stats::{self, SeriesStats};
use crate::telemetry::Vec3;
use tracing::debug;

/// Per-stride velocity error (`fv`).
///
/// Samples are buffered until the stride closes. The closing sample itself is
/// not buffered.
#[derive(Debug, Default, Clone)]
pub struct VelocitySampler {
    stride_buffer: Vec<(Vec3, Vec3)>,
    deviations: Vec<f64>,
}

impl VelocitySampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the deviation appended when this call closed a stride.
    pub fn sample(
        &mut self,
        actual: Vec3,
        desired: Vec3,
        stride_restarted: bool,
        force_flush: bool,
    ) -> Option<f64> {
        if !stride_restarted && !force_flush {
            self.stride_buffer.push((actual, desired));
            return None;
        }

        let deviation = self.close_stride();
        debug!(
            "fv: stride closed after {} samples, deviation {:.4}",
            self.stride_buffer.len(),
            deviation
        );
        self.deviations.push(deviation);
        self.stride_buffer.clear();
        Some(deviation)
    }

    fn close_stride(&self) -> f64 {
        let mut total_actual = Vec3::ZERO;
        let mut total_desired = Vec3::ZERO;
        for &(actual, desired) in &self.stride_buffer {
            total_actual += actual;
            // Straight-line target: the desired coronal and vertical parts are zeroed
            total_desired += Vec3::new(0.0, 0.0, desired.z);
        }
        let n = (self.stride_buffer.len() as f32).max(1.0);
        let mean_actual = total_actual / n;
        let mean_desired = total_desired / n;
        (mean_actual - mean_desired).length() as f64
    }

    pub fn buffered(&self) -> usize {
        self.stride_buffer.len()
    }

    pub fn deviations(&self) -> &[f64] {
        &self.deviations
    }

    pub fn evaluate(&self) -> f64 {
        stats::mean(&self.deviations)
    }

    pub fn stats(&self) -> SeriesStats {
        stats::summarize(&self.deviations)
    }
}
