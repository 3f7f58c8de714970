use super::stats;
use crate::telemetry::Telemetry;

/// Head acceleration magnitude (`fh`), one entry per tick.
#[derive(Debug, Default, Clone)]
pub struct HeadAccelSampler {
    accelerations: Vec<f64>,
}

impl HeadAccelSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, ticks: usize) {
        self.accelerations.reserve(ticks);
    }

    pub fn sample<T: Telemetry + ?Sized>(&mut self, telemetry: &T) {
        self.accelerations
            .push(telemetry.head_acceleration().length() as f64);
    }

    pub fn series(&self) -> &[f64] {
        &self.accelerations
    }

    pub fn evaluate(&self) -> f64 {
        stats::mean(&self.accelerations)
    }
}
