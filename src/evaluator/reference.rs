use super::stats::{self, SeriesStats};
use crate::telemetry::Telemetry;
use std::fmt::Debug;
use std::sync::Arc;

/// Weight of the head-height term in the per-tick value.
pub const HEAD_HEIGHT_FACTOR: f64 = 2.0;
/// Weight of the distance-deficit term in the per-tick value.
pub const DISTANCE_FACTOR: f64 = 0.1;

/// Reference-motion terms that are not part of the active score.
///
/// Foot, hip and knee deviation against a reference ("ghost") motion, and the
/// forward-progress deficit against that ghost. The sampler never folds these
/// into [`ReferenceMotionSampler::sample`]; they can be queried through
/// [`ReferenceMotionSampler::extensions`].
pub trait ReferenceTerms: Debug + Send + Sync {
    fn foot_deviation(&self, _telemetry: &dyn Telemetry) -> f64 {
        0.0
    }
    fn hip_deviation(&self, _telemetry: &dyn Telemetry) -> f64 {
        0.0
    }
    fn knee_deviation(&self, _telemetry: &dyn Telemetry) -> f64 {
        0.0
    }
    fn progress_deficit(&self, _telemetry: &dyn Telemetry) -> f64 {
        0.0
    }
}

/// No reference motion is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct InertReferenceTerms;

impl ReferenceTerms for InertReferenceTerms {}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ReferenceExtensions {
    pub foot: f64,
    pub hip: f64,
    pub knee: f64,
    pub progress_deficit: f64,
}

/// Squared body-height deviation against the leg frames' rest heights (`fd`).
#[derive(Debug, Clone)]
pub struct ReferenceMotionSampler {
    height_sqr_diffs: Vec<f64>,
    terms: Arc<dyn ReferenceTerms>,
}

impl Default for ReferenceMotionSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Active per-tick value: `len_bod + 2·len_hd + 0.1·len_dist`.
///
/// `len_hd` accumulates the same per-frame term as `len_bod`, and `len_dist`
/// is always zero.
pub fn reference_motion_value<T: Telemetry + ?Sized>(telemetry: &T) -> f64 {
    let mut len_bod = 0.0;
    let mut len_hd = 0.0;
    let len_dist = 0.0;

    for i in 0..telemetry.leg_frame_count() {
        let lf = telemetry.leg_frame(i);
        let pos = telemetry.leg_frame_position(lf);
        // ground is at y = 0
        let d = pos.y as f64 - telemetry.leg_frame_rest_height(lf) as f64;
        let t_len_bod = d * d;
        len_bod += t_len_bod;
        len_hd += t_len_bod;
    }

    len_bod + HEAD_HEIGHT_FACTOR * len_hd + DISTANCE_FACTOR * len_dist
}

impl ReferenceMotionSampler {
    pub fn new() -> Self {
        Self::with_terms(Arc::new(InertReferenceTerms))
    }

    pub fn with_terms(terms: Arc<dyn ReferenceTerms>) -> Self {
        Self {
            height_sqr_diffs: Vec::new(),
            terms,
        }
    }

    pub fn reserve(&mut self, ticks: usize) {
        self.height_sqr_diffs.reserve(ticks);
    }

    pub fn sample<T: Telemetry + ?Sized>(&mut self, telemetry: &T) {
        self.height_sqr_diffs
            .push(reference_motion_value(telemetry));
    }

    /// Evaluates the inactive hooks for the given tick. Has no effect on the
    /// recorded series.
    pub fn extensions(&self, telemetry: &dyn Telemetry) -> ReferenceExtensions {
        ReferenceExtensions {
            foot: self.terms.foot_deviation(telemetry),
            hip: self.terms.hip_deviation(telemetry),
            knee: self.terms.knee_deviation(telemetry),
            progress_deficit: self.terms.progress_deficit(telemetry),
        }
    }

    pub fn series(&self) -> &[f64] {
        &self.height_sqr_diffs
    }

    pub fn evaluate(&self) -> f64 {
        stats::mean(&self.height_sqr_diffs)
    }

    pub fn stats(&self) -> SeriesStats {
        stats::summarize(&self.height_sqr_diffs)
    }
}
