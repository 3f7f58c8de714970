use crate::config::FitnessWeights;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FitnessTerm {
    ReferenceMotion,
    Velocity,
    Rotation,
    HeadAccel,
    Distance,
}

impl FitnessTerm {
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::ReferenceMotion => "fd",
            Self::Velocity => "fv",
            Self::Rotation => "fr",
            Self::HeadAccel => "fh",
            Self::Distance => "fp",
        }
    }

    pub fn weight(&self, w: &FitnessWeights) -> f64 {
        match self {
            Self::ReferenceMotion => w.weight_reference_motion,
            Self::Velocity => w.weight_velocity,
            Self::Rotation => w.weight_rotation,
            Self::HeadAccel => w.weight_head_accel,
            Self::Distance => w.weight_distance,
        }
    }

    /// Every term adds to the fitness except distance, which is subtracted.
    pub fn sign(&self) -> f64 {
        match self {
            Self::Distance => -1.0,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessBreakdown {
    // Top-line
    pub fitness: f64,

    // Raw reductions
    pub fd: f64,
    pub fv: f64,
    pub fr: f64,
    pub fh: f64,
    pub fp: f64,

    // Weighted contributions (as they enter the sum; fp is positive here)
    pub weighted_fd: f64,
    pub weighted_fv: f64,
    pub weighted_fr: f64,
    pub weighted_fh: f64,
    pub weighted_fp: f64,

    // Diagnostics, not part of the fitness
    pub fv_std_dev: f64,
    pub fd_std_dev: f64,
    pub strides: usize,
    pub ticks: usize,
}

impl FitnessBreakdown {
    pub fn raw(&self, term: FitnessTerm) -> f64 {
        match term {
            FitnessTerm::ReferenceMotion => self.fd,
            FitnessTerm::Velocity => self.fv,
            FitnessTerm::Rotation => self.fr,
            FitnessTerm::HeadAccel => self.fh,
            FitnessTerm::Distance => self.fp,
        }
    }

    pub fn weighted(&self, term: FitnessTerm) -> f64 {
        match term {
            FitnessTerm::ReferenceMotion => self.weighted_fd,
            FitnessTerm::Velocity => self.weighted_fv,
            FitnessTerm::Rotation => self.weighted_fr,
            FitnessTerm::HeadAccel => self.weighted_fh,
            FitnessTerm::Distance => self.weighted_fp,
        }
    }
}
