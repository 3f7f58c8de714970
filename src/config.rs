use crate::error::{GaitScoreError, GsResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub weights: FitnessWeights,
    #[command(flatten)]
    pub replay: ReplayParams,
    #[command(flatten)]
    pub synth: SynthParams,
}

/// Weights of the five fitness terms. Fixed for the duration of a trial.
#[derive(Args, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    // Deviation from reference motion (body height). Dominant term.
    #[arg(long, default_value_t = 100.0)]
    pub weight_reference_motion: f64,

    // Deviation from desired forward speed, per stride
    #[arg(long, default_value_t = 5.0)]
    pub weight_velocity: f64,

    // Head acceleration
    #[arg(long, default_value_t = 0.5)]
    pub weight_head_accel: f64,

    // Leg-frame orientation error (degrees)
    #[arg(long, default_value_t = 0.01)]
    pub weight_rotation: f64,

    // Movement distance. Subtracted. Disabled by default.
    #[arg(long, default_value_t = 0.0)]
    pub weight_distance: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            weight_reference_motion: 100.0,
            weight_velocity: 5.0,
            weight_head_accel: 0.5,
            weight_rotation: 0.01,
            weight_distance: 0.0,
        }
    }
}

impl FitnessWeights {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GaitScoreError::Config(format!(
                "Failed to read weights file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let weights: Self = serde_json::from_str(&content)?;
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> GsResult<()> {
        let fields = [
            ("weight_reference_motion", self.weight_reference_motion),
            ("weight_velocity", self.weight_velocity),
            ("weight_head_accel", self.weight_head_accel),
            ("weight_rotation", self.weight_rotation),
            ("weight_distance", self.weight_distance),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(GaitScoreError::Config(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Copies over only the weights the user typed on the command line,
    /// leaving file-loaded values in place for everything else.
    pub fn merge_from_cli(&mut self, cli_weights: &FitnessWeights, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_weights.$field;
                }
            };
        }

        update_if_present!(weight_reference_motion, "weight_reference_motion");
        update_if_present!(weight_velocity, "weight_velocity");
        update_if_present!(weight_head_accel, "weight_head_accel");
        update_if_present!(weight_rotation, "weight_rotation");
        update_if_present!(weight_distance, "weight_distance");
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayParams {
    /// Close the partial stride left in the buffer when the trial ends
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub flush_final_stride: bool,

    /// Fallback tick length (seconds) for traces that don't carry one
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,
}

impl Default for ReplayParams {
    fn default() -> Self {
        Self {
            flush_final_stride: true,
            dt: 1.0 / 60.0,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthParams {
    #[arg(long, default_value_t = 600)]
    pub synth_ticks: usize,
    #[arg(long, default_value_t = 1)]
    pub synth_leg_frames: usize,
    #[arg(long, default_value_t = 1.0)]
    pub synth_stride_period: f32,
    #[arg(long, default_value_t = 1.0)]
    pub synth_goal_speed: f32,
    #[arg(long, default_value_t = 0.05)]
    pub synth_noise: f32,
    #[arg(long)]
    pub synth_seed: Option<u64>,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            synth_ticks: 600,
            synth_leg_frames: 1,
            synth_stride_period: 1.0,
            synth_goal_speed: 1.0,
            synth_noise: 0.05,
            synth_seed: None,
        }
    }
}
