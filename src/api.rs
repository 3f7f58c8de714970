use crate::config::{Config, ReplayParams};
use crate::error::GsResult;
use crate::evaluator::{FitnessBreakdown, FitnessEvaluator};
use crate::telemetry::StrideLatch;
use crate::trace::TrialTrace;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RankedTrial {
    pub name: String,
    pub path: PathBuf,
    pub breakdown: FitnessBreakdown,
}

/// Feeds every tick of `trace` through a fresh evaluator.
pub fn replay_trace(trace: &TrialTrace, config: &Config) -> FitnessEvaluator {
    let mut ev = FitnessEvaluator::with_capacity(config.weights, trace.len());
    let mut latch = StrideLatch::new();

    for view in trace.views() {
        if view.sample().stride_restarted {
            latch.raise();
        }
        ev.record_tick(&view, &mut latch);
    }

    if config.replay.flush_final_stride {
        ev.finish_trial();
    }
    debug!(
        "Replayed '{}': {} ticks, {} strides",
        trace.meta.name,
        trace.len(),
        ev.velocity().deviations().len()
    );
    ev
}

pub fn score_trace(trace: &TrialTrace, config: &Config, debug_print: bool) -> FitnessBreakdown {
    let ev = replay_trace(trace, config);
    if debug_print {
        ev.evaluate(true);
    }
    ev.breakdown()
}

pub fn score_trace_file<P: AsRef<Path>>(
    path: P,
    config: &Config,
    debug_print: bool,
) -> GsResult<(TrialTrace, FitnessBreakdown)> {
    let trace = TrialTrace::load_from_file(path)?;
    let breakdown = score_trace(&trace, config, debug_print);
    Ok((trace, breakdown))
}

/// Tick length used when replaying `trace`: its own, or the configured default.
pub fn effective_dt(trace: &TrialTrace, replay: &ReplayParams) -> f32 {
    if trace.meta.dt > 0.0 {
        trace.meta.dt
    } else {
        replay.dt
    }
}

/// Scores every trace in parallel and sorts by fitness, best (lowest) first.
///
/// Files that fail to load are logged and skipped.
pub fn rank_traces(paths: &[PathBuf], config: &Config) -> Vec<RankedTrial> {
    info!("Ranking {} trial traces", paths.len());

    let mut ranked: Vec<RankedTrial> = paths
        .par_iter()
        .filter_map(|path| match score_trace_file(path, config, false) {
            Ok((trace, breakdown)) => Some(RankedTrial {
                name: trace.meta.name,
                path: path.clone(),
                breakdown,
            }),
            Err(e) => {
                warn!("Skipping '{}': {}", path.display(), e);
                None
            }
        })
        .collect();

    ranked.sort_by(|a, b| a.breakdown.fitness.total_cmp(&b.breakdown.fitness));
    ranked
}
