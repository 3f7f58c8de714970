use crate::reports;
use clap::Args;
use gaitscore::api;
use gaitscore::config::Config;
use gaitscore::error::GsResult;
use gaitscore::evaluator::FitnessBreakdown;
use gaitscore::export;
use gaitscore::trace::TrialTrace;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub config: Config,

    /// Recorded trial traces (JSON)
    #[arg(required = true)]
    pub traces: Vec<PathBuf>,

    /// Directory to write per-tick and per-stride CSV series into
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Print one JSON array of breakdowns instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Serialize)]
struct ScoredTrial<'a> {
    name: &'a str,
    #[serde(flatten)]
    breakdown: FitnessBreakdown,
}

pub fn run(args: ScoreArgs, debug: bool) -> GsResult<()> {
    if let Some(dir) = &args.export {
        fs::create_dir_all(dir)?;
    }

    let mut scored = Vec::new();
    let mut stems = HashSet::new();
    for path in &args.traces {
        info!("📂 Loading trace: {}", path.display());
        let trace = TrialTrace::load_from_file(path)?;
        let ev = api::replay_trace(&trace, &args.config);
        let fitness = ev.evaluate(debug);
        let breakdown = ev.breakdown();

        if !args.json {
            reports::print_breakdown(&trace.meta.name, &breakdown, &args.config.weights);
        }

        if let Some(dir) = &args.export {
            let dt = api::effective_dt(&trace, &args.config.replay);
            let stem = export::series_stem(path, &mut stems);
            let ticks_path = dir.join(format!("{}_ticks.csv", stem));
            let strides_path = dir.join(format!("{}_strides.csv", stem));
            export::write_tick_series(&ev, dt, File::create(&ticks_path)?)?;
            export::write_stride_series(&ev, File::create(&strides_path)?)?;
            info!("💾 Series written to {}", dir.display());
        }

        if args.json {
            scored.push((trace.meta.name, breakdown));
        } else {
            println!("FITNESS {} {:.6}", trace.meta.name, fitness);
        }
    }

    if args.json {
        let rows: Vec<ScoredTrial> = scored
            .iter()
            .map(|(name, breakdown)| ScoredTrial {
                name: name.as_str(),
                breakdown: *breakdown,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }
    Ok(())
}
