use crate::reports;
use clap::Args;
use gaitscore::api;
use gaitscore::config::Config;
use gaitscore::error::GsResult;
use gaitscore::synth;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SynthArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub output: PathBuf,

    /// Score the generated trial right away
    #[arg(long, default_value_t = false)]
    pub score: bool,
}

pub fn run(args: SynthArgs, debug: bool) -> GsResult<()> {
    let trace = synth::synthesize(&args.config.synth, args.config.replay.dt)?;
    trace.save_to_file(&args.output)?;
    info!(
        "🧪 Wrote {} ticks ({} leg frames) to {}",
        trace.len(),
        trace.leg_frames.len(),
        args.output.display()
    );

    if args.score {
        let breakdown = api::score_trace(&trace, &args.config, debug);
        reports::print_breakdown(&trace.meta.name, &breakdown, &args.config.weights);
        println!("FITNESS {} {:.6}", trace.meta.name, breakdown.fitness);
    }
    Ok(())
}
