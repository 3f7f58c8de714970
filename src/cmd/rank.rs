use crate::reports;
use clap::Args;
use gaitscore::api;
use gaitscore::config::Config;
use gaitscore::error::GsResult;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub config: Config,

    /// Trace files, or directories whose *.json files are all ranked
    #[arg(required = true)]
    pub traces: Vec<PathBuf>,
}

fn collect_trace_paths(inputs: &[PathBuf]) -> GsResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(input)?
                .filter_map(|entry| match entry {
                    Ok(e) => Some(e.path()),
                    Err(e) => {
                        warn!("Skipping unreadable entry in '{}': {}", input.display(), e);
                        None
                    }
                })
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

pub fn run(args: RankArgs) -> GsResult<()> {
    let paths = collect_trace_paths(&args.traces)?;
    println!("\n🏁 === TRIAL RANKING ({} traces) === 🏁", paths.len());

    let ranked = api::rank_traces(&paths, &args.config);
    reports::print_ranking(&ranked);

    if let Some(best) = ranked.first() {
        println!("BEST {} {:.6}", best.name, best.breakdown.fitness);
    }
    Ok(())
}
