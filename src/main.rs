use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use gaitscore::config::{Config, FitnessWeights};
use gaitscore::error::GsResult;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON weights profile; explicit --weight-* flags still win
    #[arg(global = true, long)]
    weights: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score recorded trial traces
    Score(cmd::score::ScoreArgs),
    /// Score many traces in parallel and rank them
    Rank(cmd::rank::RankArgs),
    /// Generate a synthetic walking trial
    Synth(cmd::synth::SynthArgs),
}

impl Commands {
    fn config_mut(&mut self) -> &mut Config {
        match self {
            Commands::Score(args) => &mut args.config,
            Commands::Rank(args) => &mut args.config,
            Commands::Synth(args) => &mut args.config,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Commands::Score(_) => "score",
            Commands::Rank(_) => "rank",
            Commands::Synth(_) => "synth",
        }
    }
}

fn resolve_weights(
    path: &str,
    cli_weights: &FitnessWeights,
    sub_matches: &ArgMatches,
) -> GsResult<FitnessWeights> {
    info!("⚖️  Loading Weights from: {}", path);
    let mut file_weights = FitnessWeights::load_from_file(path)?;
    file_weights.merge_from_cli(cli_weights, sub_matches);
    Ok(file_weights)
}

fn main() {
    let matches = Cli::command().get_matches();
    let mut cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    // stdout carries only results (tables, JSON, FITNESS lines)
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Weight flags live in the subcommand's matches, not the root's.
    let sub_name = cli.command.name();
    let sub_matches = matches.subcommand_matches(sub_name).unwrap_or(&matches);

    if let Some(path) = cli.weights.clone() {
        let config = cli.command.config_mut();
        match resolve_weights(&path, &config.weights, sub_matches) {
            Ok(w) => config.weights = w,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
    }

    if let Err(e) = cli.command.config_mut().weights.validate() {
        error!("{}", e);
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Score(args) => cmd::score::run(args, cli.debug),
        Commands::Rank(args) => cmd::rank::run(args),
        Commands::Synth(args) => cmd::synth::run(args, cli.debug),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
