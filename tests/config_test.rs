use clap::{CommandFactory, FromArgMatches, Parser};
use gaitscore::config::{Config, FitnessWeights};
use gaitscore::error::GaitScoreError;
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct WeightsCli {
    #[command(flatten)]
    weights: FitnessWeights,
}

fn write_json(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_weights() {
    let w = FitnessWeights::default();
    assert_eq!(w.weight_reference_motion, 100.0);
    assert_eq!(w.weight_velocity, 5.0);
    assert_eq!(w.weight_head_accel, 0.5);
    assert_eq!(w.weight_rotation, 0.01);
    assert_eq!(w.weight_distance, 0.0);

    let cfg = Config::default();
    assert!(cfg.replay.flush_final_stride);
    assert!((cfg.replay.dt - 1.0 / 60.0).abs() < 1e-9);
    assert_eq!(cfg.synth.synth_ticks, 600);
    assert_eq!(cfg.synth.synth_seed, None);
}

#[test]
fn test_clap_defaults_match_serde_defaults() {
    let cli = WeightsCli::parse_from(["test"]);
    assert_eq!(cli.weights, FitnessWeights::default());
}

#[test]
fn test_load_partial_profile() {
    let file = write_json(r#"{ "weight_distance": 2.5, "weight_velocity": 1.0 }"#);
    let w = FitnessWeights::load_from_file(file.path()).unwrap();
    assert_eq!(w.weight_distance, 2.5);
    assert_eq!(w.weight_velocity, 1.0);
    assert_eq!(w.weight_reference_motion, 100.0);
}

#[test]
fn test_load_missing_file() {
    let err = FitnessWeights::load_from_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, GaitScoreError::Config(_)));
}

#[test]
fn test_load_malformed_json() {
    let file = write_json("{ weight_distance: ");
    let err = FitnessWeights::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, GaitScoreError::Json(_)));
}

#[test]
fn test_non_finite_weight_rejected() {
    let w = FitnessWeights {
        weight_rotation: f64::NAN,
        ..Default::default()
    };
    let err = w.validate().unwrap_err();
    assert!(err.to_string().contains("weight_rotation"));

    let w = FitnessWeights {
        weight_head_accel: f64::INFINITY,
        ..Default::default()
    };
    assert!(w.validate().is_err());
}

#[test]
fn test_cli_overrides_only_typed_weights() {
    let matches = WeightsCli::command().get_matches_from(["test", "--weight-velocity", "7.5"]);
    let cli = WeightsCli::from_arg_matches(&matches).unwrap();

    let file = write_json(r#"{ "weight_velocity": 1.0, "weight_rotation": 0.5 }"#);
    let mut w = FitnessWeights::load_from_file(file.path()).unwrap();
    w.merge_from_cli(&cli.weights, &matches);

    assert_eq!(w.weight_velocity, 7.5);
    // Not typed on the command line: the profile value survives.
    assert_eq!(w.weight_rotation, 0.5);
    assert_eq!(w.weight_reference_motion, 100.0);
}
