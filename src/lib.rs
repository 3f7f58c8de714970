pub mod api;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod synth;
pub mod telemetry;
pub mod trace;
// cmd and reports belong to the binary (main.rs).
