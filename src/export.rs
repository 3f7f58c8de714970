use crate::error::GsResult;
use crate::evaluator::FitnessEvaluator;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct TickRow {
    tick: usize,
    time: f32,
    reference_motion: f64,
    head_accel: f64,
    rotation_deg: f64,
    forward_velocity: f32,
}

#[derive(Debug, Serialize)]
struct StrideRow {
    stride: usize,
    velocity_deviation: f64,
}

/// Picks the file-name prefix for a trace's CSV series.
///
/// Built from the input file's stem, never from the trace's own name, so the
/// series always land inside the export directory. Stems already in `taken`
/// get a numeric suffix.
pub fn series_stem(path: &Path, taken: &mut HashSet<String>) -> String {
    let base = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());

    let mut stem = base.clone();
    let mut n = 1;
    while !taken.insert(stem.clone()) {
        n += 1;
        stem = format!("{}-{}", base, n);
    }
    stem
}

/// Writes one CSV row per recorded tick.
///
/// `rotation_deg` is the mean over leg frames for that tick.
pub fn write_tick_series<W: Write>(ev: &FitnessEvaluator, dt: f32, writer: W) -> GsResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let fd = ev.reference_motion().series();
    let fh = ev.head_acceleration().series();
    let fr = ev.rotation().per_leg_frame();
    let fp = ev.movement_distance().velocities();

    for tick in 0..ev.ticks() {
        let per_frame: Vec<f64> = fr.iter().filter_map(|s| s.get(tick).copied()).collect();
        let rotation_deg = if per_frame.is_empty() {
            0.0
        } else {
            per_frame.iter().sum::<f64>() / per_frame.len() as f64
        };

        wtr.serialize(TickRow {
            tick,
            time: tick as f32 * dt,
            reference_motion: fd.get(tick).copied().unwrap_or_default(),
            head_accel: fh.get(tick).copied().unwrap_or_default(),
            rotation_deg,
            forward_velocity: fp.get(tick).map_or(0.0, |v| v.z),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes one CSV row per closed stride.
pub fn write_stride_series<W: Write>(ev: &FitnessEvaluator, writer: W) -> GsResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (stride, &velocity_deviation) in ev.velocity().deviations().iter().enumerate() {
        wtr.serialize(StrideRow {
            stride,
            velocity_deviation,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
