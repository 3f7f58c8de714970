/// Mean and population standard deviation of a scalar series.
///
/// Both divide by `max(1, len)`, so an empty series summarises to zeros.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

#[inline(always)]
fn guarded_len(len: usize) -> f64 {
    (len as f64).max(1.0)
}

pub fn mean(series: &[f64]) -> f64 {
    series.iter().sum::<f64>() / guarded_len(series.len())
}

pub fn summarize(series: &[f64]) -> SeriesStats {
    let mean = mean(series);
    let sq_diff: f64 = series
        .iter()
        .map(|n| {
            let d = n - mean;
            d * d
        })
        .sum();

    SeriesStats {
        mean,
        std_dev: (sq_diff / guarded_len(series.len())).sqrt(),
        count: series.len(),
    }
}
