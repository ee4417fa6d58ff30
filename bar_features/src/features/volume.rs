//! Trailing volume averages and the volume-to-average ratios.

pub const SHORT_VOLUME_WINDOW: usize = 7;
pub const LONG_VOLUME_WINDOW: usize = 90;

/// Mean of the `window` samples ending at `i` (inclusive), for `i >= window`.
///
/// Position `window - 1` has a full window available but stays `None`; the
/// first value appears one position later, in line with the other families.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    // Each window is summed afresh; a running sum drifts and turns an
    // all-zero window into a tiny nonzero mean.
    (0..values.len())
        .map(|i| (i >= window).then(|| values[i + 1 - window..=i].iter().sum::<f64>() / window as f64))
        .collect()
}

/// `volume / avg`, with no guard on a zero average.
pub fn ratio_to_average(volumes: &[f64], averages: &[Option<f64>]) -> Vec<Option<f64>> {
    volumes
        .iter()
        .zip(averages)
        .map(|(&v, avg)| avg.map(|avg| v / avg))
        .collect()
}

/// `volume / avg`, dividing by 1 when the average is zero or NaN.
pub fn guarded_ratio_to_average(volumes: &[f64], averages: &[Option<f64>]) -> Vec<Option<f64>> {
    volumes
        .iter()
        .zip(averages)
        .map(|(&v, avg)| {
            avg.map(|avg| {
                let divisor = if avg == 0.0 || avg.is_nan() { 1.0 } else { avg };
                v / divisor
            })
        })
        .collect()
}
