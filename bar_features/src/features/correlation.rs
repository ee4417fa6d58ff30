//! Rolling Pearson correlation between two equally long columns.

pub const CORRELATION_WINDOW: usize = 7;

/// Pearson correlation of `xs` and `ys`.
///
/// Returns 0 when either side is constant or the result is NaN.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 || is_constant(&xs[..n]) || is_constant(&ys[..n]) {
        return 0.0;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    let r = cov / denominator;
    if r.is_nan() { 0.0 } else { r }
}

// A constant window like `[0.1; 7]` has a mean that is not exactly 0.1, so
// its computed variance is rounding noise rather than zero.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

/// Correlation over the `window` pairs ending at `i`, for `i >= window`.
pub fn rolling_correlation(xs: &[f64], ys: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = xs.len().min(ys.len());
    (0..n)
        .map(|i| {
            if window == 0 || i < window {
                return None;
            }
            let from = i + 1 - window;
            Some(pearson(&xs[from..=i], &ys[from..=i]))
        })
        .collect()
}
