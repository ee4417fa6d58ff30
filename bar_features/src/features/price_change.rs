//! Relative close-to-close change over a fixed lag.

/// Lags, in positions, for which a price change column exists.
pub const PRICE_CHANGE_LAGS: [usize; 4] = [1, 7, 30, 365];

/// `(close[i] - close[i - lag]) / close[i - lag]` for `i >= lag`, `None` before.
///
/// A zero reference close is not special-cased and yields an infinity or NaN.
pub fn price_change(closes: &[f64], lag: usize) -> Vec<Option<f64>> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let prev = closes[i.checked_sub(lag)?];
            Some((close - prev) / prev)
        })
        .collect()
}
