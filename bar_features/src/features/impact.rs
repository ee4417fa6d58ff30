//! Body size of the bar on unusually heavy volume.

/// `vol_vs_7d_avg` above which a day counts as high volume.
pub const HIGH_VOLUME_THRESHOLD: f64 = 1.5;

/// `close - open` when `vol_ratio > 1.5`, otherwise 0.
///
/// A missing or NaN ratio is never above the threshold.
pub fn high_volume_impact(open: f64, close: f64, vol_ratio: Option<f64>) -> f64 {
    match vol_ratio {
        Some(ratio) if ratio > HIGH_VOLUME_THRESHOLD => close - open,
        _ => 0.0,
    }
}
