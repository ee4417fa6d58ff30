//! Joins the benchmark onto the instrument series and derives every feature.

use market_data_ingestor::models::bar::Bar;
use tracing::debug;

use crate::date_index::DateKeyIndex;
use crate::features::{
    CORRELATION_WINDOW, LONG_VOLUME_WINDOW, PRICE_CHANGE_LAGS, SHORT_VOLUME_WINDOW,
    high_volume_impact, price_change, rolling_correlation, trailing_mean,
    volume::{guarded_ratio_to_average, ratio_to_average},
};
use crate::row::EnrichedRow;

/// Builds one [`EnrichedRow`] per instrument bar, in input order.
///
/// Both inputs are expected oldest-first. An empty instrument series yields
/// an empty table. This never fails: numeric edge cases resolve to `None`,
/// zero, or a propagated NaN/infinity.
pub fn derive_features(instrument: &[Bar], benchmark: &[Bar]) -> Vec<EnrichedRow> {
    if instrument.is_empty() {
        return Vec::new();
    }

    let index = DateKeyIndex::from_bars(benchmark);
    let mut rows: Vec<EnrichedRow> = instrument.iter().cloned().map(EnrichedRow::new).collect();

    for row in &mut rows {
        if let Some(quote) = index.get(row.bar.calendar_date()) {
            row.masi_open = Some(quote.open);
            row.masi_close = Some(quote.close);
        }
    }

    let closes: Vec<f64> = instrument.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = instrument.iter().map(|b| b.volume).collect();

    let [change_1d, change_7d, change_30d, change_365d] =
        PRICE_CHANGE_LAGS.map(|lag| price_change(&closes, lag));

    let short_avg = trailing_mean(&volumes, SHORT_VOLUME_WINDOW);
    let long_avg = trailing_mean(&volumes, LONG_VOLUME_WINDOW);
    let short_ratio = ratio_to_average(&volumes, &short_avg);
    let long_ratio = guarded_ratio_to_average(&volumes, &long_avg);
    let correlation = rolling_correlation(&volumes, &closes, CORRELATION_WINDOW);

    for (i, row) in rows.iter_mut().enumerate() {
        row.price_change_1d = change_1d[i];
        row.price_change_7d = change_7d[i];
        row.price_change_30d = change_30d[i];
        row.price_change_365d = change_365d[i];
        row.volume_7d_avg = short_avg[i];
        row.volume_90d_avg = long_avg[i];
        row.vol_vs_7d_avg = short_ratio[i];
        row.vol_vs_90d_avg = long_ratio[i];
        row.volume_price_corr_7d = correlation[i];
        row.high_volume_impact = high_volume_impact(row.bar.open, row.bar.close, row.vol_vs_7d_avg);
    }

    debug!(
        rows = rows.len(),
        benchmark_dates = index.len(),
        joined = rows.iter().filter(|r| r.has_benchmark()).count(),
        "derived features"
    );
    rows
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    const CLOSES: [f64; 10] = [100.0, 101.0, 99.0, 102.0, 105.0, 103.0, 106.0, 108.0, 107.0, 110.0];
    const VOLUMES: [f64; 10] = [
        1000.0, 1100.0, 900.0, 1200.0, 1300.0, 1050.0, 1400.0, 1600.0, 1500.0, 1800.0,
    ];

    fn ten_days() -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        CLOSES
            .iter()
            .zip(VOLUMES)
            .enumerate()
            .map(|(i, (&close, volume))| Bar {
                open_time: start + Duration::days(i as i64),
                open: close - 1.0,
                high: close + 1.0,
                low: close - 2.0,
                close,
                volume,
            })
            .collect()
    }

    #[test]
    fn empty_instrument_gives_empty_table() {
        assert!(derive_features(&[], &ten_days()).is_empty());
    }

    #[test]
    fn ten_day_example() {
        let rows = derive_features(&ten_days(), &[]);
        assert_eq!(rows.len(), 10);

        let day8 = &rows[7];
        assert_eq!(day8.bar.close, 108.0);
        assert_eq!(day8.price_change_7d, Some((108.0 - 100.0) / 100.0));
        assert_eq!(day8.price_change_7d, Some(0.08));
        assert_eq!(day8.price_change_1d, Some((108.0 - 106.0) / 106.0));
        assert_relative_eq!(day8.volume_7d_avg.unwrap(), 8550.0 / 7.0);
        assert_relative_eq!(day8.volume_7d_avg.unwrap(), 1221.43, epsilon = 0.005);
        assert_relative_eq!(day8.vol_vs_7d_avg.unwrap(), 1600.0 / (8550.0 / 7.0));

        assert!(rows[6].price_change_7d.is_none());
        assert!(rows[6].volume_7d_avg.is_none());
        assert!(rows.iter().all(|r| r.price_change_30d.is_none() && r.volume_90d_avg.is_none()));
        assert!(rows[..7].iter().all(|r| r.volume_price_corr_7d.is_none()));
        assert!(rows[7..].iter().all(|r| r.volume_price_corr_7d.is_some()));
        // Ratios here stay below 1.5.
        assert!(rows.iter().all(|r| r.high_volume_impact == 0.0));
        assert!(rows.iter().all(|r| !r.has_benchmark()));
    }

    #[test]
    fn joins_benchmark_by_calendar_date_only() {
        let instrument = ten_days();
        let benchmark: Vec<Bar> = instrument
            .iter()
            .step_by(2)
            .map(|b| Bar {
                open_time: b.open_time + Duration::hours(15),
                open: 12_000.0,
                high: 12_100.0,
                low: 11_900.0,
                close: 12_050.0,
                volume: 0.0,
            })
            .collect();

        let rows = derive_features(&instrument, &benchmark);
        for (i, row) in rows.iter().enumerate() {
            if i % 2 == 0 {
                assert_eq!((row.masi_open, row.masi_close), (Some(12_000.0), Some(12_050.0)));
            } else {
                assert!(!row.has_benchmark());
            }
        }
        // The join leaves every other column untouched.
        let without = derive_features(&instrument, &[]);
        assert_eq!(rows[7].price_change_7d, without[7].price_change_7d);
        assert_eq!(rows[7].volume_price_corr_7d, without[7].volume_price_corr_7d);
    }

    #[test]
    fn volume_spike_sets_impact() {
        let mut bars = ten_days();
        bars[9].volume = 10_000.0;
        let rows = derive_features(&bars, &[]);
        assert!(rows[9].vol_vs_7d_avg.unwrap() > 1.5);
        assert_eq!(rows[9].high_volume_impact, bars[9].close - bars[9].open);
    }
}
