//! The enriched output row and its fixed column schema.

use market_data_ingestor::models::bar::Bar;

use crate::table::{Cell, TableRecord};

/// Output column order.
pub const COLUMNS: [&str; 21] = [
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "masi_open",
    "masi_close",
    "taker_buy_base",
    "sell_volume",
    "price_change_1d",
    "price_change_7d",
    "price_change_30d",
    "price_change_365d",
    "volume_7d_avg",
    "volume_90d_avg",
    "buy_sell_ratio",
    "vol_vs_7d_avg",
    "vol_vs_90d_avg",
    "volume_price_corr_7d",
    "high_volume_impact",
];

/// A bar plus every derived field.
///
/// `None` means "not computable": the lookback window is not yet satisfied,
/// the benchmark had no bar that day, or the field has no source at all.
/// Lookbacks count positions in the series, not calendar days, so the `7d`
/// fields span seven trading sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub bar: Bar,

    pub masi_open: Option<f64>,
    pub masi_close: Option<f64>,

    // No feed supplies order-side volume; kept so the column set stays stable.
    pub taker_buy_base: Option<f64>,
    pub sell_volume: Option<f64>,
    pub buy_sell_ratio: Option<f64>,

    pub price_change_1d: Option<f64>,
    pub price_change_7d: Option<f64>,
    pub price_change_30d: Option<f64>,
    pub price_change_365d: Option<f64>,

    pub volume_7d_avg: Option<f64>,
    pub volume_90d_avg: Option<f64>,
    pub vol_vs_7d_avg: Option<f64>,
    pub vol_vs_90d_avg: Option<f64>,

    /// Pearson correlation of volume and close. `Some(0.0)` for a full but
    /// degenerate window, `None` before the window fills.
    pub volume_price_corr_7d: Option<f64>,

    /// `close - open` on high-volume days, otherwise 0. Never null.
    pub high_volume_impact: f64,
}

impl EnrichedRow {
    /// Row with every derived field empty.
    pub fn new(bar: Bar) -> Self {
        Self {
            bar,
            masi_open: None,
            masi_close: None,
            taker_buy_base: None,
            sell_volume: None,
            buy_sell_ratio: None,
            price_change_1d: None,
            price_change_7d: None,
            price_change_30d: None,
            price_change_365d: None,
            volume_7d_avg: None,
            volume_90d_avg: None,
            vol_vs_7d_avg: None,
            vol_vs_90d_avg: None,
            volume_price_corr_7d: None,
            high_volume_impact: 0.0,
        }
    }

    pub fn has_benchmark(&self) -> bool {
        self.masi_open.is_some() && self.masi_close.is_some()
    }
}

impl TableRecord for EnrichedRow {
    fn cell(&self, column: &str) -> Cell {
        match column {
            "date" => Cell::Text(self.bar.calendar_date().format("%Y-%m-%d").to_string()),
            "open" => self.bar.open.into(),
            "high" => self.bar.high.into(),
            "low" => self.bar.low.into(),
            "close" => self.bar.close.into(),
            "volume" => self.bar.volume.into(),
            "masi_open" => self.masi_open.into(),
            "masi_close" => self.masi_close.into(),
            "taker_buy_base" => self.taker_buy_base.into(),
            "sell_volume" => self.sell_volume.into(),
            "price_change_1d" => self.price_change_1d.into(),
            "price_change_7d" => self.price_change_7d.into(),
            "price_change_30d" => self.price_change_30d.into(),
            "price_change_365d" => self.price_change_365d.into(),
            "volume_7d_avg" => self.volume_7d_avg.into(),
            "volume_90d_avg" => self.volume_90d_avg.into(),
            "buy_sell_ratio" => self.buy_sell_ratio.into(),
            "vol_vs_7d_avg" => self.vol_vs_7d_avg.into(),
            "vol_vs_90d_avg" => self.vol_vs_90d_avg.into(),
            "volume_price_corr_7d" => self.volume_price_corr_7d.into(),
            "high_volume_impact" => self.high_volume_impact.into(),
            _ => Cell::Null,
        }
    }
}
