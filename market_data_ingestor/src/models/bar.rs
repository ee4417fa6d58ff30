//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! This struct is used as the standard output for all [`DataProvider`](crate::providers::DataProvider)
//! implementations, regardless of the vendor the bars came from.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::timeframe::TimeFrame;

/// A single time-series bar (OHLCV) for a given timestamp.
///
/// Bars are immutable once fetched. Daily feeds produce one bar per calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// The instant the bar opened (UTC, millisecond precision).
    pub open_time: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval. Feeds without volume report 0.
    pub volume: f64,
}

impl Bar {
    /// UTC calendar date of [`Bar::open_time`], the key used for cross-series joins.
    pub fn calendar_date(&self) -> NaiveDate {
        self.open_time.date_naive()
    }

    /// Milliseconds since the Unix epoch.
    pub fn open_time_ms(&self) -> i64 {
        self.open_time.timestamp_millis()
    }
}

/// Represents a complete set of time-series data for a single symbol.
///
/// This struct groups a vector of [`Bar`]s with their corresponding symbol
/// and [`TimeFrame`], making the data set self-describing.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "CSEMA:MASI", "AAPL").
    pub symbol: String,
    /// The time interval for each bar in the series.
    pub timeframe: TimeFrame,
    /// The collection of OHLCV bars, oldest first.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>, timeframe: TimeFrame, bars: Vec<Bar>) -> Self {
        let mut series = Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        };
        series.sort_chronologically();
        series
    }

    /// Stable sort by `open_time`, oldest first.
    pub fn sort_chronologically(&mut self) {
        self.bars.sort_by_key(|bar| bar.open_time);
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}
