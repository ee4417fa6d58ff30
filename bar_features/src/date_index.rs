//! Calendar-date lookup of benchmark quotes.

use std::collections::HashMap;

use chrono::NaiveDate;
use market_data_ingestor::models::bar::Bar;

/// Benchmark open/close for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkQuote {
    pub open: f64,
    pub close: f64,
}

/// Benchmark quotes keyed by UTC calendar date.
#[derive(Debug, Default)]
pub struct DateKeyIndex {
    by_date: HashMap<NaiveDate, BenchmarkQuote>,
}

impl DateKeyIndex {
    /// Indexes `bars` by [`Bar::calendar_date`]. When two bars fall on the same
    /// date the later one in sequence order wins.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut by_date = HashMap::with_capacity(bars.len());
        for bar in bars {
            by_date.insert(
                bar.calendar_date(),
                BenchmarkQuote {
                    open: bar.open,
                    close: bar.close,
                },
            );
        }
        Self { by_date }
    }

    pub fn get(&self, date: NaiveDate) -> Option<BenchmarkQuote> {
        self.by_date.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
