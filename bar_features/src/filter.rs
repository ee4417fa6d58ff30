//! Inclusive calendar-date window applied to fetched series.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use market_data_ingestor::models::bar::{Bar, BarSeries};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("start date {start} is after end date {end}")]
pub struct DateRangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// `[start, end]` by UTC calendar date, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, bar: &Bar) -> bool {
        let date = bar.calendar_date();
        self.start <= date && date <= self.end
    }

    /// Drops bars outside the window, keeping the order of the rest.
    pub fn retain(&self, series: &mut BarSeries) {
        series.bars.retain(|bar| self.contains(bar));
    }

    /// First instant of the start date.
    pub fn start_instant(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// Last millisecond of the end date.
    pub fn end_instant(&self) -> DateTime<Utc> {
        (self.end.and_time(NaiveTime::MIN) + TimeDelta::days(1) - TimeDelta::milliseconds(1)).and_utc()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use market_data_ingestor::models::timeframe::TimeFrame;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar_at(y: i32, m: u32, d: u32, h: u32) -> Bar {
        Bar {
            open_time: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1.0,
        }
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.to_string(), "start date 2024-02-01 is after end date 2024-01-01");
        assert!(DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn both_ends_inclusive_by_date() {
        let range = DateRange::new(date(2024, 1, 2), date(2024, 1, 3)).unwrap();
        assert!(!range.contains(&bar_at(2024, 1, 1, 23)));
        assert!(range.contains(&bar_at(2024, 1, 2, 0)));
        assert!(range.contains(&bar_at(2024, 1, 3, 23)));
        assert!(!range.contains(&bar_at(2024, 1, 4, 0)));
    }

    #[test]
    fn retain_keeps_order() {
        let mut series = BarSeries::new(
            "X",
            TimeFrame::day(),
            (1..=5).map(|d| bar_at(2024, 1, d, 9)).collect(),
        );
        DateRange::new(date(2024, 1, 2), date(2024, 1, 4))
            .unwrap()
            .retain(&mut series);
        let days: Vec<_> = series.bars.iter().map(|b| b.calendar_date()).collect();
        assert_eq!(days, vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]);
    }

    #[test]
    fn instants_cover_whole_days() {
        let range = DateRange::new(date(2024, 1, 2), date(2024, 1, 3)).unwrap();
        assert_eq!(range.start_instant(), Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        assert_eq!(
            range.end_instant(),
            Utc.with_ymd_and_hms(2024, 1, 3, 23, 59, 59).unwrap() + TimeDelta::milliseconds(999)
        );
    }
}
