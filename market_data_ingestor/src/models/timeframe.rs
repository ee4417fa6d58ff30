//! Timeframe model for uniform bar intervals.
//!
//! A [`TimeFrame`] pairs a non-zero amount with a [`TimeFrameUnit`]. It parses
//! from and displays as the compact notation used on the command line
//! (`"5m"`, `"3h"`, `"1D"`, `"1W"`, `"1M"`) and knows how each provider spells it.
//!
//! ```
//! use market_data_ingestor::models::timeframe::{TimeFrame, TimeFrameUnit};
//!
//! let tf: TimeFrame = "1D".parse().unwrap();
//! assert_eq!(tf.unit, TimeFrameUnit::Day);
//! assert_eq!(tf.tradingview_resolution(), "1D");
//! assert_eq!(tf.alpaca_str(), "1Day");
//! ```

use std::{fmt, num::NonZeroU32, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeFrameError {
    #[error("empty timeframe")]
    Empty,

    #[error("invalid timeframe amount in {input:?}: must be a positive integer")]
    InvalidAmount { input: String },

    #[error("unknown timeframe unit {unit:?} (expected one of m, h, D, W, M)")]
    UnknownUnit { unit: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFrame {
    pub amount: NonZeroU32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    pub const fn new(amount: NonZeroU32, unit: TimeFrameUnit) -> Self {
        Self { amount, unit }
    }

    /// One calendar day, the timeframe of the feature table.
    pub const fn day() -> Self {
        Self {
            amount: NonZeroU32::MIN,
            unit: TimeFrameUnit::Day,
        }
    }

    /// Resolution string of the TradingView chart API. Intraday resolutions are
    /// expressed in minutes (`"5"`, `"240"`).
    pub fn tradingview_resolution(&self) -> String {
        let a = self.amount.get();
        match self.unit {
            TimeFrameUnit::Minute => a.to_string(),
            TimeFrameUnit::Hour => (a * 60).to_string(),
            TimeFrameUnit::Day => format!("{a}D"),
            TimeFrameUnit::Week => format!("{a}W"),
            TimeFrameUnit::Month => format!("{a}M"),
        }
    }

    /// Timeframe string of the Alpaca market data API (`"15Min"`, `"1Day"`).
    pub fn alpaca_str(&self) -> String {
        let a = self.amount.get();
        let unit = match self.unit {
            TimeFrameUnit::Minute => "Min",
            TimeFrameUnit::Hour => "Hour",
            TimeFrameUnit::Day => "Day",
            TimeFrameUnit::Week => "Week",
            TimeFrameUnit::Month => "Month",
        };
        format!("{a}{unit}")
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.amount.get();
        let u = match self.unit {
            TimeFrameUnit::Minute => "m",
            TimeFrameUnit::Hour => "h",
            TimeFrameUnit::Day => "D",
            TimeFrameUnit::Week => "W",
            TimeFrameUnit::Month => "M",
        };
        write!(f, "{a}{u}")
    }
}

impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(last) = s.chars().last() else {
            return Err(TimeFrameError::Empty);
        };
        let (digits, unit) = s.split_at(s.len() - last.len_utf8());
        let amount = digits
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| TimeFrameError::InvalidAmount {
                input: s.to_string(),
            })?;
        let unit = match unit {
            "m" => TimeFrameUnit::Minute,
            "h" => TimeFrameUnit::Hour,
            "D" | "d" => TimeFrameUnit::Day,
            "W" | "w" => TimeFrameUnit::Week,
            "M" => TimeFrameUnit::Month,
            other => {
                return Err(TimeFrameError::UnknownUnit {
                    unit: other.to_string(),
                });
            }
        };
        Ok(Self::new(amount, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compact_notation() {
        let tf: TimeFrame = "5m".parse().unwrap();
        assert_eq!(tf.amount.get(), 5);
        assert_eq!(tf.unit, TimeFrameUnit::Minute);

        assert_eq!("1D".parse::<TimeFrame>().unwrap(), TimeFrame::day());
        assert_eq!("6M".parse::<TimeFrame>().unwrap().unit, TimeFrameUnit::Month);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for text in ["5m", "3h", "1D", "2W", "6M"] {
            let tf: TimeFrame = text.parse().unwrap();
            assert_eq!(tf.to_string(), text);
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<TimeFrame>(), Err(TimeFrameError::Empty));
        assert!(matches!(
            "0D".parse::<TimeFrame>(),
            Err(TimeFrameError::InvalidAmount { .. })
        ));
        assert!(matches!(
            "D".parse::<TimeFrame>(),
            Err(TimeFrameError::InvalidAmount { .. })
        ));
        assert!(matches!(
            "5x".parse::<TimeFrame>(),
            Err(TimeFrameError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn provider_spellings() {
        let four_hours: TimeFrame = "4h".parse().unwrap();
        assert_eq!(four_hours.tradingview_resolution(), "240");
        assert_eq!(four_hours.alpaca_str(), "4Hour");
        assert_eq!(TimeFrame::day().tradingview_resolution(), "1D");
        assert_eq!(TimeFrame::day().alpaca_str(), "1Day");
    }
}
