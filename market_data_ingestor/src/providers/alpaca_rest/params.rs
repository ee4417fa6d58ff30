use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::{
    models::{
        request_params::BarsRequest,
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Largest page Alpaca accepts for the bars endpoint.
pub const MAX_PAGE_LIMIT: u32 = 10_000;

/// Specifies the corporate action adjustment for stock data.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    Raw,
    #[default]
    Split,
    Dividend,
    All,
}

/// Specifies the source feed for stock data.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Sip,
    #[default]
    Iex,
    Otc,
}

/// Alpaca-specific knobs for a bars request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AlpacaBarsParams {
    pub adjustment: Adjustment,
    pub feed: Feed,
}

impl Adjustment {
    fn as_str(self) -> &'static str {
        match self {
            Adjustment::Raw => "raw",
            Adjustment::Split => "split",
            Adjustment::Dividend => "dividend",
            Adjustment::All => "all",
        }
    }
}

impl Feed {
    fn as_str(self) -> &'static str {
        match self {
            Feed::Sip => "sip",
            Feed::Iex => "iex",
            Feed::Otc => "otc",
        }
    }
}

/// Checks the timeframe against Alpaca's accepted combinations.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<(), ProviderError> {
    let amount = timeframe.amount.get();
    let ok = match timeframe.unit {
        TimeFrameUnit::Minute => (1..=59).contains(&amount),
        TimeFrameUnit::Hour => (1..=23).contains(&amount),
        TimeFrameUnit::Day | TimeFrameUnit::Week => amount == 1,
        TimeFrameUnit::Month => [1, 2, 3, 6, 12].contains(&amount),
    };
    if ok {
        Ok(())
    } else {
        ValidationSnafu {
            message: format!("Alpaca does not support timeframe {timeframe}"),
        }
        .fail()
    }
}

/// Builds the query string for one page of the bars endpoint.
pub fn construct_params(request: &BarsRequest, extra: &AlpacaBarsParams) -> Vec<(String, String)> {
    vec![
        ("symbols".to_string(), request.symbol.clone()),
        ("timeframe".to_string(), request.timeframe.alpaca_str()),
        (
            "start".to_string(),
            request.start.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            "end".to_string(),
            request.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            "limit".to_string(),
            request.range.clamp(1, MAX_PAGE_LIMIT).to_string(),
        ),
        ("adjustment".to_string(), extra.adjustment.as_str().to_string()),
        ("feed".to_string(), extra.feed.as_str().to_string()),
        ("sort".to_string(), "asc".to_string()),
    ]
}
