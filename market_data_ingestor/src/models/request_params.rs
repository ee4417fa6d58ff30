use chrono::{DateTime, Utc};

use crate::models::timeframe::TimeFrame;

/// Default number of bars asked from providers that page by count.
pub const DEFAULT_RANGE: u32 = 5000;

/// Vendor-agnostic parameters for requesting one symbol's bar history.
///
/// It is the standard input for every
/// [`DataProvider`](crate::providers::DataProvider) implementation. Providers
/// pick the fields their API understands: the websocket chart feed pages by
/// `range`, REST feeds page by `start`/`end`.
#[derive(Clone, Debug, PartialEq)]
pub struct BarsRequest {
    /// Symbol to request (e.g. `"CSEMA:MASI"`, `"NASDAQ:AAPL"`, `"AAPL"`).
    pub symbol: String,

    /// The time interval for each bar.
    ///
    /// Validation of allowed values is performed by each data provider
    /// implementation, according to their own API rules.
    pub timeframe: TimeFrame,

    /// Maximum number of most recent bars to request.
    pub range: u32,

    /// Start of the requested time range (inclusive, UTC).
    pub start: DateTime<Utc>,

    /// End of the requested time range (inclusive, UTC).
    pub end: DateTime<Utc>,
}

impl BarsRequest {
    /// Same request for another symbol. Used to fetch the benchmark with the
    /// instrument's parameters.
    pub fn for_symbol(&self, symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..self.clone()
        }
    }
}
