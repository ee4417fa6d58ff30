//! Chart-session state: the handshake to send and how to fold server
//! messages into bars.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde::Deserialize;
use serde_json::{Value, json};
use snafu::ResultExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    models::{
        bar::{Bar, BarSeries},
        request_params::BarsRequest,
    },
    providers::{ApiSnafu, DecodeSnafu, ProviderError},
};

use super::protocol::{Message, encode_message};

const SERIES_ID: &str = "$prices";
const SYMBOL_ID: &str = "ser_1";

/// Times below this are epoch seconds, above it epoch milliseconds.
const SECONDS_CUTOFF: f64 = 2e10;

/// What the read loop should do after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Done,
}

#[derive(Debug, Deserialize)]
struct SeriesUpdate {
    #[serde(default)]
    s: Vec<SeriesPoint>,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    i: i64,
    v: Vec<Option<f64>>,
}

impl SeriesPoint {
    /// `v` is `[time, open, high, low, close, volume]`; trailing fields may be
    /// missing for index symbols.
    fn to_bar(&self) -> Option<Bar> {
        let field = |idx: usize| self.v.get(idx).copied().flatten();

        let time = field(0)?;
        let millis = if time < SECONDS_CUTOFF {
            time * 1000.0
        } else {
            time
        };
        let open_time = DateTime::from_timestamp_millis(millis as i64)?;

        let open = field(1);
        let close = field(4).or(open)?;
        Some(Bar {
            open_time,
            open: open.unwrap_or(close),
            high: field(2).unwrap_or(close),
            low: field(3).unwrap_or(close),
            close,
            volume: field(5).unwrap_or(0.0),
        })
    }
}

/// One chart session fetching one symbol.
pub struct ChartSession {
    id: String,
    request: BarsRequest,
    points: BTreeMap<i64, Bar>,
}

impl ChartSession {
    pub fn new(request: &BarsRequest) -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("cs_{}", &token[..12]),
            request: request.clone(),
            points: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Messages to send right after the socket opens, in order.
    pub fn handshake(&self) -> Vec<String> {
        let symbol = json!({ "symbol": self.request.symbol, "adjustment": "splits" });
        vec![
            encode_message("set_auth_token", vec![json!("unauthorized_user_token")]),
            encode_message("set_locale", vec![json!("en"), json!("US")]),
            encode_message("chart_create_session", vec![json!(self.id), json!("")]),
            encode_message(
                "resolve_symbol",
                vec![json!(self.id), json!(SYMBOL_ID), json!(format!("={symbol}"))],
            ),
            encode_message(
                "create_series",
                vec![
                    json!(self.id),
                    json!(SERIES_ID),
                    json!("s1"),
                    json!(SYMBOL_ID),
                    json!(self.request.timeframe.tradingview_resolution()),
                    json!(self.request.range),
                    json!(""),
                ],
            ),
        ]
    }

    /// Folds one server message into the session.
    pub fn handle(&mut self, message: &Message) -> Result<Flow, ProviderError> {
        match message.method.as_str() {
            "timescale_update" | "du" => {
                self.absorb(&message.params)?;
                Ok(Flow::Continue)
            }
            "series_completed" => Ok(Flow::Done),
            "symbol_resolved" => {
                debug!(session = %self.id, symbol = %self.request.symbol, "symbol resolved");
                Ok(Flow::Continue)
            }
            "symbol_error" | "series_error" | "critical_error" | "protocol_error" => ApiSnafu {
                message: format!(
                    "{} for {}: {}",
                    message.method,
                    self.request.symbol,
                    Value::Array(message.params.clone())
                ),
            }
            .fail(),
            _ => Ok(Flow::Continue),
        }
    }

    fn absorb(&mut self, params: &[Value]) -> Result<(), ProviderError> {
        let Some(prices) = params.get(1).and_then(|p| p.get(SERIES_ID)) else {
            return Ok(());
        };
        let update: SeriesUpdate = serde_json::from_value(prices.clone()).context(DecodeSnafu)?;
        for point in &update.s {
            match point.to_bar() {
                Some(bar) => {
                    self.points.insert(point.i, bar);
                }
                None => warn!(index = point.i, values = ?point.v, "skipping unusable series point"),
            }
        }
        Ok(())
    }

    pub fn bar_count(&self) -> usize {
        self.points.len()
    }

    /// Collected bars as a series, oldest first.
    pub fn into_series(self) -> BarSeries {
        let bars = self.points.into_values().collect();
        BarSeries::new(self.request.symbol, self.request.timeframe, bars)
    }
}
