use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use shared_utils::env::get_env_var_or;
use snafu::ResultExt;
use tokio_tungstenite::tungstenite::{
    Message as WsMessage, client::IntoClientRequest, http::HeaderValue,
};
use tracing::{debug, info};

use crate::{
    models::{bar::BarSeries, request_params::BarsRequest},
    providers::{ApiSnafu, DataProvider, ProviderError, WebSocketSnafu},
};

use super::{
    protocol::{Packet, frame, parse_packets},
    session::{ChartSession, Flow},
};

pub const DEFAULT_WS_URL: &str = "wss://data.tradingview.com/socket.io/websocket?type=chart";
const ORIGIN: &str = "https://www.tradingview.com";

/// Anonymous TradingView chart feed. Each fetch opens its own socket.
pub struct TradingViewProvider {
    url: String,
}

impl TradingViewProvider {
    /// Uses `TV_WS_URL` when set, the public chart endpoint otherwise.
    pub fn new() -> Self {
        Self::with_url(get_env_var_or("TV_WS_URL", DEFAULT_WS_URL))
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for TradingViewProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataProvider for TradingViewProvider {
    fn name(&self) -> &'static str {
        "tradingview"
    }

    async fn fetch_bars(&self, request: &BarsRequest) -> Result<BarSeries, ProviderError> {
        let mut ws_request = self
            .url
            .as_str()
            .into_client_request()
            .context(WebSocketSnafu)?;
        ws_request
            .headers_mut()
            .insert("Origin", HeaderValue::from_static(ORIGIN));

        let (ws, _resp) = tokio_tungstenite::connect_async(ws_request)
            .await
            .context(WebSocketSnafu)?;
        let (mut w, mut r) = ws.split();

        let mut session = ChartSession::new(request);
        debug!(session = session.id(), symbol = %request.symbol, "chart session opened");
        for msg in session.handshake() {
            w.send(WsMessage::Text(msg.into()))
                .await
                .context(WebSocketSnafu)?;
        }

        while let Some(incoming) = r.next().await {
            match incoming.context(WebSocketSnafu)? {
                WsMessage::Text(text) => {
                    for packet in parse_packets(text.as_str()) {
                        match packet {
                            Packet::Heartbeat(beat) => {
                                w.send(WsMessage::Text(frame(&beat).into()))
                                    .await
                                    .context(WebSocketSnafu)?;
                            }
                            Packet::Message(message) => {
                                if session.handle(&message)? == Flow::Done {
                                    let _ = w.close().await;
                                    info!(
                                        symbol = %request.symbol,
                                        bars = session.bar_count(),
                                        "series completed"
                                    );
                                    return Ok(session.into_series());
                                }
                            }
                            Packet::Other(_) => {}
                        }
                    }
                }
                WsMessage::Ping(payload) => {
                    let _ = w.send(WsMessage::Pong(payload)).await;
                }
                WsMessage::Close(close) => {
                    debug!(?close, "server closed chart socket");
                    break;
                }
                _ => {}
            }
        }

        if session.bar_count() == 0 {
            return ApiSnafu {
                message: format!(
                    "connection closed before any bars arrived for {}",
                    request.symbol
                ),
            }
            .fail();
        }
        Ok(session.into_series())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serial_test::serial;

    use super::*;
    use crate::models::timeframe::TimeFrame;

    #[tokio::test]
    #[serial]
    #[ignore]
    async fn fetches_public_daily_series() {
        let provider = TradingViewProvider::new();
        let request = BarsRequest {
            symbol: "NASDAQ:AAPL".to_string(),
            timeframe: TimeFrame::day(),
            range: 30,
            start: Utc::now() - Duration::days(60),
            end: Utc::now(),
        };

        let series = provider.fetch_bars(&request).await.expect("fetch");
        assert!(!series.is_empty());
        assert!(series.len() <= 30);
        for pair in series.bars.windows(2) {
            assert!(pair[0].open_time < pair[1].open_time);
        }
    }
}
