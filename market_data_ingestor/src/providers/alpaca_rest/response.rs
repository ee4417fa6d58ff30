use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::models::bar::Bar;

#[derive(Deserialize, Debug)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

#[derive(Deserialize, Debug)]
pub struct AlpacaResponse {
    /// Keyed by symbol. Alpaca sends `null` when nothing matched.
    #[serde(default)]
    pub bars: Option<IndexMap<String, Vec<AlpacaBar>>>,
    pub next_page_token: Option<String>,
}

impl From<AlpacaBar> for Bar {
    fn from(ab: AlpacaBar) -> Self {
        Bar {
            open_time: ab.timestamp,
            open: ab.open,
            high: ab.high,
            low: ab.low,
            close: ab.close,
            volume: ab.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_page_with_token() {
        let body = r#"{
            "bars": {"AAPL": [
                {"t":"2024-01-02T05:00:00Z","o":187.15,"h":188.44,"l":183.89,"c":185.64,"v":82488674,"n":1009074,"vw":185.9}
            ]},
            "next_page_token": "QUFQTHxEfDIwMjQ="
        }"#;
        let page: AlpacaResponse = serde_json::from_str(body).unwrap();
        let mut bars = page.bars.unwrap();
        let bar: Bar = bars.swap_remove("AAPL").unwrap().remove(0).into();
        assert_eq!(bar.close, 185.64);
        assert_eq!(bar.volume, 82_488_674.0);
        assert_eq!(page.next_page_token.as_deref(), Some("QUFQTHxEfDIwMjQ="));
    }

    #[test]
    fn null_bars_means_empty_page() {
        let page: AlpacaResponse =
            serde_json::from_str(r#"{"bars": null, "next_page_token": null}"#).unwrap();
        assert!(page.bars.is_none());
        assert!(page.next_page_token.is_none());
    }
}
