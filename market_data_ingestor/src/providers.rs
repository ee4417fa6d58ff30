//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, the unified interface for
//! fetching one symbol's bar history from a market data vendor.
//!
//! Concrete providers:
//! - [`tradingview::TradingViewProvider`]: TradingView chart websocket, no credentials.
//! - [`alpaca_rest::provider::AlpacaProvider`]: Alpaca REST API for US equities.
//!
//! The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
//! for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{bar::BarSeries, request_params::BarsRequest};
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     fn name(&self) -> &'static str {
//!         "mine"
//!     }
//!
//!     async fn fetch_bars(&self, request: &BarsRequest) -> Result<BarSeries, ProviderError> {
//!         Ok(BarSeries::new(request.symbol.clone(), request.timeframe, vec![]))
//!     }
//! }
//! ```

pub mod alpaca_rest;
pub mod tradingview;

use async_trait::async_trait;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::BarSeries, request_params::BarsRequest};

/// Trait for fetching time-series bar data from a market data provider.
///
/// Implementations must return the series sorted oldest-first.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Fetches the bar history described by `request`.
    ///
    /// # Returns
    ///
    /// * `Ok(BarSeries)` - The bars for `request.symbol`, oldest first.
    /// * `Err(ProviderError)` - If the request fails. Nothing is retried.
    async fn fetch_bars(&self, request: &BarsRequest) -> Result<BarSeries, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An HTTP request failed (network failure, bad body).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The websocket connection failed or was torn down mid-stream.
    #[snafu(display("WebSocket error: {source}"))]
    WebSocket {
        source: tokio_tungstenite::tungstenite::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error message (unknown symbol, bad key, ...).
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// A payload could not be decoded.
    #[snafu(display("Failed to decode provider payload: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::models::{bar::Bar, request_params::DEFAULT_RANGE, timeframe::TimeFrame};

    struct FixedProvider;
    struct FailingProvider;

    #[async_trait]
    impl DataProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch_bars(&self, request: &BarsRequest) -> Result<BarSeries, ProviderError> {
            let bar = Bar {
                open_time: request.start,
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 10.0,
            };
            Ok(BarSeries::new(request.symbol.clone(), request.timeframe, vec![bar]))
        }
    }

    #[async_trait]
    impl DataProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch_bars(&self, request: &BarsRequest) -> Result<BarSeries, ProviderError> {
            ApiSnafu {
                message: format!("unknown symbol {}", request.symbol),
            }
            .fail()
        }
    }

    // Decides at runtime which provider to hand back, hence `Box<dyn DataProvider>`.
    fn get_provider(name: &str) -> Box<dyn DataProvider> {
        if name == "fixed" {
            Box::new(FixedProvider)
        } else {
            Box::new(FailingProvider)
        }
    }

    fn request(symbol: &str) -> BarsRequest {
        BarsRequest {
            symbol: symbol.to_string(),
            timeframe: TimeFrame::day(),
            range: DEFAULT_RANGE,
            start: Utc::now(),
            end: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_dynamic_provider() {
        let provider = get_provider("fixed");
        let series = provider.fetch_bars(&request("CSEMA:BCP")).await.unwrap();
        assert_eq!(series.symbol, "CSEMA:BCP");
        assert_eq!(series.len(), 1);
    }

    #[tokio::test]
    async fn test_api_error_display() {
        let provider = get_provider("failing");
        let err = provider.fetch_bars(&request("NOPE")).await.unwrap_err();
        assert_eq!(err.to_string(), "API error: unknown symbol NOPE");
    }
}
