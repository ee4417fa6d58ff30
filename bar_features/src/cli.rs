//! Command-line and environment configuration of the `bar-features` binary.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use market_data_ingestor::models::request_params::DEFAULT_RANGE;
use market_data_ingestor::models::timeframe::TimeFrame;
use market_data_ingestor::providers::alpaca_rest::AlpacaProvider;
use market_data_ingestor::providers::tradingview::TradingViewProvider;
use market_data_ingestor::providers::{DataProvider, ProviderInitError};

use crate::filter::{DateRange, DateRangeError};
use crate::pipeline::PipelineConfig;

/// Which market-data feed to read bars from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// TradingView chart websocket.
    Tradingview,
    /// Alpaca market-data REST API (needs APCA_API_KEY_ID / APCA_API_SECRET_KEY).
    Alpaca,
}

impl ProviderKind {
    pub fn build(self) -> Result<Box<dyn DataProvider>, ProviderInitError> {
        Ok(match self {
            ProviderKind::Tradingview => Box::new(TradingViewProvider::new()),
            ProviderKind::Alpaca => Box::new(AlpacaProvider::new()?),
        })
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Build a daily feature table for an instrument and its benchmark")]
pub struct Cli {
    /// Instrument symbol (e.g. "CSEMA:MASI", "NASDAQ:AAPL")
    #[arg(long, env = "SYMBOL", default_value = "CSEMA:MASI")]
    pub symbol: String,

    /// Benchmark index joined onto the instrument by date
    #[arg(long, env = "MASI_SYMBOL", default_value = "CSEMA:MASI")]
    pub benchmark: String,

    /// First date kept, YYYY-MM-DD (inclusive)
    #[arg(long, env = "START", default_value = "1900-04-04")]
    pub start: NaiveDate,

    /// Last date kept, YYYY-MM-DD (inclusive)
    #[arg(long, env = "END", default_value = "2025-09-30")]
    pub end: NaiveDate,

    /// Output CSV path
    #[arg(long, env = "OUT", default_value = "moroccan_stock_analysis.csv")]
    pub out: PathBuf,

    /// Verbose diagnostics on stderr
    #[arg(long, env = "DEBUG", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub debug: bool,

    #[arg(long, env = "PROVIDER", value_enum, default_value_t = ProviderKind::Tradingview)]
    pub provider: ProviderKind,

    /// Bar interval: 5m, 3h, 1D, 1W, 1M
    #[arg(long, env = "TIMEFRAME", default_value = "1D")]
    pub timeframe: TimeFrame,

    /// Number of most recent bars requested
    #[arg(long, env = "RANGE", default_value_t = DEFAULT_RANGE)]
    pub range: u32,
}

impl Cli {
    pub fn pipeline_config(&self) -> Result<PipelineConfig, DateRangeError> {
        Ok(PipelineConfig {
            symbol: self.symbol.clone(),
            benchmark: self.benchmark.clone(),
            range: DateRange::new(self.start, self.end)?,
            timeframe: self.timeframe,
            bar_range: self.range,
            output: self.out.clone(),
        })
    }
}
