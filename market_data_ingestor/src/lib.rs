//! Bar ingestion from third-party market data feeds.
//!
//! [`models`] holds the vendor-agnostic bar, timeframe and request types;
//! [`providers`] holds the [`DataProvider`](providers::DataProvider) trait and
//! its implementations.

pub mod models;
pub mod providers;
