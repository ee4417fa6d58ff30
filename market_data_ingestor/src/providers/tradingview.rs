//! TradingView chart-session provider.
//!
//! Speaks the chart websocket protocol anonymously, so only symbols that are
//! public without a login are reachable (e.g. `CSEMA:MASI`, `NASDAQ:AAPL`).

pub mod protocol;
pub mod provider;
pub mod session;

pub use provider::TradingViewProvider;
