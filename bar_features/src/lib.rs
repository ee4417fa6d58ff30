//! Daily feature table: an instrument's bar history joined by calendar date
//! with a benchmark index and enriched with rolling-window features.
//!
//! The flow is fetch (two [`DataProvider`](market_data_ingestor::providers::DataProvider)
//! calls joined together), [`filter`] by date, [`engine::derive_features`],
//! then [`table`] rendering. [`pipeline`] wires these together for the binary.

pub mod cli;
pub mod date_index;
pub mod engine;
pub mod features;
pub mod filter;
pub mod pipeline;
pub mod row;
pub mod table;

pub use engine::derive_features;
pub use row::{COLUMNS, EnrichedRow};
