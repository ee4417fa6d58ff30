//! Rolling-window feature families.
//!
//! Each family is a pure function over a column slice that returns one
//! owned output vector with the same length as its input. Windows count
//! positions in the series, not calendar days.

pub mod correlation;
pub mod impact;
pub mod price_change;
pub mod volume;

pub use correlation::{CORRELATION_WINDOW, rolling_correlation};
pub use impact::{HIGH_VOLUME_THRESHOLD, high_volume_impact};
pub use price_change::{PRICE_CHANGE_LAGS, price_change};
pub use volume::{LONG_VOLUME_WINDOW, SHORT_VOLUME_WINDOW, trailing_mean};
