//! One run: fetch both series, filter, derive, write the table.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use market_data_ingestor::models::bar::{Bar, BarSeries};
use market_data_ingestor::models::request_params::BarsRequest;
use market_data_ingestor::models::timeframe::TimeFrame;
use market_data_ingestor::providers::{DataProvider, ProviderError};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{Level, debug, enabled, info};

use crate::engine::derive_features;
use crate::filter::DateRange;
use crate::row::{COLUMNS, EnrichedRow};
use crate::table::{TableError, render_table};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch bars for {symbol}")]
    Provider {
        symbol: String,
        #[source]
        source: ProviderError,
    },

    #[error("No candles returned for {symbol} (check symbol/dates).")]
    EmptySeries { symbol: String },

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render table")]
    Csv(#[from] TableError),

    #[error("failed to move finished table into {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Everything a run needs besides the provider.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub symbol: String,
    pub benchmark: String,
    pub range: DateRange,
    pub timeframe: TimeFrame,
    /// Number of most recent bars requested from count-paged providers.
    pub bar_range: u32,
    pub output: PathBuf,
}

impl PipelineConfig {
    fn request(&self, symbol: &str) -> BarsRequest {
        BarsRequest {
            symbol: symbol.to_string(),
            timeframe: self.timeframe,
            range: self.bar_range,
            start: self.range.start_instant(),
            end: self.range.end_instant(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub rows_with_benchmark: usize,
    pub output: PathBuf,
}

/// Fetches instrument and benchmark concurrently and writes the feature table
/// to `config.output`.
///
/// The first fetch error aborts the run. An instrument series that is empty
/// after date filtering is an error; an empty benchmark is not.
pub async fn run(config: &PipelineConfig, provider: &dyn DataProvider) -> Result<RunSummary, PipelineError> {
    info!(
        symbol = %config.symbol,
        benchmark = %config.benchmark,
        provider = provider.name(),
        "fetching instrument and benchmark data"
    );

    let instrument_request = config.request(&config.symbol);
    let benchmark_request = config.request(&config.benchmark);
    let (mut instrument, mut benchmark) = tokio::try_join!(
        fetch(provider, &instrument_request),
        fetch(provider, &benchmark_request)
    )?;

    if enabled!(Level::DEBUG) {
        debug!(symbol = %instrument.symbol, bars = instrument.len(), first = ?first_dates(&instrument.bars, 3), "fetched");
        debug!(symbol = %benchmark.symbol, bars = benchmark.len(), first = ?first_dates(&benchmark.bars, 3), "fetched");
    }

    config.range.retain(&mut instrument);
    config.range.retain(&mut benchmark);
    if instrument.is_empty() {
        return Err(PipelineError::EmptySeries {
            symbol: config.symbol.clone(),
        });
    }

    let mut rows = derive_features(&instrument.bars, &benchmark.bars);
    rows.sort_by_key(|row| row.bar.open_time);

    let table = render_table(&COLUMNS, &rows)?;
    write_atomically(&config.output, table.as_bytes())?;

    let summary = summarize(&rows, &config.output).ok_or_else(|| PipelineError::EmptySeries {
        symbol: config.symbol.clone(),
    })?;
    if enabled!(Level::DEBUG) {
        log_benchmark_coverage(&rows, &benchmark, &summary);
    }
    Ok(summary)
}

async fn fetch(provider: &dyn DataProvider, request: &BarsRequest) -> Result<BarSeries, PipelineError> {
    provider
        .fetch_bars(request)
        .await
        .map_err(|source| PipelineError::Provider {
            symbol: request.symbol.clone(),
            source,
        })
}

fn summarize(rows: &[EnrichedRow], output: &Path) -> Option<RunSummary> {
    let (first, last) = (rows.first()?, rows.last()?);
    Some(RunSummary {
        rows: rows.len(),
        first_date: first.bar.calendar_date(),
        last_date: last.bar.calendar_date(),
        rows_with_benchmark: rows.iter().filter(|r| r.has_benchmark()).count(),
        output: output.to_path_buf(),
    })
}

/// Writes `content` next to `path` and renames it into place, so readers
/// never see a partial file.
pub fn write_atomically(path: &Path, content: &[u8]) -> Result<(), PipelineError> {
    let io_err = |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(content).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    file.persist(path).map_err(|source| PipelineError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn first_dates(bars: &[Bar], n: usize) -> Vec<NaiveDate> {
    bars.iter().take(n).map(Bar::calendar_date).collect()
}

fn log_benchmark_coverage(rows: &[EnrichedRow], benchmark: &BarSeries, summary: &RunSummary) {
    debug!(
        "rows with benchmark data: {}/{}",
        summary.rows_with_benchmark, summary.rows
    );
    match rows.iter().find(|r| r.has_benchmark()) {
        Some(row) => debug!(
            date = %row.bar.calendar_date(),
            close = row.bar.close,
            masi_open = ?row.masi_open,
            masi_close = ?row.masi_close,
            "sample joined row"
        ),
        None => {
            let instrument_dates: Vec<NaiveDate> = rows.iter().take(5).map(|r| r.bar.calendar_date()).collect();
            debug!(
                instrument = ?instrument_dates,
                benchmark = ?first_dates(&benchmark.bars, 5),
                "no row matched a benchmark date"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old").unwrap();

        write_atomically(&path, b"new,content\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new,content\n");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn atomic_write_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_atomically(&path, b"x").unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
        assert!(!path.exists());
    }
}
