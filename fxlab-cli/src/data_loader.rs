//! CSV loading for bar and order series.
//!
//! Bar files carry one row per bar:
//! `date,time,open,high,low,close,bid_open,ask_open,bid_close,ask_close,volume`
//! with dates as `YYYY-MM-DD` and times as `HH:MM:SS`. The quote columns may
//! be omitted entirely when `quotes_from_close` is set, in which case every
//! quote is synthesized from the close; otherwise a missing quote is fatal.
//!
//! Order files (vectorized mode) carry `date,time,quantity` rows joined to
//! bars by exact timestamp.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use fxlab_core::{Bar, BarSeries, SeriesError};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("csv error in '{path}'")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("'{path}' row {row}: {message}")]
    BadRow {
        path: String,
        row: usize,
        message: String,
    },

    #[error("bar series rejected")]
    Series(#[from] SeriesError),
}

#[derive(Debug, Deserialize)]
struct BarRow {
    date: String,
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    bid_open: Option<f64>,
    #[serde(default)]
    ask_open: Option<f64>,
    #[serde(default)]
    bid_close: Option<f64>,
    #[serde(default)]
    ask_close: Option<f64>,
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct OrderRow {
    date: String,
    time: String,
    quantity: f64,
}

fn parse_timestamp(
    date: &str,
    time: &str,
    path: &str,
    row: usize,
) -> Result<(NaiveDate, NaiveDateTime), LoadError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| LoadError::BadRow {
        path: path.to_string(),
        row,
        message: format!("bad date '{date}': {e}"),
    })?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S").map_err(|e| LoadError::BadRow {
        path: path.to_string(),
        row,
        message: format!("bad time '{time}': {e}"),
    })?;
    Ok((date, date.and_time(time)))
}

/// Load a validated bar series from CSV.
pub fn load_bars(path: &Path, quotes_from_close: bool) -> Result<BarSeries, LoadError> {
    let display = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Csv {
        path: display.clone(),
        source,
    })?;

    let mut bars = Vec::new();
    for (i, record) in reader.deserialize::<BarRow>().enumerate() {
        let row = i + 2; // 1-based, after the header
        let raw = record.map_err(|source| LoadError::Csv {
            path: display.clone(),
            source,
        })?;
        let (date, timestamp) = parse_timestamp(&raw.date, &raw.time, &display, row)?;

        let quote = |column: &str, value: Option<f64>| -> Result<f64, LoadError> {
            match value {
                Some(v) => Ok(v),
                None if quotes_from_close => Ok(raw.close),
                None => Err(LoadError::BadRow {
                    path: display.clone(),
                    row,
                    message: format!(
                        "missing {column} (pass --quotes-from-close to derive quotes)"
                    ),
                }),
            }
        };

        bars.push(Bar {
            timestamp,
            date,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            bid_open: quote("bid_open", raw.bid_open)?,
            ask_open: quote("ask_open", raw.ask_open)?,
            bid_close: quote("bid_close", raw.bid_close)?,
            ask_close: quote("ask_close", raw.ask_close)?,
            volume: raw.volume,
        });
    }

    Ok(BarSeries::new(bars)?)
}

/// Load a per-bar order quantity series aligned to an existing bar series.
/// Bars without an order row get quantity 0.
pub fn load_orders(path: &Path, series: &BarSeries) -> Result<Vec<f64>, LoadError> {
    let display = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Csv {
        path: display.clone(),
        source,
    })?;

    let mut orders = vec![0.0; series.len()];
    for (i, record) in reader.deserialize::<OrderRow>().enumerate() {
        let row = i + 2;
        let raw = record.map_err(|source| LoadError::Csv {
            path: display.clone(),
            source,
        })?;
        let (_, timestamp) = parse_timestamp(&raw.date, &raw.time, &display, row)?;
        let tick = series
            .index_of(timestamp)
            .ok_or_else(|| LoadError::BadRow {
                path: display.clone(),
                row,
                message: format!("no bar at {timestamp}"),
            })?;
        orders[tick] += raw.quantity;
    }
    Ok(orders)
}
