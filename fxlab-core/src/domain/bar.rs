//! Bar — the fundamental market data unit.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One sampled interval of quotes for a single instrument.
///
/// Carries the traded OHLC columns plus the bid/ask quotes at the interval's
/// open and close. The `date` column is the calendar day used for daily
/// aggregation; `timestamp` is the bar's position on the intraday clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub bid_open: f64,
    pub ask_open: f64,
    pub bid_close: f64,
    pub ask_close: f64,
    pub volume: f64,
}

/// Named numeric columns of a [`Bar`], for field-keyed history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    BidOpen,
    AskOpen,
    BidClose,
    AskClose,
    Volume,
}

impl Field {
    /// All fields a bar is required to carry, in column order.
    pub const ALL: [Field; 9] = [
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::BidOpen,
        Field::AskOpen,
        Field::BidClose,
        Field::AskClose,
        Field::Volume,
    ];
}

impl Bar {
    /// Value of a named column.
    pub fn field(&self, field: Field) -> f64 {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::BidOpen => self.bid_open,
            Field::AskOpen => self.ask_open,
            Field::BidClose => self.bid_close,
            Field::AskClose => self.ask_close,
            Field::Volume => self.volume,
        }
    }

    /// First column holding a non-finite value, if any.
    pub fn incomplete_field(&self) -> Option<Field> {
        Field::ALL.into_iter().find(|&f| !self.field(f).is_finite())
    }

    /// Returns true when every required column is finite.
    pub fn is_complete(&self) -> bool {
        self.incomplete_field().is_none()
    }
}
