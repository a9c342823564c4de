//! Validated, time-ordered bar series — the replay substrate.

use super::bar::{Bar, Field};
use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors detected while constructing a [`BarSeries`].
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("bar series is empty")]
    Empty,

    #[error("bar {index} at {timestamp} does not advance past its predecessor")]
    NonMonotonicTimestamp {
        index: usize,
        timestamp: NaiveDateTime,
    },

    #[error("bar {index} holds a non-finite {field:?} value")]
    IncompleteBar { index: usize, field: Field },
}

/// Immutable sequence of bars with strictly increasing timestamps.
///
/// Validation happens once, at construction; the replay loop and every
/// history query can then index freely without revalidating. Bars are
/// addressed by integer offset or looked up by timestamp.
#[derive(Debug, Clone)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate and wrap a bar vector.
    ///
    /// Fails on empty input, a timestamp that does not strictly increase,
    /// or any bar with a non-finite required column.
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        for (index, bar) in bars.iter().enumerate() {
            if let Some(field) = bar.incomplete_field() {
                return Err(SeriesError::IncompleteBar { index, field });
            }
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::NonMonotonicTimestamp {
                    index,
                    timestamp: bar.timestamp,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, offset: usize) -> Option<&Bar> {
        self.bars.get(offset)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Offset of the bar stamped exactly `timestamp`, if present.
    pub fn index_of(&self, timestamp: NaiveDateTime) -> Option<usize> {
        self.bars
            .binary_search_by(|bar| bar.timestamp.cmp(&timestamp))
            .ok()
    }

    /// The last `n` bars ending at offset `end`, inclusive.
    ///
    /// Clamped at the start of the series, so early offsets return fewer
    /// than `n` bars rather than failing.
    pub fn window(&self, end: usize, n: usize) -> &[Bar] {
        let start = (end + 1).saturating_sub(n);
        &self.bars[start..=end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar_at(minute: u32) -> Bar {
        let date = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();
        Bar {
            timestamp: date.and_hms_opt(9, minute, 0).unwrap(),
            date,
            open: 1.10,
            high: 1.11,
            low: 1.09,
            close: 1.105,
            bid_open: 1.0999,
            ask_open: 1.1001,
            bid_close: 1.1049,
            ask_close: 1.1051,
            volume: 100.0,
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(BarSeries::new(vec![]).unwrap_err(), SeriesError::Empty);
    }

    #[test]
    fn duplicate_timestamp_is_rejected() {
        let err = BarSeries::new(vec![bar_at(0), bar_at(0)]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonMonotonicTimestamp { index: 1, .. }
        ));
    }

    #[test]
    fn backwards_timestamp_is_rejected() {
        let err = BarSeries::new(vec![bar_at(5), bar_at(3)]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonMonotonicTimestamp { index: 1, .. }
        ));
    }

    #[test]
    fn incomplete_bar_names_field_and_index() {
        let mut bad = bar_at(1);
        bad.ask_close = f64::INFINITY;
        let err = BarSeries::new(vec![bar_at(0), bad]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::IncompleteBar {
                index: 1,
                field: Field::AskClose
            }
        );
    }

    #[test]
    fn index_of_finds_exact_timestamp() {
        let series = BarSeries::new(vec![bar_at(0), bar_at(1), bar_at(2)]).unwrap();
        let ts = NaiveDate::from_ymd_opt(2016, 3, 1)
            .unwrap()
            .and_hms_opt(9, 1, 0)
            .unwrap();
        assert_eq!(series.index_of(ts), Some(1));
        let off = NaiveDate::from_ymd_opt(2016, 3, 1)
            .unwrap()
            .and_hms_opt(9, 1, 30)
            .unwrap();
        assert_eq!(series.index_of(off), None);
    }

    #[test]
    fn window_is_inclusive_of_end() {
        let series = BarSeries::new((0..10).map(bar_at).collect()).unwrap();
        let w = series.window(5, 3);
        assert_eq!(w.len(), 3);
        assert_eq!(w[2].timestamp, series.bars()[5].timestamp);
    }

    #[test]
    fn window_clamps_at_series_start() {
        let series = BarSeries::new((0..10).map(bar_at).collect()).unwrap();
        assert_eq!(series.window(1, 5).len(), 2);
        assert_eq!(series.window(0, 5).len(), 1);
    }
}
