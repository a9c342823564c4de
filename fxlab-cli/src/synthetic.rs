//! Seeded synthetic bar generation.
//!
//! A deterministic random-walk tape with a fixed bid/ask spread, for smoke
//! runs and demos when no real data is at hand. The same seed always
//! produces the same tape. Sessions run minute bars from 09:00 through
//! 16:00 so the vectorized mode's end-of-day bar exists.

use chrono::{Duration, NaiveDate};
use fxlab_core::{Bar, BarSeries};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SESSION_START_HOUR: u32 = 9;
const SESSION_END_HOUR: u32 = 16;
const SPREAD: f64 = 0.0002;

/// Generate `count` synthetic minute bars starting at `start_date`.
pub fn generate_bars(count: usize, seed: u64, start_date: NaiveDate) -> BarSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut mid = 1.1000_f64;
    let mut date = start_date;
    let mut minute_of_session = 0u32;
    let minutes_per_session = (SESSION_END_HOUR - SESSION_START_HOUR) * 60 + 1;

    let bars = (0..count)
        .map(|_| {
            if minute_of_session >= minutes_per_session {
                minute_of_session = 0;
                date += Duration::days(1);
            }
            let timestamp = date
                .and_hms_opt(SESSION_START_HOUR, 0, 0)
                .expect("valid session start")
                + Duration::minutes(minute_of_session as i64);
            minute_of_session += 1;

            let open = mid;
            mid += rng.gen_range(-0.0005..0.0005);
            let close = mid;
            let high = open.max(close) + rng.gen_range(0.0..0.0003);
            let low = open.min(close) - rng.gen_range(0.0..0.0003);

            Bar {
                timestamp,
                date,
                open,
                high,
                low,
                close,
                bid_open: open - 0.5 * SPREAD,
                ask_open: open + 0.5 * SPREAD,
                bid_close: close - 0.5 * SPREAD,
                ask_close: close + 0.5 * SPREAD,
                volume: rng.gen_range(10.0..1_000.0),
            }
        })
        .collect();

    BarSeries::new(bars).expect("synthetic bars are valid by construction")
}
