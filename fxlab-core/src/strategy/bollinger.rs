//! Bollinger-band reversion strategy.
//!
//! Entry: price leaves the entry band and comes back inside, landing within
//! a margin of the moving average, while the tape is not trending. Exit: a
//! touch of the opposite exit band. A stop closes any position whose
//! position-signed return breaches the loss threshold.

use super::Strategy;
use crate::domain::{Field, OrderKind};
use crate::engine::SimContext;
use crate::summary::{mean_f64, std_dev};

/// Strategy parameters. Band width is measured in standard deviations of
/// one-bar close differences, not of the closes themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerReversion {
    /// Rolling window for the moving average and deviation.
    pub window: usize,
    /// Entry band half-width in deviations.
    pub entry_std: f64,
    /// Exit band half-width in deviations.
    pub exit_std: f64,
    /// Entries only trigger within this absolute distance of the mean.
    pub margin: f64,
    /// Close the position once `price_change` falls below `-stop_loss`.
    pub stop_loss: f64,
    /// Order size for each entry.
    pub quantity: f64,
}

impl Default for BollingerReversion {
    fn default() -> Self {
        Self {
            window: 20,
            entry_std: 2.0,
            exit_std: 0.0,
            margin: 25e-5,
            stop_loss: 25e-5,
            quantity: 1_000_000.0,
        }
    }
}

/// Indicator state threaded through the run.
#[derive(Debug, Clone, Default)]
pub struct BollingerState {
    /// -1 while the close sits below the lower entry band, 1 above the
    /// upper band, 0 otherwise.
    is_out: i8,
    /// The last three `is_out` readings, oldest first.
    is_out_track: [i8; 3],
    /// Nonzero while three consecutive readings agree and the close has not
    /// crossed back over the mean.
    is_trending: i8,
}

impl Strategy for BollingerReversion {
    type State = BollingerState;

    fn initialize(&self, _ctx: &SimContext<'_>) -> BollingerState {
        BollingerState::default()
    }

    fn step(&self, state: &mut BollingerState, ctx: &mut SimContext<'_>) {
        let closes = ctx.history_values(Field::Close, self.window);
        if closes.len() < 2 {
            return;
        }
        let close = closes[closes.len() - 1];
        let moving_avg = mean_f64(&closes);
        let diffs: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
        let moving_std = std_dev(&diffs);

        let upper_entry = moving_avg + self.entry_std * moving_std;
        let lower_entry = moving_avg - self.entry_std * moving_std;
        let upper_exit = moving_avg + self.exit_std * moving_std;
        let lower_exit = moving_avg - self.exit_std * moving_std;
        let upper_margin = moving_avg + self.margin;
        let lower_margin = moving_avg - self.margin;

        if close < lower_entry {
            state.is_out = -1;
        }
        if close > upper_entry {
            state.is_out = 1;
        }
        state.is_out_track = [state.is_out_track[1], state.is_out_track[2], state.is_out];

        if state.is_out_track.iter().all(|&v| v == state.is_out_track[0]) {
            state.is_trending = state.is_out_track[0];
        }
        if state.is_trending == 1 && close < moving_avg {
            state.is_trending = 0;
        }
        if state.is_trending == -1 && close > moving_avg {
            state.is_trending = 0;
        }

        ctx.plot("upper_entry", upper_entry);
        ctx.plot("lower_entry", lower_entry);

        // Snapshot before any order this tick: a position opened below the
        // mean must not trip the exit band on its own entry bar.
        let position = ctx.position();

        // Entries only from flat.
        if position == 0.0 {
            if state.is_out == -1
                && lower_entry < close
                && close < lower_margin
                && state.is_trending == 0
            {
                ctx.order(self.quantity, OrderKind::Market, None);
                state.is_out = 0;
            }
            if state.is_out == 1
                && close < upper_entry
                && close > upper_margin
                && state.is_trending == 0
            {
                ctx.order(-self.quantity, OrderKind::Market, None);
                state.is_out = 0;
            }
        }

        // Exits at the opposite band, judged on the tick-start position.
        if position > 0.0 && close < lower_exit {
            ctx.order(-position, OrderKind::Market, None);
        }
        if position < 0.0 && close > upper_exit {
            ctx.order(-position, OrderKind::Market, None);
        }

        // Stop: close whatever is still open once the run goes against us.
        let open_position = ctx.position();
        if open_position != 0.0 && ctx.price_change() < -self.stop_loss {
            ctx.order(-open_position, OrderKind::Market, None);
        }
    }
}
