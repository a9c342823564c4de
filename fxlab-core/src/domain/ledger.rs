//! Account ledger: cash, signed position, and the per-tick mark series.

/// Cash/position bookkeeping for a single replay.
///
/// Fills are the only mutation path for cash, position, and the last-deal
/// price; the replay loop owns mark-to-market recording. Position at any
/// tick equals the running sum of filled signed quantities — pending orders
/// never touch the ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    cash: f64,
    position: f64,
    last_deal: f64,
    trade_flags: Vec<bool>,
    marks: Vec<f64>,
}

impl Ledger {
    /// Fresh ledger sized for `ticks` bars. Marks start as NaN and stay NaN
    /// for ticks the loop never touches until [`forward_fill_marks`] runs.
    ///
    /// [`forward_fill_marks`]: Ledger::forward_fill_marks
    pub fn new(initial_cash: f64, ticks: usize) -> Self {
        Self {
            cash: initial_cash,
            position: 0.0,
            last_deal: 0.0,
            trade_flags: vec![false; ticks],
            marks: vec![f64::NAN; ticks],
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Price of the most recent fill; 0.0 before the first deal.
    pub fn last_deal(&self) -> f64 {
        self.last_deal
    }

    /// Apply an executed fill.
    ///
    /// Buys (`quantity > 0`) pay `price * quantity * (1 + commission)`;
    /// sells receive `price * |quantity| * (1 - commission)`. The tick's
    /// trade flag is set; setting it again within the same tick is a no-op.
    pub fn apply_fill(&mut self, tick: usize, price: f64, quantity: f64, commission: f64) {
        self.position += quantity;
        self.last_deal = price;
        self.cash -= price * quantity * (1.0 + commission * quantity.signum());
        self.trade_flags[tick] = true;
    }

    /// Mark the tick's trade flag without any cash or position movement.
    pub fn flag_trade(&mut self, tick: usize) {
        self.trade_flags[tick] = true;
    }

    /// Record the mark-to-market value for a tick.
    pub fn mark(&mut self, tick: usize, value: f64) {
        self.marks[tick] = value;
    }

    pub fn marks(&self) -> &[f64] {
        &self.marks
    }

    pub fn trade_flags(&self) -> &[bool] {
        &self.trade_flags
    }

    /// Carry the last recorded mark forward over untouched ticks.
    /// Ticks before the first recorded mark remain NaN.
    pub fn forward_fill_marks(&mut self) {
        let mut last = f64::NAN;
        for mark in &mut self.marks {
            if mark.is_finite() {
                last = *mark;
            } else if last.is_finite() {
                *mark = last;
            }
        }
    }
}
