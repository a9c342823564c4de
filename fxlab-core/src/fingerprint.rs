//! Run fingerprinting — deterministic identification of a backtest run.
//!
//! Two runs with identical configuration hash to the same id, so artifact
//! directories collide on purpose and results are reproducible by id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Strategy identity plus its parameters.
///
/// Uses `BTreeMap` for deterministic key ordering during serialization →
/// hashing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyParams {
    pub name: String,
    pub params: BTreeMap<String, f64>,
}

/// Everything that pins down a single run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub initial_cash: f64,
    pub commission: f64,
    pub warmup_bars: usize,
    pub cooldown_bars: usize,
    pub strategy: StrategyParams,
}

impl RunConfig {
    /// Content-addressable run id: BLAKE3 over the canonical JSON form.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("RunConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
