//! Serializable run configuration (TOML).

use fxlab_core::{BollingerReversion, EngineConfig, RunConfig, StrategyParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level TOML config for one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    #[serde(default)]
    pub strategy: StrategySection,
}

/// Engine-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestSection {
    pub symbol: String,
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
    #[serde(default = "default_commission")]
    pub commission: f64,
    #[serde(default = "default_warmup_bars")]
    pub warmup_bars: usize,
    #[serde(default = "default_cooldown_bars")]
    pub cooldown_bars: usize,
}

/// Bollinger strategy parameters; every field falls back to the shipped
/// defaults so a config may specify only what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategySection {
    pub window: usize,
    pub entry_std: f64,
    pub exit_std: f64,
    pub margin: f64,
    pub stop_loss: f64,
    pub quantity: f64,
}

fn default_initial_cash() -> f64 {
    1_000_000.0
}

fn default_commission() -> f64 {
    2e-5
}

fn default_warmup_bars() -> usize {
    200
}

fn default_cooldown_bars() -> usize {
    100
}

impl Default for StrategySection {
    fn default() -> Self {
        let s = BollingerReversion::default();
        Self {
            window: s.window,
            entry_std: s.entry_std,
            exit_std: s.exit_std,
            margin: s.margin,
            stop_loss: s.stop_loss,
            quantity: s.quantity,
        }
    }
}

impl BacktestConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            initial_cash: self.backtest.initial_cash,
            commission: self.backtest.commission,
            warmup_bars: self.backtest.warmup_bars,
            cooldown_bars: self.backtest.cooldown_bars,
        }
    }

    pub fn strategy(&self) -> BollingerReversion {
        BollingerReversion {
            window: self.strategy.window,
            entry_std: self.strategy.entry_std,
            exit_std: self.strategy.exit_std,
            margin: self.strategy.margin,
            stop_loss: self.strategy.stop_loss,
            quantity: self.strategy.quantity,
        }
    }

    /// Fingerprintable identity of this run over a concrete date range.
    pub fn run_config(&self, start: chrono::NaiveDate, end: chrono::NaiveDate) -> RunConfig {
        let mut params = BTreeMap::new();
        params.insert("window".to_string(), self.strategy.window as f64);
        params.insert("entry_std".to_string(), self.strategy.entry_std);
        params.insert("exit_std".to_string(), self.strategy.exit_std);
        params.insert("margin".to_string(), self.strategy.margin);
        params.insert("stop_loss".to_string(), self.strategy.stop_loss);
        params.insert("quantity".to_string(), self.strategy.quantity);
        RunConfig {
            symbol: self.backtest.symbol.clone(),
            start,
            end,
            initial_cash: self.backtest.initial_cash,
            commission: self.backtest.commission,
            warmup_bars: self.backtest.warmup_bars,
            cooldown_bars: self.backtest.cooldown_bars,
            strategy: StrategyParams {
                name: "bollinger_reversion".to_string(),
                params,
            },
        }
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            backtest: BacktestSection {
                symbol: "EURUSD".to_string(),
                initial_cash: default_initial_cash(),
                commission: default_commission(),
                warmup_bars: default_warmup_bars(),
                cooldown_bars: default_cooldown_bars(),
            },
            strategy: StrategySection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_defaults() {
        let config = BacktestConfig::from_toml(
            r#"
[backtest]
symbol = "EURUSD"
"#,
        )
        .unwrap();
        assert_eq!(config.backtest.initial_cash, 1_000_000.0);
        assert_eq!(config.backtest.commission, 2e-5);
        assert_eq!(config.backtest.warmup_bars, 200);
        assert_eq!(config.backtest.cooldown_bars, 100);
        assert_eq!(config.strategy.window, 20);
    }

    #[test]
    fn overrides_are_honored() {
        let config = BacktestConfig::from_toml(
            r#"
[backtest]
symbol = "GBPUSD"
commission = 0.0
warmup_bars = 50

[strategy]
window = 30
stop_loss = 0.001
"#,
        )
        .unwrap();
        assert_eq!(config.backtest.symbol, "GBPUSD");
        assert_eq!(config.backtest.commission, 0.0);
        assert_eq!(config.engine_config().warmup_bars, 50);
        assert_eq!(config.strategy().window, 30);
        assert_eq!(config.strategy().stop_loss, 0.001);
        // Untouched fields keep their defaults.
        assert_eq!(config.strategy().entry_std, 2.0);
    }

    #[test]
    fn run_config_round_trips_the_parameters() {
        let config = BacktestConfig::default();
        let start = chrono::NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        let end = chrono::NaiveDate::from_ymd_opt(2016, 6, 1).unwrap();
        let rc = config.run_config(start, end);
        assert_eq!(rc.strategy.params["window"], 20.0);
        assert_eq!(rc.run_id().len(), 64);
    }
}
