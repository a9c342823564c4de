//! Artifact export: one directory per run id, holding the daily equity CSV
//! and a JSON summary.

use anyhow::Result;
use fxlab_core::{ReplayResult, RunConfig, Summary};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The JSON artifact saved next to the equity curve.
#[derive(Debug, Serialize)]
struct RunArtifact<'a> {
    run_id: String,
    config: &'a RunConfig,
    sharpe: f64,
    max_drawdown: f64,
    traded_day_count: usize,
    final_cash: f64,
    final_position: f64,
}

/// Write `equity.csv` and `summary.json` under `<output_dir>/<run_id>/`.
/// Returns the run directory.
pub fn save_artifacts(
    result: &ReplayResult,
    run_config: &RunConfig,
    output_dir: &Path,
) -> Result<PathBuf> {
    let run_id = run_config.run_id();
    let run_dir = output_dir.join(&run_id);
    std::fs::create_dir_all(&run_dir)?;

    write_equity_csv(&result.summary, &run_dir.join("equity.csv"))?;

    let artifact = RunArtifact {
        run_id,
        config: run_config,
        sharpe: result.summary.sharpe,
        max_drawdown: result.summary.max_drawdown,
        traded_day_count: result.summary.traded_day_count,
        final_cash: result.cash,
        final_position: result.position,
    };
    let json = serde_json::to_string_pretty(&artifact)?;
    std::fs::write(run_dir.join("summary.json"), json)?;

    Ok(run_dir)
}

fn write_equity_csv(summary: &Summary, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["date", "value", "pnl", "traded"])?;
    for (((date, value), pnl), traded) in summary
        .dates
        .iter()
        .zip(&summary.curve)
        .zip(&summary.pnl)
        .zip(&summary.trade_days)
    {
        writer.write_record([
            date.to_string(),
            value.to_string(),
            pnl.to_string(),
            (u8::from(*traded)).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fxlab_core::{StrategyParams, Summary};
    use std::collections::BTreeMap;

    fn sample_result() -> ReplayResult {
        let d1 = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2016, 3, 2).unwrap();
        ReplayResult {
            summary: Summary {
                dates: vec![d1, d2],
                curve: vec![1_000_000.0, 1_000_500.0],
                pnl: vec![0.0, 500.0],
                trade_days: vec![true, false],
                traded_day_count: 1,
                sharpe: 1.5,
                max_drawdown: 0.0,
            },
            equity: vec![1_000_000.0, 1_000_500.0],
            trade_flags: vec![true, false],
            cash: 995_000.0,
            position: 5_000.0,
            last_deal: 1.1,
            plots: vec![],
        }
    }

    fn sample_run_config() -> RunConfig {
        RunConfig {
            symbol: "EURUSD".into(),
            start: NaiveDate::from_ymd_opt(2016, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2016, 3, 2).unwrap(),
            initial_cash: 1_000_000.0,
            commission: 2e-5,
            warmup_bars: 0,
            cooldown_bars: 0,
            strategy: StrategyParams {
                name: "bollinger_reversion".into(),
                params: BTreeMap::new(),
            },
        }
    }

    #[test]
    fn artifacts_land_under_the_run_id() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(&sample_result(), &sample_run_config(), dir.path()).unwrap();
        assert_eq!(
            run_dir.file_name().unwrap().to_string_lossy(),
            sample_run_config().run_id()
        );
        assert!(run_dir.join("equity.csv").exists());
        assert!(run_dir.join("summary.json").exists());

        let equity = std::fs::read_to_string(run_dir.join("equity.csv")).unwrap();
        assert!(equity.starts_with("date,value,pnl,traded\n"));
        assert!(equity.contains("2016-03-02,1000500,500,0"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(run_dir.join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(json["traded_day_count"], 1);
        assert_eq!(json["config"]["symbol"], "EURUSD");
    }

    #[test]
    fn rerun_overwrites_the_same_directory() {
        let dir = tempfile::tempdir().unwrap();
        let first = save_artifacts(&sample_result(), &sample_run_config(), dir.path()).unwrap();
        let second = save_artifacts(&sample_result(), &sample_run_config(), dir.path()).unwrap();
        assert_eq!(first, second);
    }
}
