pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

use crate::config::IndicatorConfig;
use crate::types::PriceSeries;

pub use momentum::{rsi, stochastic};
pub use trend::{bollinger, ema, macd, sma};
pub use volatility::atr;
pub use volume::{obv, volume_ma, vwap};

/// Named indicator columns aligned 1:1 with a price series. Insertion order
/// is preserved so report output is reproducible. `None` marks warm-up
/// positions.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        let name = name.into();
        debug_assert!(
            !self.columns.iter().any(|(n, _)| *n == name),
            "duplicate indicator column {}",
            name
        );
        self.columns.push((name, values));
    }

    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Value of a column at an index; `None` for unknown columns, out of
    /// range positions and warm-up gaps alike. Signal rules use this and
    /// skip on `None`.
    pub fn value_at(&self, name: &str, index: usize) -> Option<f64> {
        self.get(name).and_then(|col| col.get(index).copied().flatten())
    }

    pub fn last(&self, name: &str) -> Option<f64> {
        let col = self.get(name)?;
        self.value_at(name, col.len().checked_sub(1)?)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Computes the full indicator battery over a cleaned series. Column
/// appends only; the series itself is never touched. Shorter series simply
/// yield `None` before each indicator's lookback is satisfied.
pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn compute(series: &PriceSeries, cfg: &IndicatorConfig) -> IndicatorSet {
        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();
        let volumes = series.volumes();

        let mut set = IndicatorSet::new();

        for &window in &cfg.sma_windows {
            set.insert(format!("SMA_{}", window), sma(&closes, window));
        }
        set.insert(format!("EMA_{}", cfg.ema_window), ema(&closes, cfg.ema_window));

        set.insert("RSI", rsi(&closes, cfg.rsi_window));

        let (macd_line, macd_signal, macd_hist) =
            macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal);
        set.insert("MACD", macd_line);
        set.insert("MACD_Signal", macd_signal);
        set.insert("MACD_Histogram", macd_hist);

        let (stoch_k, stoch_d) =
            stochastic(&highs, &lows, &closes, cfg.stoch_k_window, cfg.stoch_d_window);
        set.insert("Stoch_K", stoch_k);
        set.insert("Stoch_D", stoch_d);

        let (bb_upper, bb_middle, bb_lower) =
            bollinger(&closes, cfg.bb_window, cfg.bb_dev);
        set.insert("BB_Upper", bb_upper);
        set.insert("BB_Middle", bb_middle);
        set.insert("BB_Lower", bb_lower);

        set.insert("ATR", atr(&highs, &lows, &closes, cfg.atr_window));

        set.insert("OBV", obv(&closes, &volumes));

        let supplied = if series.has_supplied_vwap() {
            Some(series.supplied_vwap())
        } else {
            None
        };
        set.insert(
            "VWAP",
            vwap(&highs, &lows, &closes, &volumes, supplied.as_deref()),
        );

        set.insert("Volume_MA", volume_ma(&volumes, cfg.volume_ma_window));

        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceBar;
    use chrono::NaiveDate;

    fn series(n: usize) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1;
                PriceBar {
                    date: base + chrono::Duration::days(i as i64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000.0 + (i % 7) as f64 * 100.0,
                    trades: None,
                    vwap: None,
                }
            })
            .collect();
        PriceSeries::new(bars)
    }

    #[test]
    fn test_engine_emits_full_battery() {
        let cfg = IndicatorConfig::default();
        let set = IndicatorEngine::compute(&series(250), &cfg);

        for name in [
            "SMA_20",
            "SMA_50",
            "SMA_200",
            "EMA_20",
            "RSI",
            "MACD",
            "MACD_Signal",
            "MACD_Histogram",
            "Stoch_K",
            "Stoch_D",
            "BB_Upper",
            "BB_Middle",
            "BB_Lower",
            "ATR",
            "OBV",
            "VWAP",
            "Volume_MA",
        ] {
            let col = set.get(name).unwrap_or_else(|| panic!("missing {}", name));
            assert_eq!(col.len(), 250, "column {} misaligned", name);
        }
    }

    #[test]
    fn test_engine_warmup_null_counts() {
        let cfg = IndicatorConfig::default();
        let set = IndicatorEngine::compute(&series(250), &cfg);

        let first_some = |name: &str| {
            set.get(name)
                .unwrap()
                .iter()
                .position(|v| v.is_some())
                .unwrap()
        };

        assert_eq!(first_some("SMA_20"), 19);
        assert_eq!(first_some("SMA_50"), 49);
        assert_eq!(first_some("SMA_200"), 199);
        assert_eq!(first_some("EMA_20"), 19);
        assert_eq!(first_some("RSI"), 14);
        assert_eq!(first_some("MACD"), 25);
        assert_eq!(first_some("MACD_Signal"), 33);
        assert_eq!(first_some("Stoch_K"), 13);
        assert_eq!(first_some("Stoch_D"), 15);
        assert_eq!(first_some("BB_Upper"), 19);
        assert_eq!(first_some("ATR"), 13);
        assert_eq!(first_some("OBV"), 0);
        assert_eq!(first_some("VWAP"), 0);
        assert_eq!(first_some("Volume_MA"), 19);
    }

    #[test]
    fn test_short_series_yields_nulls_not_errors() {
        let cfg = IndicatorConfig::default();
        let set = IndicatorEngine::compute(&series(10), &cfg);
        assert!(set.get("SMA_200").unwrap().iter().all(|v| v.is_none()));
        assert!(set.get("RSI").unwrap().iter().all(|v| v.is_none()));
        assert!(set.last("OBV").is_some());
    }

    #[test]
    fn test_supplied_vwap_is_preferred() {
        let cfg = IndicatorConfig::default();
        let mut s = series(5);
        for (i, bar) in s.bars.iter_mut().enumerate() {
            bar.vwap = Some(500.0 + i as f64);
        }

        let set = IndicatorEngine::compute(&s, &cfg);
        assert_eq!(set.value_at("VWAP", 0), Some(500.0));
        assert_eq!(set.last("VWAP"), Some(504.0));
    }

    #[test]
    fn test_value_at_unknown_column_is_none() {
        let set = IndicatorSet::new();
        assert_eq!(set.value_at("nope", 0), None);
    }
}
