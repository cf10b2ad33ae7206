use serde::{Deserialize, Serialize};

use super::traits::ConfigSection;
use crate::error::{Result, StockLensError};

/// Window lengths for the indicator battery. Defaults are the standard
/// daily-chart parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub sma_windows: Vec<usize>,
    pub ema_window: usize,
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub stoch_k_window: usize,
    pub stoch_d_window: usize,
    pub bb_window: usize,
    pub bb_dev: f64,
    pub atr_window: usize,
    pub volume_ma_window: usize,
    /// Lookback for the OBV/price divergence comparison.
    pub divergence_lookback: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_windows: vec![20, 50, 200],
            ema_window: 20,
            rsi_window: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            stoch_k_window: 14,
            stoch_d_window: 3,
            bb_window: 20,
            bb_dev: 2.0,
            atr_window: 14,
            volume_ma_window: 20,
            divergence_lookback: 10,
        }
    }
}

impl ConfigSection for IndicatorConfig {
    fn validate(&self) -> Result<()> {
        if self.sma_windows.is_empty() {
            return Err(StockLensError::Configuration(
                "sma_windows must not be empty".to_string(),
            ));
        }

        let windows = [
            self.ema_window,
            self.rsi_window,
            self.macd_fast,
            self.macd_slow,
            self.macd_signal,
            self.stoch_k_window,
            self.stoch_d_window,
            self.bb_window,
            self.atr_window,
            self.volume_ma_window,
            self.divergence_lookback,
        ];
        if windows.iter().chain(self.sma_windows.iter()).any(|w| *w == 0) {
            return Err(StockLensError::Configuration(
                "indicator windows must be positive".to_string(),
            ));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(StockLensError::Configuration(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }

        if self.bb_dev <= 0.0 {
            return Err(StockLensError::Configuration(
                "bb_dev must be positive".to_string(),
            ));
        }

        // Sample standard deviation needs at least two points per window.
        if self.bb_window < 2 {
            return Err(StockLensError::Configuration(
                "bb_window must be at least 2".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(IndicatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_macd_order_enforced() {
        let cfg = IndicatorConfig {
            macd_fast: 26,
            macd_slow: 12,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_window_rejected() {
        let cfg = IndicatorConfig {
            rsi_window: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
