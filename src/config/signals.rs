use serde::{Deserialize, Serialize};

use super::traits::ConfigSection;
use crate::error::{Result, StockLensError};

/// Thresholds for the signal rules. Defaults mirror the conventional
/// overbought/oversold and volatility levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub stoch_overbought: f64,
    pub stoch_oversold: f64,
    /// ATR/close ratios marking high and low volatility.
    pub atr_high_ratio: f64,
    pub atr_low_ratio: f64,
    /// Current-to-average volume ratios marking strong and weak interest.
    pub volume_high_ratio: f64,
    pub volume_low_ratio: f64,
    /// Current-to-average trade-count ratios marking liquidity extremes.
    pub liquidity_high_ratio: f64,
    pub liquidity_low_ratio: f64,
    /// Position in the 52-week range (percent) marking the breakout and
    /// support zones.
    pub range_high_pct: f64,
    pub range_low_pct: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            stoch_overbought: 80.0,
            stoch_oversold: 20.0,
            atr_high_ratio: 0.03,
            atr_low_ratio: 0.01,
            volume_high_ratio: 2.0,
            volume_low_ratio: 0.5,
            liquidity_high_ratio: 1.5,
            liquidity_low_ratio: 0.7,
            range_high_pct: 80.0,
            range_low_pct: 20.0,
        }
    }
}

impl ConfigSection for SignalConfig {
    fn validate(&self) -> Result<()> {
        let ordered = [
            ("rsi", self.rsi_oversold, self.rsi_overbought),
            ("stochastic", self.stoch_oversold, self.stoch_overbought),
            ("atr", self.atr_low_ratio, self.atr_high_ratio),
            ("volume", self.volume_low_ratio, self.volume_high_ratio),
            ("liquidity", self.liquidity_low_ratio, self.liquidity_high_ratio),
            ("range", self.range_low_pct, self.range_high_pct),
        ];

        for (name, low, high) in ordered {
            if low >= high {
                return Err(StockLensError::Configuration(format!(
                    "{} thresholds out of order: low {} >= high {}",
                    name, low, high
                )));
            }
        }

        Ok(())
    }
}
