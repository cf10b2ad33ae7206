use crate::config::AppConfig;
use crate::indicators::IndicatorSet;
use crate::types::{AnalysisSummary, Direction, PriceSeries};

use super::rules::{self, RuleContext};
use super::SignalAccumulator;

/// Runs every rule category in a fixed order so the emitted signal and
/// observation lists are reproducible run to run:
/// trend -> MA cross -> momentum (RSI) -> MACD cross -> stochastic ->
/// Bollinger -> volatility -> volume -> VWAP -> OBV divergence -> liquidity.
pub struct SignalEngine;

impl SignalEngine {
    pub fn evaluate(
        series: &PriceSeries,
        indicators: &IndicatorSet,
        cfg: &AppConfig,
    ) -> AnalysisSummary {
        let mut acc = SignalAccumulator::new();

        if series.is_empty() {
            return acc.into_summary(vec![]);
        }

        let ctx = RuleContext {
            series,
            indicators,
            ind_cfg: &cfg.indicators,
            sig_cfg: &cfg.signals,
        };

        rules::week_range_position(&ctx, &mut acc);
        rules::golden_death_cross(&ctx, &mut acc);
        rules::ma_alignment(&ctx, &mut acc);
        rules::rsi_level(&ctx, &mut acc);
        rules::macd_crossover(&ctx, &mut acc);
        rules::stochastic_level(&ctx, &mut acc);
        rules::bollinger_position(&ctx, &mut acc);
        rules::atr_volatility(&ctx, &mut acc);
        rules::volume_interest(&ctx, &mut acc);
        rules::vwap_position(&ctx, &mut acc);
        rules::obv_divergence(&ctx, &mut acc);
        rules::liquidity(&ctx, &mut acc);

        let risk_factors = Self::risk_factors(&ctx, &acc);
        acc.into_summary(risk_factors)
    }

    fn risk_factors(ctx: &RuleContext, acc: &SignalAccumulator) -> Vec<String> {
        let mut risks = Vec::new();
        let idx = ctx.series.len() - 1;
        let close = ctx.series.bars[idx].close;

        if let Some(rsi) = ctx.indicators.value_at("RSI", idx) {
            if rsi > ctx.sig_cfg.rsi_overbought {
                risks.push("High RSI indicates overbought conditions".to_string());
            }
        }

        if let Some(atr) = ctx.indicators.value_at("ATR", idx) {
            if atr / close > ctx.sig_cfg.atr_high_ratio {
                risks.push("High volatility increases trading risk".to_string());
            }
        }

        if acc
            .signals()
            .iter()
            .any(|s| s.direction == Direction::Sell)
        {
            risks.push("Multiple sell signals detected".to_string());
        }

        risks
    }
}
