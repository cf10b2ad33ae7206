use crate::config::{IndicatorConfig, SignalConfig};
use crate::indicators::IndicatorSet;
use crate::types::PriceSeries;

use super::SignalAccumulator;

/// Read-only inputs shared by every rule. A rule whose inputs are still in
/// warm-up (`None`) contributes nothing.
pub struct RuleContext<'a> {
    pub series: &'a PriceSeries,
    pub indicators: &'a IndicatorSet,
    pub ind_cfg: &'a IndicatorConfig,
    pub sig_cfg: &'a SignalConfig,
}

impl<'a> RuleContext<'a> {
    fn last_index(&self) -> usize {
        self.series.len() - 1
    }

    fn last_close(&self) -> f64 {
        self.series.bars[self.last_index()].close
    }

    /// The two largest SMA windows, conventionally 50 and 200, used for the
    /// cross rule.
    fn cross_windows(&self) -> Option<(usize, usize)> {
        let mut windows = self.ind_cfg.sma_windows.clone();
        windows.sort_unstable();
        windows.dedup();
        if windows.len() < 2 {
            return None;
        }
        Some((windows[windows.len() - 2], windows[windows.len() - 1]))
    }
}

/// Position of the last close within the series' high/low range.
pub fn week_range_position(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let high = ctx
        .series
        .highs()
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);
    let low = ctx.series.lows().into_iter().fold(f64::INFINITY, f64::min);
    if high <= low {
        return;
    }

    let position = (ctx.last_close() - low) / (high - low) * 100.0;
    if position > ctx.sig_cfg.range_high_pct {
        acc.observe("Near 52-week high, potential breakout");
    } else if position < ctx.sig_cfg.range_low_pct {
        acc.observe("Near 52-week low, at support levels");
    }
}

/// Golden/Death Cross over the last two points of the mid and long SMAs.
/// No signal when either value is still warming up.
pub fn golden_death_cross(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let idx = ctx.last_index();
    if idx == 0 {
        return;
    }
    let (mid, long) = match ctx.cross_windows() {
        Some(pair) => pair,
        None => return,
    };
    let mid_name = format!("SMA_{}", mid);
    let long_name = format!("SMA_{}", long);

    let values = (
        ctx.indicators.value_at(&mid_name, idx - 1),
        ctx.indicators.value_at(&long_name, idx - 1),
        ctx.indicators.value_at(&mid_name, idx),
        ctx.indicators.value_at(&long_name, idx),
    );
    let (prev_mid, prev_long, curr_mid, curr_long) = match values {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => return,
    };

    let prev_above = prev_mid > prev_long;
    let curr_above = curr_mid > curr_long;

    if !prev_above && curr_above {
        acc.buy("Golden Cross detected");
        acc.observe("Golden Cross bullish signal");
    } else if prev_above && !curr_above {
        acc.sell("Death Cross detected");
        acc.observe("Death Cross bearish signal");
    }
}

/// Strict ordering of close against the three SMAs, observation only.
pub fn ma_alignment(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let mut windows = ctx.ind_cfg.sma_windows.clone();
    windows.sort_unstable();
    windows.dedup();
    if windows.len() < 3 {
        return;
    }

    let idx = ctx.last_index();
    let mut values = Vec::with_capacity(3);
    for w in &windows[..3] {
        match ctx.indicators.value_at(&format!("SMA_{}", w), idx) {
            Some(v) => values.push(v),
            None => return,
        }
    }

    let close = ctx.last_close();
    if close > values[0] && values[0] > values[1] && values[1] > values[2] {
        acc.observe("Perfect bullish MA alignment");
    } else if close < values[0] && values[0] < values[1] && values[1] < values[2] {
        acc.observe("Perfect bearish MA alignment");
    }
}

pub fn rsi_level(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let rsi = match ctx.indicators.value_at("RSI", ctx.last_index()) {
        Some(v) => v,
        None => return,
    };

    if rsi > ctx.sig_cfg.rsi_overbought {
        acc.sell("RSI Overbought");
        acc.observe("RSI indicates overbought condition");
    } else if rsi < ctx.sig_cfg.rsi_oversold {
        acc.buy("RSI Oversold");
        acc.observe("RSI indicates oversold condition");
    } else {
        acc.observe("RSI in neutral zone");
    }
}

pub fn macd_crossover(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let idx = ctx.last_index();
    if idx == 0 {
        return;
    }

    let values = (
        ctx.indicators.value_at("MACD", idx - 1),
        ctx.indicators.value_at("MACD_Signal", idx - 1),
        ctx.indicators.value_at("MACD", idx),
        ctx.indicators.value_at("MACD_Signal", idx),
    );
    let (prev_macd, prev_signal, curr_macd, curr_signal) = match values {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => return,
    };

    if prev_macd <= prev_signal && curr_macd > curr_signal {
        acc.buy("MACD Bullish Crossover");
        acc.observe("MACD shows bullish crossover");
    } else if prev_macd >= prev_signal && curr_macd < curr_signal {
        acc.sell("MACD Bearish Crossover");
        acc.observe("MACD shows bearish crossover");
    } else if curr_macd > curr_signal {
        acc.observe("MACD trend bullish");
    } else {
        acc.observe("MACD trend bearish");
    }
}

pub fn stochastic_level(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let idx = ctx.last_index();
    let (k, d) = match (
        ctx.indicators.value_at("Stoch_K", idx),
        ctx.indicators.value_at("Stoch_D", idx),
    ) {
        (Some(k), Some(d)) => (k, d),
        _ => return,
    };

    if k > ctx.sig_cfg.stoch_overbought && d > ctx.sig_cfg.stoch_overbought {
        acc.sell("Stochastic Overbought");
    } else if k < ctx.sig_cfg.stoch_oversold && d < ctx.sig_cfg.stoch_oversold {
        acc.buy("Stochastic Oversold");
    }
}

pub fn bollinger_position(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let idx = ctx.last_index();
    let (upper, lower) = match (
        ctx.indicators.value_at("BB_Upper", idx),
        ctx.indicators.value_at("BB_Lower", idx),
    ) {
        (Some(u), Some(l)) => (u, l),
        _ => return,
    };

    let close = ctx.last_close();
    if close > upper {
        acc.observe("Price above Bollinger upper band");
    } else if close < lower {
        acc.buy("Price below Bollinger lower band");
        acc.observe("Price below Bollinger lower band");
    } else {
        // Collapsed bands carry no position information; report midpoint.
        let position = if upper > lower {
            (close - lower) / (upper - lower) * 100.0
        } else {
            50.0
        };
        acc.observe(format!("Price within Bollinger bands ({:.1}% position)", position));
    }
}

pub fn atr_volatility(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let atr = match ctx.indicators.value_at("ATR", ctx.last_index()) {
        Some(v) => v,
        None => return,
    };

    let ratio = atr / ctx.last_close();
    if ratio > ctx.sig_cfg.atr_high_ratio {
        acc.observe("High volatility environment");
    } else if ratio < ctx.sig_cfg.atr_low_ratio {
        acc.observe("Low volatility consolidation");
    }
}

pub fn volume_interest(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let idx = ctx.last_index();
    let average = match ctx.indicators.value_at("Volume_MA", idx) {
        Some(v) if v > 0.0 => v,
        _ => return,
    };

    let ratio = ctx.series.bars[idx].volume / average;
    if ratio > ctx.sig_cfg.volume_high_ratio {
        acc.observe("High trading volume indicates strong interest");
    } else if ratio < ctx.sig_cfg.volume_low_ratio {
        acc.observe("Low volume suggests weak participation");
    }
}

pub fn vwap_position(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let vwap = match ctx.indicators.value_at("VWAP", ctx.last_index()) {
        Some(v) => v,
        None => return,
    };

    if ctx.last_close() > vwap {
        acc.observe("Price trading above VWAP");
    } else {
        acc.observe("Price trading below VWAP");
    }
}

/// OBV/price divergence over the configured lookback. Directions agreeing
/// confirm the move; price and OBV disagreeing is the reversal warning.
pub fn obv_divergence(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    let idx = ctx.last_index();
    let lookback = ctx.ind_cfg.divergence_lookback;

    let past_idx = if idx >= lookback { idx - lookback } else { idx };

    let (obv_now, obv_past) = match (
        ctx.indicators.value_at("OBV", idx),
        ctx.indicators.value_at("OBV", past_idx),
    ) {
        (Some(now), Some(past)) => (now, past),
        _ => return,
    };

    let close_now = ctx.last_close();
    let close_past = ctx.series.bars[past_idx].close;

    let price_rising = close_now > close_past;
    let obv_rising = obv_now > obv_past;

    match (price_rising, obv_rising) {
        (true, true) => acc.observe("OBV confirms bullish price momentum"),
        (false, false) => acc.observe("OBV confirms bearish price momentum"),
        (true, false) => {
            acc.sell("OBV bearish divergence");
            acc.observe("OBV shows bearish divergence");
        }
        (false, true) => {
            acc.buy("OBV bullish divergence");
            acc.observe("OBV shows bullish divergence");
        }
    }
}

/// Trade-count liquidity, only when the feed reports trade counts.
pub fn liquidity(ctx: &RuleContext, acc: &mut SignalAccumulator) {
    if !ctx.series.has_trade_counts() {
        return;
    }

    let window = ctx.ind_cfg.volume_ma_window;
    let counts: Vec<f64> = ctx
        .series
        .trade_counts()
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
    if counts.len() < window {
        return;
    }

    let current = counts[counts.len() - 1];
    let average: f64 = counts[counts.len() - window..].iter().sum::<f64>() / window as f64;
    let ratio = if average > 0.0 { current / average } else { 1.0 };

    if ratio > ctx.sig_cfg.liquidity_high_ratio {
        acc.observe("High liquidity with increased trading activity");
    } else if ratio < ctx.sig_cfg.liquidity_low_ratio {
        acc.observe("Lower liquidity with reduced trading activity");
    }
}
