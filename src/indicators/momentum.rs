use super::trend::sma_opt;

/// Wilder RSI. The seed average uses the first `window` day-over-day
/// changes, so the first value lands at index `window`; Wilder smoothing
/// runs from there.
///
/// Degenerate windows resolve to documented fallbacks instead of dividing
/// by zero: no average loss -> 100, no average gain -> 0 (the formula's own
/// limit), a fully flat window -> 50.
pub fn rsi(values: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "window must be positive");
    let mut out = vec![None; values.len()];
    if values.len() <= window {
        return out;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=window {
        let change = values[i] - values[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses += -change;
        }
    }

    let mut avg_gain = gains / window as f64;
    let mut avg_loss = losses / window as f64;
    out[window] = Some(rsi_from_averages(avg_gain, avg_loss));

    for i in (window + 1)..values.len() {
        let change = values[i] - values[i - 1];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        let period = window as f64;
        avg_gain = (avg_gain * (period - 1.0) + gain) / period;
        avg_loss = (avg_loss * (period - 1.0) + loss) / period;
        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            log::warn!("RSI window with no price movement, reporting neutral 50");
            return 50.0;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Stochastic oscillator. %K over `k_window` highs/lows, %D a simple moving
/// average of %K over `d_window`. A zero high-low range reports the neutral
/// midpoint 50 rather than dividing by zero.
pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_window: usize,
    d_window: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    assert!(k_window > 0 && d_window > 0, "windows must be positive");
    let len = closes.len();
    let mut k = vec![None; len];

    for i in (k_window - 1)..len {
        let window_low = lows[i + 1 - k_window..=i]
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        let window_high = highs[i + 1 - k_window..=i]
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);

        let range = window_high - window_low;
        if range == 0.0 {
            log::warn!("Stochastic window with zero range, reporting neutral 50");
            k[i] = Some(50.0);
        } else {
            k[i] = Some((closes[i] - window_low) / range * 100.0);
        }
    }

    let d = sma_opt(&k, d_window);
    (k, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_warmup() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&values, 14);
        assert!(result[..14].iter().all(|v| v.is_none()));
        assert!(result[14].is_some());
    }

    #[test]
    fn test_rsi_monotonic_rise_approaches_100() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 2.0).collect();
        let result = rsi(&values, 14);

        let last = result.last().unwrap().unwrap();
        assert_eq!(last, 100.0);
        for v in result.iter().flatten() {
            assert!(*v >= 0.0 && *v <= 100.0, "RSI {} out of bounds", v);
        }
    }

    #[test]
    fn test_rsi_monotonic_fall_approaches_zero() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let result = rsi(&values, 14);
        assert_eq!(result.last().unwrap().unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_flat_series_is_neutral() {
        let values = [100.0; 20];
        let result = rsi(&values, 14);
        assert_eq!(result[14], Some(50.0));
    }

    #[test]
    fn test_rsi_bounds_on_mixed_series() {
        let values = [
            100.0, 105.0, 103.0, 108.0, 110.0, 107.0, 112.0, 115.0, 113.0, 118.0, 120.0, 122.0,
            119.0, 125.0, 123.0, 121.0, 126.0, 124.0, 128.0, 130.0,
        ];
        let result = rsi(&values, 14);
        for v in result.iter().flatten() {
            assert!(*v >= 0.0 && *v <= 100.0, "RSI {} out of bounds", v);
        }
    }

    #[test]
    fn test_stochastic_bounds_and_warmup() {
        let highs: Vec<f64> = (0..20).map(|i| 105.0 + i as f64).collect();
        let lows: Vec<f64> = (0..20).map(|i| 95.0 + i as f64).collect();
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();

        let (k, d) = stochastic(&highs, &lows, &closes, 14, 3);
        assert!(k[..13].iter().all(|v| v.is_none()));
        assert!(k[13].is_some());
        // %D needs three %K values.
        assert_eq!(d[14], None);
        assert!(d[15].is_some());

        for v in k.iter().flatten().chain(d.iter().flatten()) {
            assert!(*v >= 0.0 && *v <= 100.0, "stochastic {} out of bounds", v);
        }
    }

    #[test]
    fn test_stochastic_zero_range_reports_midpoint() {
        let highs = [100.0; 16];
        let lows = [100.0; 16];
        let closes = [100.0; 16];

        let (k, _) = stochastic(&highs, &lows, &closes, 14, 3);
        assert_eq!(k[14], Some(50.0));
    }

    #[test]
    fn test_stochastic_close_at_extremes() {
        // Close pinned to the window high -> 100; to the window low -> 0.
        let highs = [10.0, 11.0, 12.0, 13.0, 14.0];
        let lows = [5.0, 6.0, 7.0, 8.0, 9.0];
        let closes_hi = [9.0, 10.0, 11.0, 12.0, 14.0];
        let closes_lo = [9.0, 10.0, 11.0, 12.0, 5.0];

        let (k_hi, _) = stochastic(&highs, &lows, &closes_hi, 5, 3);
        let (k_lo, _) = stochastic(&highs, &lows, &closes_lo, 5, 3);
        assert_eq!(k_hi[4], Some(100.0));
        assert_eq!(k_lo[4], Some(0.0));
    }
}
