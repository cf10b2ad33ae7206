/// Simple moving average. `None` until the window is filled.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "window must be positive");
    let mut out = vec![None; values.len()];
    if values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }
    out
}

/// SMA over a column with warm-up gaps: a value appears only where the
/// trailing window is fully present.
pub fn sma_opt(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "window must be positive");
    let mut out = vec![None; values.len()];
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(|v| v.is_some()) {
            let sum: f64 = slice.iter().map(|v| v.unwrap()).sum();
            out[i] = Some(sum / window as f64);
        }
    }
    out
}

/// Exponential moving average, alpha = 2/(window+1). The recursion is seeded
/// from the first value but outputs are masked until the window is filled,
/// matching an EWM with `adjust = false` and `min_periods = window`.
pub fn ema(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let opts: Vec<Option<f64>> = values.iter().map(|v| Some(*v)).collect();
    ema_opt(&opts, window)
}

/// EMA over a column that may lead with `None`s (e.g. the MACD line). The
/// recursion starts at the first present value; masking counts from there.
pub fn ema_opt(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "window must be positive");
    let mut out = vec![None; values.len()];

    let start = match values.iter().position(|v| v.is_some()) {
        Some(i) => i,
        None => return out,
    };

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut current = match values[start] {
        Some(v) => v,
        None => return out,
    };

    let mut seen = 1usize;
    if seen >= window {
        out[start] = Some(current);
    }

    for i in (start + 1)..values.len() {
        let v = match values[i] {
            Some(v) => v,
            // Interior gaps do not occur in cleaned input; carry the level.
            None => current,
        };
        current = alpha * v + (1.0 - alpha) * current;
        seen += 1;
        if seen >= window {
            out[i] = Some(current);
        }
    }
    out
}

/// MACD line, signal line and histogram for the standard fast/slow/signal
/// EMA construction.
pub fn macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);

    let line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let signal_line = ema_opt(&line, signal);

    let histogram: Vec<Option<f64>> = line
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    (line, signal_line, histogram)
}

/// Bollinger bands: middle = SMA(window), upper/lower = middle +/- dev
/// sample standard deviations of the same window.
pub fn bollinger(
    values: &[f64],
    window: usize,
    dev: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let middle = sma(values, window);
    let mut upper = vec![None; values.len()];
    let mut lower = vec![None; values.len()];

    for i in 0..values.len() {
        let mean = match middle[i] {
            Some(m) => m,
            None => continue,
        };
        let slice = &values[i + 1 - window..=i];
        let var: f64 = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (window as f64 - 1.0);
        let sd = var.sqrt();
        upper[i] = Some(mean + dev * sd);
        lower[i] = Some(mean - dev * sd);
    }

    (upper, middle, lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_warmup_and_values() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&values, 3);

        // First two values null (insufficient data), then rolling means.
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_eq!(result[2], Some(2.0));
        assert_eq!(result[3], Some(3.0));
        assert_eq!(result[4], Some(4.0));
    }

    #[test]
    fn test_sma_shorter_than_window() {
        let result = sma(&[1.0, 2.0], 5);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_ema_reacts_faster_than_sma() {
        let values = [100.0, 100.0, 100.0, 110.0, 110.0, 110.0];
        let s = sma(&values, 3);
        let e = ema(&values, 3);

        // After the step up, EMA should sit closer to the new level.
        assert!(e[3].unwrap() > s[3].unwrap());
    }

    #[test]
    fn test_ema_warmup_nulls() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let e = ema(&values, 3);
        assert_eq!(e[0], None);
        assert_eq!(e[1], None);
        assert!(e[2].is_some());
    }

    #[test]
    fn test_macd_warmup_alignment() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64) * 0.5).collect();
        let (line, signal, hist) = macd(&values, 12, 26, 9);

        // MACD null until the slow EMA fills, signal 8 indices later.
        assert_eq!(line[24], None);
        assert!(line[25].is_some());
        assert_eq!(signal[32], None);
        assert!(signal[33].is_some());
        assert_eq!(hist[32], None);
        assert!(hist[33].is_some());

        // Steadily rising series keeps the fast EMA above the slow one.
        assert!(line[59].unwrap() > 0.0);
    }

    #[test]
    fn test_bollinger_bands_bracket_the_mean() {
        let values: Vec<f64> = (0..25).map(|i| 100.0 + (i % 5) as f64).collect();
        let (upper, middle, lower) = bollinger(&values, 20, 2.0);

        assert_eq!(middle[18], None);
        for i in 19..25 {
            let (u, m, l) = (upper[i].unwrap(), middle[i].unwrap(), lower[i].unwrap());
            assert!(u > m && m > l);
        }
    }

    #[test]
    fn test_bollinger_flat_series_collapses_bands() {
        let values = [50.0; 25];
        let (upper, middle, lower) = bollinger(&values, 20, 2.0);
        assert_eq!(upper[24], Some(50.0));
        assert_eq!(middle[24], Some(50.0));
        assert_eq!(lower[24], Some(50.0));
    }
}
