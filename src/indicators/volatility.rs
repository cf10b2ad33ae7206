/// Average true range with Wilder smoothing. The first bar's true range is
/// its high-low span (no previous close); the seed average covers the first
/// `window` true ranges and lands at index `window - 1`.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "window must be positive");
    let len = closes.len();
    let mut out = vec![None; len];
    if len < window {
        return out;
    }

    let mut true_ranges = Vec::with_capacity(len);
    for i in 0..len {
        let tr = if i == 0 {
            highs[0] - lows[0]
        } else {
            let prev_close = closes[i - 1];
            (highs[i] - lows[i])
                .max((highs[i] - prev_close).abs())
                .max((lows[i] - prev_close).abs())
        };
        true_ranges.push(tr);
    }

    let mut current = true_ranges[..window].iter().sum::<f64>() / window as f64;
    out[window - 1] = Some(current);

    for i in window..len {
        current = (current * (window as f64 - 1.0) + true_ranges[i]) / window as f64;
        out[i] = Some(current);
    }

    out
}
