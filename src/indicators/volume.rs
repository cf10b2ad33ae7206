use super::trend::sma;

/// On-balance volume: cumulative signed volume by day-over-day close
/// direction. Starts at 0 on the first bar; unchanged closes add nothing.
pub fn obv(closes: &[f64], volumes: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    let mut running = 0.0;

    for i in 0..closes.len() {
        if i > 0 {
            if closes[i] > closes[i - 1] {
                running += volumes[i];
            } else if closes[i] < closes[i - 1] {
                running -= volumes[i];
            }
        }
        out.push(Some(running));
    }
    out
}

/// Cumulative VWAP from the start of the series:
/// cumsum(volume * typical) / cumsum(volume), typical = (H+L+C)/3.
///
/// When a feed supplies its own VWAP column it is used verbatim. While the
/// cumulative volume is still zero the bar's typical price stands in, so the
/// column stays finite.
pub fn vwap(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[f64],
    supplied: Option<&[Option<f64>]>,
) -> Vec<Option<f64>> {
    if let Some(column) = supplied {
        return column.to_vec();
    }

    let mut out = Vec::with_capacity(closes.len());
    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;

    for i in 0..closes.len() {
        let typical = (highs[i] + lows[i] + closes[i]) / 3.0;
        cum_pv += volumes[i] * typical;
        cum_volume += volumes[i];

        if cum_volume == 0.0 {
            log::warn!("VWAP with zero cumulative volume, carrying typical price");
            out.push(Some(typical));
        } else {
            out.push(Some(cum_pv / cum_volume));
        }
    }
    out
}

/// Simple moving average of volume.
pub fn volume_ma(volumes: &[f64], window: usize) -> Vec<Option<f64>> {
    sma(volumes, window)
}
