use crate::error::{Result, StockLensError};
use crate::types::{CleanReport, PriceBar, PriceSeries, RawBar};

/// Strict and light cleaning passes over candidate rows. The strict pass
/// drops what it cannot trust; the light pass fills interior gaps so a
/// renderer or indicator consumer gets a dense series. Both are separately
/// callable because downstream consumers invoke the light pass on their own.
pub struct SeriesCleaner;

impl SeriesCleaner {
    /// Strict cleaning: drop rows with missing or inconsistent fields, sort,
    /// de-duplicate dates (first occurrence wins), cap runaway magnitudes.
    pub fn clean(candidate: Vec<RawBar>) -> Result<(PriceSeries, CleanReport)> {
        let mut report = CleanReport {
            rows_in: candidate.len(),
            ..Default::default()
        };

        // Non-finite values become missing before completeness is judged.
        let candidate: Vec<RawBar> = candidate.into_iter().map(scrub_non_finite).collect();

        // Drop rows with any missing required field.
        let mut complete: Vec<PriceBar> = Vec::with_capacity(candidate.len());
        for raw in candidate {
            match materialize(&raw) {
                Some(bar) => complete.push(bar),
                None => report.rows_missing_dropped += 1,
            }
        }

        if report.rows_missing_dropped > 0 {
            log::warn!(
                "Removed {} rows with missing data",
                report.rows_missing_dropped
            );
        }

        // Drop rows violating OHLC consistency or sign constraints.
        let before = complete.len();
        complete.retain(|bar| ohlc_consistent(bar));
        report.rows_invalid_dropped = before - complete.len();

        if report.rows_invalid_dropped > 0 {
            log::warn!(
                "Removing {} rows with invalid price relationships",
                report.rows_invalid_dropped
            );
        }

        if complete.is_empty() {
            return Err(StockLensError::EmptySeries(
                "no valid rows remain after cleaning".to_string(),
            ));
        }

        // Sort ascending, then keep the first occurrence of each date.
        let duplicates = sort_and_dedup(&mut complete);
        report.duplicate_dates_dropped = duplicates;

        // Magnitude guard: cap values that sit orders of magnitude outside
        // the 1st/99th percentile band. This is a heuristic against corrupted
        // magnitudes (misplaced decimal, unit mix-up), not outlier removal.
        report.values_capped = cap_extremes(&mut complete);

        report.rows_out = complete.len();
        Ok((PriceSeries::new(complete), report))
    }

    /// Light pass applied immediately before chart/indicator consumption:
    /// non-finite values become missing, interior gaps are forward- then
    /// back-filled, and rows still incomplete are dropped. Returns the
    /// number of rows dropped. Dates never fill.
    pub fn validate_for_charts(candidate: Vec<RawBar>) -> Result<(PriceSeries, usize)> {
        let mut rows: Vec<RawBar> = candidate.into_iter().map(scrub_non_finite).collect();

        fill_field(&mut rows, |b| &mut b.open);
        fill_field(&mut rows, |b| &mut b.high);
        fill_field(&mut rows, |b| &mut b.low);
        fill_field(&mut rows, |b| &mut b.close);
        fill_field(&mut rows, |b| &mut b.volume);

        let before = rows.len();
        let mut bars: Vec<PriceBar> = rows.iter().filter_map(materialize).collect();
        let dropped = before - bars.len();

        if dropped > 0 {
            log::info!("Removed {} additional rows for chart compatibility", dropped);
        }

        sort_and_dedup(&mut bars);
        Ok((PriceSeries::new(bars), dropped))
    }
}

fn scrub_non_finite(mut raw: RawBar) -> RawBar {
    for field in [
        &mut raw.open,
        &mut raw.high,
        &mut raw.low,
        &mut raw.close,
        &mut raw.volume,
        &mut raw.trades,
        &mut raw.vwap,
    ] {
        if let Some(v) = *field {
            if !v.is_finite() {
                *field = None;
            }
        }
    }
    raw
}

/// A candidate row becomes a bar only when every required field is present.
fn materialize(raw: &RawBar) -> Option<PriceBar> {
    Some(PriceBar {
        date: raw.date?,
        open: raw.open?,
        high: raw.high?,
        low: raw.low?,
        close: raw.close?,
        volume: raw.volume?,
        trades: raw.trades,
        vwap: raw.vwap,
    })
}

fn ohlc_consistent(bar: &PriceBar) -> bool {
    !(bar.high < bar.low
        || bar.high < bar.open
        || bar.high < bar.close
        || bar.low > bar.open
        || bar.low > bar.close
        || bar.open <= 0.0
        || bar.high <= 0.0
        || bar.low <= 0.0
        || bar.close <= 0.0
        || bar.volume < 0.0)
}

/// Stable sort by date, then first-occurrence-wins de-duplication.
/// Returns the number of duplicate rows removed.
fn sort_and_dedup(bars: &mut Vec<PriceBar>) -> usize {
    bars.sort_by_key(|b| b.date);
    let before = bars.len();
    bars.dedup_by_key(|b| b.date);
    before - bars.len()
}

fn cap_extremes(bars: &mut [PriceBar]) -> usize {
    let accessors: [fn(&mut PriceBar) -> &mut f64; 5] = [
        |b| &mut b.open,
        |b| &mut b.high,
        |b| &mut b.low,
        |b| &mut b.close,
        |b| &mut b.volume,
    ];

    let mut capped = 0;
    for accessor in accessors {
        let values: Vec<f64> = bars.iter_mut().map(|b| *accessor(b)).collect();
        let q1 = percentile(&values, 0.01);
        let q99 = percentile(&values, 0.99);

        let mut column_caps = 0;
        for bar in bars.iter_mut() {
            let v = accessor(bar);
            if *v < q1 * 0.01 {
                *v = q1;
                column_caps += 1;
            } else if *v > q99 * 100.0 {
                *v = q99;
                column_caps += 1;
            }
        }
        if column_caps > 0 {
            log::warn!("Capped {} extreme values", column_caps);
        }
        capped += column_caps;
    }
    capped
}

/// Percentile with linear interpolation between closest ranks.
fn percentile(values: &[f64], q: f64) -> f64 {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite values"));

    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
    }
}

/// Forward-fill then back-fill one optional field across rows.
fn fill_field(rows: &mut [RawBar], accessor: fn(&mut RawBar) -> &mut Option<f64>) {
    let mut last = None;
    for row in rows.iter_mut() {
        let field = accessor(row);
        match *field {
            Some(v) => last = Some(v),
            None => *field = last,
        }
    }

    let mut next = None;
    for row in rows.iter_mut().rev() {
        let field = accessor(row);
        match *field {
            Some(v) => next = Some(v),
            None => *field = next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(day: u32, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2025, 3, day),
            open: Some(close - 0.5),
            high: Some(close + 1.0),
            low: Some(close - 1.0),
            close: Some(close),
            volume: Some(1000.0),
            trades: None,
            vwap: None,
        }
    }

    #[test]
    fn test_clean_drops_missing_and_counts() {
        let mut rows = vec![raw(1, 100.0), raw(2, 101.0), raw(3, 102.0)];
        rows[1].close = None;

        let (series, report) = SeriesCleaner::clean(rows).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(report.rows_in, 3);
        assert_eq!(report.rows_missing_dropped, 1);
        assert_eq!(report.rows_out, 2);
    }

    #[test]
    fn test_clean_drops_inconsistent_ohlc() {
        let mut rows = vec![raw(1, 100.0), raw(2, 101.0)];
        rows[1].high = Some(50.0); // high < low

        let (series, report) = SeriesCleaner::clean(rows).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(report.rows_invalid_dropped, 1);
    }

    #[test]
    fn test_clean_rejects_nonpositive_prices_and_negative_volume() {
        let mut rows = vec![raw(1, 100.0), raw(2, 101.0), raw(3, 102.0)];
        rows[1].open = Some(0.0);
        rows[2].volume = Some(-5.0);

        let (series, report) = SeriesCleaner::clean(rows).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(report.rows_invalid_dropped, 2);
    }

    #[test]
    fn test_clean_empty_result_errors() {
        let mut row = raw(1, 100.0);
        row.date = None;
        let err = SeriesCleaner::clean(vec![row]).unwrap_err();
        assert!(matches!(err, StockLensError::EmptySeries(_)));
    }

    #[test]
    fn test_sort_and_first_wins_dedup() {
        let mut second = raw(2, 200.0);
        second.volume = Some(999.0);
        let mut second_dup = raw(2, 300.0);
        second_dup.volume = Some(111.0);

        // Out of order on purpose: day 2 (v=999), day 1, day 2 again (v=111).
        let rows = vec![second, raw(1, 100.0), second_dup];
        let (series, report) = SeriesCleaner::clean(rows).unwrap();

        assert_eq!(report.duplicate_dates_dropped, 1);
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        // First occurrence after the stable sort is the v=999 row.
        assert_eq!(series.bars[1].volume, 999.0);
    }

    fn raw_at_offset(offset: i64, close: f64) -> RawBar {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut bar = raw(1, close);
        bar.date = base.checked_add_signed(chrono::Duration::days(offset));
        bar
    }

    #[test]
    fn test_outlier_capped_not_dropped() {
        let mut rows: Vec<RawBar> = (0..200)
            .map(|d| raw_at_offset(d, 101.0 + d as f64))
            .collect();
        // One close 1000x its neighbors, far past 100x the 99th percentile.
        rows[10].close = Some(120_000.0);
        rows[10].high = Some(121_000.0);

        let (series, report) = SeriesCleaner::clean(rows).unwrap();
        assert_eq!(series.len(), 200);
        assert!(report.values_capped >= 1);
        // Capped to the 99th percentile of the column, not dropped.
        assert!(
            series.bars[10].close < 320.0,
            "expected cap near the 99th percentile, got {}",
            series.bars[10].close
        );
    }

    #[test]
    fn test_clean_is_idempotent() {
        let rows: Vec<RawBar> = (1..=15).map(|d| raw(d, 100.0 + d as f64)).collect();
        let (first, _) = SeriesCleaner::clean(rows).unwrap();

        let back_to_raw: Vec<RawBar> = first
            .bars
            .iter()
            .map(|b| RawBar {
                date: Some(b.date),
                open: Some(b.open),
                high: Some(b.high),
                low: Some(b.low),
                close: Some(b.close),
                volume: Some(b.volume),
                trades: b.trades,
                vwap: b.vwap,
            })
            .collect();

        let (second, report) = SeriesCleaner::clean(back_to_raw).unwrap();
        assert_eq!(first.bars, second.bars);
        assert_eq!(report.rows_missing_dropped, 0);
        assert_eq!(report.rows_invalid_dropped, 0);
        assert_eq!(report.values_capped, 0);
    }

    #[test]
    fn test_validate_for_charts_fills_gaps() {
        let mut rows = vec![raw(1, 100.0), raw(2, 101.0), raw(3, 102.0)];
        rows[1].close = None; // interior gap: forward-filled from day 1

        let (series, dropped) = SeriesCleaner::validate_for_charts(rows).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(series.len(), 3);
        assert_eq!(series.bars[1].close, 100.0);
    }

    #[test]
    fn test_validate_for_charts_backfills_leading_gap() {
        let mut rows = vec![raw(1, 100.0), raw(2, 101.0)];
        rows[0].open = None; // leading gap: back-filled from day 2

        let (series, _) = SeriesCleaner::validate_for_charts(rows).unwrap();
        assert_eq!(series.bars[0].open, rows_open_of_day2());
    }

    fn rows_open_of_day2() -> f64 {
        101.0 - 0.5
    }

    #[test]
    fn test_validate_for_charts_drops_dateless_rows() {
        let mut rows = vec![raw(1, 100.0), raw(2, 101.0)];
        rows[1].date = None;

        let (series, dropped) = SeriesCleaner::validate_for_charts(rows).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_percentile_interpolation() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        assert!((percentile(&values, 0.01) - 1.99).abs() < 1e-9);
        assert!((percentile(&values, 0.99) - 99.01).abs() < 1e-9);
        assert_eq!(percentile(&[42.0], 0.5), 42.0);
    }

    #[test]
    fn test_infinite_values_become_missing_then_drop() {
        let mut rows = vec![raw(1, 100.0), raw(2, 101.0)];
        rows[0].close = Some(f64::INFINITY);

        let (series, report) = SeriesCleaner::clean(rows).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(report.rows_missing_dropped, 1);
    }
}
