use chrono::NaiveDate;
use polars::prelude::*;

use crate::error::{Result, StockLensError};
use crate::types::{RawBar, SourceFormat};

use super::connectors::{clean_header, FrameValidator, OptionalColumn, RequiredColumn};

/// Converts a raw table into candidate rows with canonical fields. Rows that
/// fail to parse keep `None` in the failed field; the cleaner resolves them.
pub struct FormatNormalizer;

/// Date-format strategies, in priority order. A strategy wins outright when
/// it parses every non-null value in the column; otherwise rows fall back to
/// per-value, first-match parsing across all strategies.
const INDIAN_DATE_STRATEGIES: &[&[&str]] = &[
    &["%d-%b-%Y"],
    &["%d-%m-%Y", "%d/%m/%Y"],
    &["%Y-%m-%d", "%m/%d/%Y"],
];

const INTERNATIONAL_DATE_STRATEGIES: &[&[&str]] = &[
    &["%Y-%m-%d", "%Y/%m/%d"],
    &["%m/%d/%Y"],
    &["%d-%m-%Y"],
];

impl FormatNormalizer {
    pub fn normalize(df: &DataFrame, format: SourceFormat) -> Result<Vec<RawBar>> {
        let column_map = FrameValidator::resolve_columns(df, format)?;

        // Warn about nulls but don't fail; the cleaner decides their fate.
        let null_report = FrameValidator::check_nulls(df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        let date_raw = Self::extract_strings(df, &column_map[&RequiredColumn::Date])?;
        let dates = Self::parse_dates(df, &column_map[&RequiredColumn::Date], date_raw, format)?;

        let opens = Self::extract_numeric(df, &column_map[&RequiredColumn::Open], format)?;
        let highs = Self::extract_numeric(df, &column_map[&RequiredColumn::High], format)?;
        let lows = Self::extract_numeric(df, &column_map[&RequiredColumn::Low], format)?;
        let closes = Self::extract_numeric(df, &column_map[&RequiredColumn::Close], format)?;
        let volumes = Self::extract_numeric(df, &column_map[&RequiredColumn::Volume], format)?;

        let trades = Self::extract_optional(df, OptionalColumn::Trades, format)?;
        let vwap = Self::extract_optional(df, OptionalColumn::Vwap, format)?;

        // Adjusted close is recognized but not part of the canonical table.
        if Self::extract_optional(df, OptionalColumn::AdjClose, format)?.is_some() {
            log::debug!("Adjusted close column present, ignoring");
        }

        let height = df.height();
        let mut bars = Vec::with_capacity(height);
        for i in 0..height {
            bars.push(RawBar {
                date: dates[i],
                open: opens[i],
                high: highs[i],
                low: lows[i],
                close: closes[i],
                volume: volumes[i],
                trades: trades.as_ref().map(|t| t[i]).unwrap_or(None),
                vwap: vwap.as_ref().map(|v| v[i]).unwrap_or(None),
            });
        }

        log::info!(
            "Normalized {} rows from {:?} format",
            bars.len(),
            format
        );

        Ok(bars)
    }

    /// Numeric coercion for one column. String-typed cells go through the
    /// per-format value cleanup first; unconvertible values become missing.
    fn extract_numeric(
        df: &DataFrame,
        name: &str,
        format: SourceFormat,
    ) -> Result<Vec<Option<f64>>> {
        let column = df.column(name)?;

        match column.dtype() {
            DataType::String => {
                let values = column.str()?;
                let mut out = Vec::with_capacity(df.height());
                for i in 0..df.height() {
                    out.push(values.get(i).and_then(|v| parse_numeric(v, format)));
                }
                Ok(out)
            }
            _ => {
                let casted = column.cast(&DataType::Float64)?;
                let values = casted.f64()?;
                let mut out = Vec::with_capacity(df.height());
                for i in 0..df.height() {
                    out.push(values.get(i));
                }
                Ok(out)
            }
        }
    }

    fn extract_optional(
        df: &DataFrame,
        column: OptionalColumn,
        format: SourceFormat,
    ) -> Result<Option<Vec<Option<f64>>>> {
        let cleaned: Vec<(String, String)> = df
            .get_column_names()
            .iter()
            .map(|raw| (clean_header(raw.as_str()), raw.to_string()))
            .collect();

        let found = column.aliases().iter().find_map(|alias| {
            cleaned.iter().find_map(|(clean, raw)| {
                if clean.eq_ignore_ascii_case(alias) {
                    Some(raw.clone())
                } else {
                    None
                }
            })
        });

        match found {
            Some(raw) => Ok(Some(Self::extract_numeric(df, &raw, format)?)),
            None => Ok(None),
        }
    }

    /// Raw string cells of a column; numeric and date-typed columns pass
    /// through as `None` here and are handled by their typed paths.
    fn extract_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
        let column = df.column(name)?;
        let mut out = Vec::with_capacity(df.height());

        if let DataType::String = column.dtype() {
            let values = column.str()?;
            for i in 0..df.height() {
                out.push(values.get(i).map(|v| v.trim_matches('"').trim().to_string()));
            }
        } else {
            out.resize(df.height(), None);
        }

        Ok(out)
    }

    fn parse_dates(
        df: &DataFrame,
        name: &str,
        raw: Vec<Option<String>>,
        format: SourceFormat,
    ) -> Result<Vec<Option<NaiveDate>>> {
        let column = df.column(name)?;

        // API-returned frames may carry an already-typed date column.
        if matches!(column.dtype(), DataType::Date) {
            let casted = column.cast(&DataType::Int32)?;
            let days = casted.i32()?;
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch");
            let mut out = Vec::with_capacity(df.height());
            for i in 0..df.height() {
                out.push(
                    days.get(i)
                        .and_then(|d| epoch.checked_add_signed(chrono::Duration::days(d as i64))),
                );
            }
            return Ok(out);
        }

        let strategies = match format {
            SourceFormat::Indian => INDIAN_DATE_STRATEGIES,
            SourceFormat::International => INTERNATIONAL_DATE_STRATEGIES,
        };

        Ok(parse_dates_with_priority(&raw, strategies))
    }
}

/// Clean one numeric cell per the source format, then coerce. Indian feeds
/// quote-wrap values and group digits with commas (including lakh/crore
/// grouping, e.g. `"1,43,84,719"`).
fn parse_numeric(value: &str, format: SourceFormat) -> Option<f64> {
    let cleaned: String = match format {
        SourceFormat::Indian => value
            .chars()
            .filter(|c| *c != '"' && *c != ',')
            .collect::<String>()
            .trim()
            .to_string(),
        SourceFormat::International => value.trim().trim_matches('"').to_string(),
    };

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Try each strategy against the full non-null set; the first that parses
/// everything wins. If none does, fall back to per-value first-match.
fn parse_dates_with_priority(
    raw: &[Option<String>],
    strategies: &[&[&str]],
) -> Vec<Option<NaiveDate>> {
    for formats in strategies {
        let parsed: Vec<Option<NaiveDate>> = raw
            .iter()
            .map(|v| v.as_deref().and_then(|s| parse_date_any(s, formats)))
            .collect();

        let complete = raw
            .iter()
            .zip(parsed.iter())
            .all(|(r, p)| r.is_none() || p.is_some());
        let any_input = raw.iter().any(|r| r.is_some());

        if complete && any_input {
            return parsed;
        }
    }

    // Best-effort: per value, first strategy that parses; failures stay
    // missing for the cleaner to drop.
    raw.iter()
        .map(|v| {
            v.as_deref().and_then(|s| {
                strategies
                    .iter()
                    .find_map(|formats| parse_date_any(s, formats))
            })
        })
        .collect()
}

fn parse_date_any(value: &str, formats: &[&str]) -> Option<NaiveDate> {
    // Tolerate a trailing time component ("2025-08-19 00:00:00").
    let date_part = value
        .split_once('T')
        .or_else(|| value.split_once(' '))
        .map(|(d, _)| d)
        .unwrap_or(value);

    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(date_part, f).ok())
}
