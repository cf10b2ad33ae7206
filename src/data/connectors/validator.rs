use crate::error::{Result, StockLensError};
use crate::types::SourceFormat;
use polars::prelude::*;
use std::collections::HashMap;

use super::types::RequiredColumn;

/// Frame-level checks applied before normalization. Row-level validity is
/// the cleaner's job; this only answers "can the normalizer even start".
pub struct FrameValidator;

impl FrameValidator {
    /// Map each required column to the raw header it was found under,
    /// after header cleanup. Fails with a schema error naming what is
    /// missing and which aliases were tried.
    pub fn resolve_columns(
        df: &DataFrame,
        format: SourceFormat,
    ) -> Result<HashMap<RequiredColumn, String>> {
        let cleaned: Vec<(String, String)> = df
            .get_column_names()
            .iter()
            .map(|raw| (clean_header(raw.as_str()), raw.to_string()))
            .collect();

        let mut column_map = HashMap::new();

        for required in RequiredColumn::all() {
            let aliases = match format {
                SourceFormat::International => required.international_aliases(),
                SourceFormat::Indian => required.indian_aliases(),
            };

            let found = aliases.iter().find_map(|alias| {
                cleaned.iter().find_map(|(clean, raw)| {
                    let matches = match format {
                        // International headers match case-insensitively.
                        SourceFormat::International => clean.eq_ignore_ascii_case(alias),
                        // Indian headers are matched case-sensitively so the
                        // primary key wins over the alternate casing.
                        SourceFormat::Indian => clean == alias,
                    };
                    if matches {
                        Some(raw.clone())
                    } else {
                        None
                    }
                })
            });

            match found {
                Some(raw) => {
                    column_map.insert(required, raw);
                }
                None => {
                    return Err(StockLensError::Schema(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        aliases
                    )));
                }
            }
        }

        Ok(column_map)
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(StockLensError::Validation(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Check for null values across the frame; informational only.
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}

/// Header cleanup shared by the validator and the normalizer: trim, strip
/// surrounding quotes, drop internal spaces.
pub fn clean_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .chars()
        .filter(|c| *c != ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_clean_header() {
        assert_eq!(clean_header("  \"No. of Trades\"  "), "No.ofTrades");
        assert_eq!(clean_header(" OPEN "), "OPEN");
    }

    #[test]
    fn test_resolve_international_loose_case() {
        let df = df! {
            "Date" => &["2025-01-01"],
            "OPEN" => &[100.0],
            "High" => &[101.0],
            "low" => &[99.0],
            "Close" => &[100.5],
            "Vol" => &[1000.0],
        }
        .unwrap();

        let map = FrameValidator::resolve_columns(&df, SourceFormat::International).unwrap();
        assert_eq!(map[&RequiredColumn::Open], "OPEN");
        assert_eq!(map[&RequiredColumn::Volume], "Vol");
    }

    #[test]
    fn test_resolve_indian_primary_and_fallback() {
        let df = df! {
            "Date" => &["19-Aug-2025"],
            "OPEN" => &["1,390.00"],
            "HIGH" => &["1,421.00"],
            "LOW" => &["1,389.10"],
            // Primary key "close" absent; alternate casing accepted.
            "Close" => &["1,420.10"],
            "VOLUME" => &["1,43,84,719"],
        }
        .unwrap();

        let map = FrameValidator::resolve_columns(&df, SourceFormat::Indian).unwrap();
        assert_eq!(map[&RequiredColumn::Close], "Close");
        assert_eq!(map[&RequiredColumn::Open], "OPEN");
    }

    #[test]
    fn test_resolve_missing_column() {
        let df = df! {
            "Date" => &["2025-01-01"],
            "Open" => &[100.0],
            "High" => &[101.0],
            "Low" => &[99.0],
            // Missing close
            "Volume" => &[1000.0],
        }
        .unwrap();

        let err = FrameValidator::resolve_columns(&df, SourceFormat::International).unwrap_err();
        assert!(matches!(err, StockLensError::Schema(_)));
    }

    #[test]
    fn test_minimum_rows() {
        let df = df! { "Close" => &[1.0, 2.0] }.unwrap();
        assert!(FrameValidator::validate_minimum_rows(&df, 2).is_ok());
        assert!(FrameValidator::validate_minimum_rows(&df, 3).is_err());
    }
}
