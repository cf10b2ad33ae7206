use crate::error::{Result, StockLensError};
use polars::prelude::*;
use std::path::Path;

use super::types::{ColumnStats, DataPreview, DatasetMetadata};

pub struct CsvConnector;

impl CsvConnector {
    /// Load a CSV file into a raw DataFrame. Anything that is not a `.csv`
    /// is rejected up front; the original tool also accepted Excel uploads,
    /// which this connector does not support.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(StockLensError::Format(format!(
                "Unsupported file type: {} (expected .csv)",
                path.display()
            )));
        }

        let df = CsvReadOptions::default()
            .with_infer_schema_length(Some(200))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| StockLensError::Format(format!("Failed to read CSV: {}", e)))?;

        log::info!(
            "Loaded {}: {} rows, {} columns",
            path.display(),
            df.height(),
            df.width()
        );

        Ok(df)
    }

    /// Create metadata for a loaded DataFrame
    pub fn create_metadata<P: AsRef<Path>>(path: P, df: &DataFrame) -> Result<DatasetMetadata> {
        let columns: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();

        let price_range = Self::numeric_range(df, &["Close", "close", "CLOSE"])?;
        let volume_range = Self::numeric_range(df, &["Volume", "volume", "VOLUME"])?;

        Ok(DatasetMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            num_rows: df.height(),
            num_columns: df.width(),
            columns,
            date_range: None, // dates are parsed by the normalizer, not here
            price_range,
            volume_range,
        })
    }

    /// Create a preview of the data for display adapters
    pub fn create_preview<P: AsRef<Path>>(path: P, df: &DataFrame) -> Result<DataPreview> {
        let metadata = Self::create_metadata(&path, df)?;

        // First 10 rows as strings
        let num_preview_rows = 10.min(df.height());
        let mut first_rows = Vec::new();

        for i in 0..num_preview_rows {
            let mut row = Vec::new();
            for col_name in df.get_column_names() {
                let series = df.column(col_name)?;
                let value = match series.dtype() {
                    DataType::Float64 | DataType::Float32 => {
                        let s_f64 = series.cast(&DataType::Float64)?;
                        let f64_series = s_f64.f64()?;
                        f64_series
                            .get(i)
                            .map(|v| format!("{:.4}", v))
                            .unwrap_or_else(|| "null".to_string())
                    }
                    DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32 => {
                        let s_i64 = series.cast(&DataType::Int64)?;
                        let i64_series = s_i64.i64()?;
                        i64_series
                            .get(i)
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "null".to_string())
                    }
                    DataType::String => series.str()?.get(i).unwrap_or("null").to_string(),
                    _ => "?".to_string(),
                };
                row.push(value);
            }
            first_rows.push(row);
        }

        // Per-column stats
        let mut column_stats = Vec::new();
        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;

            let (min, max, mean) = if matches!(
                series.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                let s_f64 = series.cast(&DataType::Float64)?;
                let f = s_f64.f64()?;
                (f.min(), f.max(), f.mean())
            } else {
                (None, None, None)
            };

            column_stats.push(ColumnStats {
                name: col_name.to_string(),
                dtype: format!("{:?}", series.dtype()),
                null_count: series.null_count(),
                min,
                max,
                mean,
            });
        }

        Ok(DataPreview {
            metadata,
            first_rows,
            column_stats,
        })
    }

    fn numeric_range(df: &DataFrame, candidates: &[&str]) -> Result<(f64, f64)> {
        let columns = df.get_column_names();
        let found = candidates
            .iter()
            .find(|&&alias| columns.iter().any(|col| col.as_str() == alias));

        match found {
            Some(&name) => {
                let col = df.column(name)?;
                if !matches!(
                    col.dtype(),
                    DataType::Float64
                        | DataType::Float32
                        | DataType::Int64
                        | DataType::Int32
                        | DataType::UInt64
                        | DataType::UInt32
                ) {
                    // Indian exports carry prices as quoted strings; the
                    // range is only known after normalization.
                    return Ok((0.0, 0.0));
                }
                let casted = col.cast(&DataType::Float64)?;
                let f = casted.f64()?;
                Ok((f.min().unwrap_or(0.0), f.max().unwrap_or(0.0)))
            }
            None => Ok((0.0, 0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_create_preview() {
        let df = df! {
            "Open" => &[100.0, 101.0, 102.0],
            "High" => &[101.0, 103.0, 104.0],
            "Low" => &[99.0, 100.0, 101.0],
            "Close" => &[100.5, 102.0, 103.0],
            "Volume" => &[1000.0, 1500.0, 1200.0],
        }
        .unwrap();

        let preview = CsvConnector::create_preview("test.csv", &df).unwrap();
        assert_eq!(preview.first_rows.len(), 3);
        assert_eq!(preview.metadata.num_rows, 3);
        assert_eq!(preview.metadata.price_range, (100.5, 103.0));
    }

    #[test]
    fn test_load_rejects_non_csv() {
        let err = CsvConnector::load("prices.xlsx").unwrap_err();
        assert!(matches!(err, StockLensError::Format(_)));
    }
}
