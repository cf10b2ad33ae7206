use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Required OHLCV columns for market data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl RequiredColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::Date,
            Self::Open,
            Self::High,
            Self::Low,
            Self::Close,
            Self::Volume,
        ]
    }

    /// Column names accepted for international feeds, matched after header
    /// cleanup with case folding.
    pub fn international_aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Date => vec!["date", "datetime", "timestamp"],
            Self::Open => vec!["open", "o"],
            Self::High => vec!["high", "h"],
            Self::Low => vec!["low", "l"],
            Self::Close => vec!["close", "c"],
            Self::Volume => vec!["volume", "vol", "v"],
        }
    }

    /// NSE/BSE export headers: the primary key first, then the alternate
    /// casing the originals fall back to.
    pub fn indian_aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Date => vec!["Date", "date"],
            Self::Open => vec!["OPEN", "Open"],
            Self::High => vec!["HIGH", "High"],
            Self::Low => vec!["LOW", "Low"],
            Self::Close => vec!["close", "Close"],
            Self::Volume => vec!["VOLUME", "Volume"],
        }
    }
}

/// Optional columns captured when present; never required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalColumn {
    AdjClose,
    Trades,
    Vwap,
}

impl OptionalColumn {
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::AdjClose => vec!["adj_close", "adjclose"],
            Self::Trades => vec!["Nooftrades", "No.oftrades", "trades"],
            Self::Vwap => vec!["vwap", "VWAP"],
        }
    }
}

/// Metadata about a loaded raw table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub num_columns: usize,
    pub columns: Vec<String>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub price_range: (f64, f64),  // (min, max) of close
    pub volume_range: (f64, f64), // (min, max)
}

/// Data preview for display adapters
#[derive(Debug, Clone)]
pub struct DataPreview {
    pub metadata: DatasetMetadata,
    pub first_rows: Vec<Vec<String>>, // First 10 rows as strings
    pub column_stats: Vec<ColumnStats>,
}

#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}
