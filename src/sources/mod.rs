use polars::prelude::*;
use std::path::PathBuf;
use std::str::FromStr;

use crate::data::CsvConnector;
use crate::error::{Result, StockLensError};

/// History lookback tokens accepted at the fetch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    Max,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::Max => "max",
        }
    }
}

impl FromStr for Period {
    type Err = StockLensError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            "max" => Ok(Self::Max),
            other => Err(StockLensError::Configuration(format!(
                "Unknown period token: {} (expected 1mo,3mo,6mo,1y,2y,5y,max)",
                other
            ))),
        }
    }
}

/// Boundary contract for anything that can produce a raw history table for a
/// symbol. Implementations own their transport, timeouts and retries; the
/// engine only sees a frame or a `SourceUnavailable` failure.
pub trait MarketDataSource {
    /// Raw history for a symbol, convertible by the normalizer. An empty
    /// result must be reported as `SourceUnavailable` (invalid or delisted
    /// symbol), not as an empty frame.
    fn history(&self, symbol: &str, period: Period) -> Result<DataFrame>;
}

/// Indian symbols without an exchange suffix are tried on NSE first, then
/// once on BSE, before the symbol is declared unavailable. Returns the frame
/// together with the suffix-resolved symbol that produced it.
pub fn fetch_indian_history<S: MarketDataSource>(
    source: &S,
    symbol: &str,
    period: Period,
) -> Result<(DataFrame, String)> {
    if symbol.ends_with(".NS") || symbol.ends_with(".BO") {
        let df = source.history(symbol, period)?;
        return Ok((df, symbol.to_string()));
    }

    let nse = format!("{}.NS", symbol);
    match source.history(&nse, period) {
        Ok(df) => Ok((df, nse)),
        Err(StockLensError::SourceUnavailable(_)) => {
            log::info!("{} not found on NSE, retrying BSE", symbol);
            let bse = format!("{}.BO", symbol);
            match source.history(&bse, period) {
                Ok(df) => Ok((df, bse)),
                Err(StockLensError::SourceUnavailable(_)) => {
                    Err(StockLensError::SourceUnavailable(format!(
                        "No data found for {} on either exchange. \
                         Try adding .NS (NSE) or .BO (BSE) suffix.",
                        symbol
                    )))
                }
                Err(e) => Err(e),
            }
        }
        Err(e) => Err(e),
    }
}

/// Directory of per-symbol CSV files, used for offline analysis and tests.
/// A file named `<SYMBOL>.csv` is the full history; the period token is the
/// caller's concern (the engine slices nothing here, matching the contract
/// that a source returns whatever history it has for the token).
pub struct CsvSource {
    root: PathBuf,
}

impl CsvSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl MarketDataSource for CsvSource {
    fn history(&self, symbol: &str, _period: Period) -> Result<DataFrame> {
        let path = self.root.join(format!("{}.csv", symbol));
        if !path.exists() {
            return Err(StockLensError::SourceUnavailable(format!(
                "No data found for symbol {}. The symbol may be delisted or invalid.",
                symbol
            )));
        }

        let df = CsvConnector::load(&path)?;
        if df.height() == 0 {
            return Err(StockLensError::SourceUnavailable(format!(
                "No data found for symbol {}. The symbol may be delisted or invalid.",
                symbol
            )));
        }
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use std::collections::HashMap;

    struct FakeSource {
        frames: HashMap<String, DataFrame>,
    }

    impl MarketDataSource for FakeSource {
        fn history(&self, symbol: &str, _period: Period) -> Result<DataFrame> {
            self.frames.get(symbol).cloned().ok_or_else(|| {
                StockLensError::SourceUnavailable(format!("No data found for symbol {}", symbol))
            })
        }
    }

    fn frame() -> DataFrame {
        df! {
            "Date" => &["2025-01-02"],
            "Open" => &[100.0],
            "High" => &[101.0],
            "Low" => &[99.0],
            "Close" => &[100.5],
            "Volume" => &[1000.0],
        }
        .unwrap()
    }

    #[test]
    fn test_period_tokens_round_trip() {
        for token in ["1mo", "3mo", "6mo", "1y", "2y", "5y", "max"] {
            let period: Period = token.parse().unwrap();
            assert_eq!(period.as_str(), token);
        }
        assert!("7d".parse::<Period>().is_err());
    }

    #[test]
    fn test_nse_resolves_first() {
        let mut frames = HashMap::new();
        frames.insert("RELIANCE.NS".to_string(), frame());
        let source = FakeSource { frames };

        let (_, resolved) =
            fetch_indian_history(&source, "RELIANCE", Period::OneYear).unwrap();
        assert_eq!(resolved, "RELIANCE.NS");
    }

    #[test]
    fn test_bse_fallback_after_nse_miss() {
        let mut frames = HashMap::new();
        frames.insert("SMALLCAP.BO".to_string(), frame());
        let source = FakeSource { frames };

        let (_, resolved) =
            fetch_indian_history(&source, "SMALLCAP", Period::SixMonths).unwrap();
        assert_eq!(resolved, "SMALLCAP.BO");
    }

    #[test]
    fn test_unavailable_after_both_exchanges() {
        let source = FakeSource {
            frames: HashMap::new(),
        };
        let err = fetch_indian_history(&source, "FAKE123", Period::OneYear).unwrap_err();
        assert!(matches!(err, StockLensError::SourceUnavailable(_)));
    }

    #[test]
    fn test_explicit_suffix_is_not_rewritten() {
        let source = FakeSource {
            frames: HashMap::new(),
        };
        let err = fetch_indian_history(&source, "FAKE123.BO", Period::OneYear).unwrap_err();
        // Only the explicit symbol is tried; no NSE rewrite.
        assert!(matches!(err, StockLensError::SourceUnavailable(_)));
    }
}
