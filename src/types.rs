use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input layout of a raw table handed to the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Loose-case `Date,Open,High,Low,Close,Volume[,Adj Close]` columns.
    International,
    /// NSE/BSE-style export: `Date,OPEN,HIGH,LOW,close,VOLUME`, values
    /// quote-wrapped and comma-grouped, dates as `19-Aug-2025`.
    Indian,
}

/// Pre-validation candidate row produced by the normalizer. Every field is
/// optional; the cleaner decides what survives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBar {
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    /// Exchange-reported trade count, when the feed carries one.
    pub trades: Option<f64>,
    /// Exchange-supplied VWAP, preferred over the computed one.
    pub vwap: Option<f64>,
}

/// One validated trading-period observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub trades: Option<f64>,
    pub vwap: Option<f64>,
}

/// Cleaned series, strictly ascending by date with no duplicates. Created by
/// the cleaner; downstream stages only read it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Trade counts as a column, `None` where the feed had none.
    pub fn trade_counts(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.trades).collect()
    }

    pub fn supplied_vwap(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.vwap).collect()
    }

    /// True when every bar carries an exchange-reported trade count.
    pub fn has_trade_counts(&self) -> bool {
        !self.bars.is_empty() && self.bars.iter().all(|b| b.trades.is_some())
    }

    pub fn has_supplied_vwap(&self) -> bool {
        !self.bars.is_empty() && self.bars.iter().all(|b| b.vwap.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

/// One directional signal with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: Direction,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Buy,
    Sell,
    Neutral,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Neutral => "NEUTRAL",
        }
    }
}

/// Aggregate output of the signal engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub signals: Vec<Signal>,
    pub observations: Vec<String>,
    pub risk_factors: Vec<String>,
    pub buy_count: usize,
    pub sell_count: usize,
    pub recommendation: Recommendation,
}

/// Row/value accounting from the strict cleaning pass, surfaced to the
/// caller rather than left implicit in the row count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_missing_dropped: usize,
    pub rows_invalid_dropped: usize,
    pub duplicate_dates_dropped: usize,
    pub values_capped: usize,
    pub rows_out: usize,
}
