use serde_json::json;

use crate::config::SignalConfig;
use crate::error::Result;
use crate::indicators::IndicatorSet;
use crate::types::{AnalysisSummary, CleanReport, Direction, PriceSeries};

/// Everything a presentation adapter may consume. Renderers never mutate
/// any of it.
pub struct AnalysisReport<'a> {
    pub symbol: &'a str,
    pub series: &'a PriceSeries,
    pub indicators: &'a IndicatorSet,
    pub summary: &'a AnalysisSummary,
    pub clean: &'a CleanReport,
}

/// One render capability per output medium: text report, table, chart
/// payload. Callers pick the adapter; the engine stays presentation-free.
pub trait Renderer {
    fn render(&self, report: &AnalysisReport) -> Result<String>;
}

/// Human-readable market condition summary.
pub struct TextRenderer {
    pub signal_cfg: SignalConfig,
}

impl Renderer for TextRenderer {
    fn render(&self, report: &AnalysisReport) -> Result<String> {
        let mut out = String::new();
        let summary = report.summary;

        out.push_str(&format!("Analysis for {}\n", report.symbol));
        out.push_str(&format!(
            "Records: {} ({} removed during cleaning)\n\n",
            report.clean.rows_out,
            report.clean.rows_in - report.clean.rows_out
        ));

        if let Some(last) = report.series.bars.last() {
            out.push_str(&format!(
                "Price action: {:.2} on {}\n",
                last.close, last.date
            ));

            let idx = report.series.len() - 1;
            if let Some(rsi) = report.indicators.value_at("RSI", idx) {
                let state = if rsi > self.signal_cfg.rsi_overbought {
                    "Overbought"
                } else if rsi < self.signal_cfg.rsi_oversold {
                    "Oversold"
                } else {
                    "Neutral"
                };
                out.push_str(&format!("RSI ({:.1}): {}\n", rsi, state));
            }
            if let (Some(macd), Some(signal)) = (
                report.indicators.value_at("MACD", idx),
                report.indicators.value_at("MACD_Signal", idx),
            ) {
                let trend = if macd > signal { "Bullish" } else { "Bearish" };
                out.push_str(&format!("MACD: {} trend\n", trend));
            }
        }

        out.push_str(&format!("\nBuy signals: {}\n", summary.buy_count));
        for signal in summary
            .signals
            .iter()
            .filter(|s| s.direction == Direction::Buy)
        {
            out.push_str(&format!("  + {}\n", signal.reason));
        }
        out.push_str(&format!("Sell signals: {}\n", summary.sell_count));
        for signal in summary
            .signals
            .iter()
            .filter(|s| s.direction == Direction::Sell)
        {
            out.push_str(&format!("  - {}\n", signal.reason));
        }

        if !summary.observations.is_empty() {
            out.push_str("\nMarket conditions:\n");
            for point in &summary.observations {
                out.push_str(&format!("  * {}\n", point));
            }
        }

        if !summary.risk_factors.is_empty() {
            out.push_str("\nRisk factors:\n");
            for risk in &summary.risk_factors {
                out.push_str(&format!("  ! {}\n", risk));
            }
        }

        out.push_str(&format!(
            "\nOverall signal: {}\n",
            summary.recommendation.as_str()
        ));

        Ok(out)
    }
}

/// Canonical rows as an aligned text table, most recent last.
pub struct TableRenderer {
    /// Number of trailing rows to include; 0 means all.
    pub tail: usize,
}

impl Renderer for TableRenderer {
    fn render(&self, report: &AnalysisReport) -> Result<String> {
        let bars = &report.series.bars;
        let start = if self.tail == 0 || self.tail >= bars.len() {
            0
        } else {
            bars.len() - self.tail
        };

        let mut out = String::new();
        out.push_str(&format!(
            "{:<12} {:>10} {:>10} {:>10} {:>10} {:>14}\n",
            "Date", "Open", "High", "Low", "Close", "Volume"
        ));
        for bar in &bars[start..] {
            out.push_str(&format!(
                "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14.0}\n",
                bar.date.to_string(),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume
            ));
        }
        Ok(out)
    }
}

/// Chart payload for an external plotting client: the canonical series plus
/// every indicator column, warm-up gaps serialized as nulls.
pub struct JsonChartRenderer;

impl Renderer for JsonChartRenderer {
    fn render(&self, report: &AnalysisReport) -> Result<String> {
        let dates: Vec<String> = report
            .series
            .bars
            .iter()
            .map(|b| b.date.to_string())
            .collect();

        let mut indicator_columns = serde_json::Map::new();
        for (name, values) in report.indicators.iter() {
            indicator_columns.insert(name.to_string(), json!(values));
        }

        let payload = json!({
            "symbol": report.symbol,
            "dates": dates,
            "open": report.series.opens(),
            "high": report.series.highs(),
            "low": report.series.lows(),
            "close": report.series.closes(),
            "volume": report.series.volumes(),
            "indicators": indicator_columns,
            "recommendation": report.summary.recommendation.as_str(),
        });

        Ok(serde_json::to_string_pretty(&payload)?)
    }
}
